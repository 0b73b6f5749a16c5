pub mod browser;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod export;
pub mod flows;
pub mod frame;
pub mod logging;
pub mod runner;
pub mod wait;

pub use browser::{ChromeSession, ElementInfo, Session};
pub use error::{Result, ScrapeError};
pub use runner::{RunSummary, Runner};
