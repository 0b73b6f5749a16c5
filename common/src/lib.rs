//! Commodity Scraper Common Library
//!
//! ブラウザに依存しない部分:
//! データ型、テーブルパース、フロー判定、チェックポイント・完了台帳、CSV出力

pub mod types;
pub mod error;
pub mod sanitize;
pub mod table;
pub mod classifier;
pub mod checkpoint;
pub mod ledger;
mod persist;
pub mod csv;

pub use types::{Classification, FlowKind, RunState, ScrapedTable, SubView, TableMeta};
pub use error::{Error, Result};
pub use sanitize::{artifact_file_name, sanitize_name};
pub use table::{parse_table, scrape_date};
pub use classifier::{classify, expected_views, is_total_row};
pub use checkpoint::CheckpointStore;
pub use ledger::CompletionLedger;
