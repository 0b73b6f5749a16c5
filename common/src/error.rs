//! エラー型定義

use std::path::PathBuf;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// チェックポイント・完了台帳の書き込み失敗（対象パス付き）
    #[error("state file {} could not be written: {source}", .path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
