use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素参照が無効になりました: {0}")]
    StaleElement(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("ブラウザ操作エラー: {0}")]
    Browser(String),

    #[error("TARGET_URL が設定されていません。環境変数または .env で指定してください")]
    MissingTargetUrl,

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] commodity_scraper_common::Error),
}

impl ScrapeError {
    /// 一時的な失敗（品目・サブビューをスキップして続行できる）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScrapeError::Timeout(_) | ScrapeError::StaleElement(_))
    }
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        let msg = format!("{:#}", err);
        let lower = msg.to_lowercase();
        if lower.contains("no node with given id")
            || lower.contains("could not find node")
            || lower.contains("stale")
        {
            ScrapeError::StaleElement(msg)
        } else if lower.contains("timed out") || lower.contains("timeout") {
            ScrapeError::Timeout(msg)
        } else {
            ScrapeError::Browser(msg)
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
