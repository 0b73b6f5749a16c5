use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const TARGET_URL_ENV: &str = "TARGET_URL";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 待機・ポーリングの時間設定（ミリ秒）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// 要素出現・テーブル更新待ちの上限
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// 品目選択・クリック後の固定待機
    pub settle_ms: u64,
    /// テーブル更新検知後の描画待ち
    pub render_settle_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
            settle_ms: 2_000,
            render_settle_ms: 1_000,
        }
    }
}

impl Timings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }
}

/// ページ構造のセレクタ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub frame: String,
    pub catalog: String,
    pub table_rows: String,
    pub links: String,
    pub container_link_text: String,
    pub variety_link_text: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            frame: "iframe".into(),
            catalog: "select".into(),
            table_rows: "table.alltable tbody tr".into(),
            links: "div > a".into(),
            container_link_text: "Container".into(),
            variety_link_text: "Variety".into(),
        }
    }
}

impl Selectors {
    pub fn catalog_options(&self) -> String {
        format!("{} option", self.catalog)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_url: Option<String>,
    pub headless: bool,
    pub user_agent: String,
    /// チェックポイント・完了台帳の置き場所
    pub state_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 成果物ファイル名の先頭（省略時はURLのホスト名から）
    pub site_name: Option<String>,
    pub timings: Timings,
    pub selectors: Selectors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.into(),
            state_dir: PathBuf::from("."),
            output_dir: PathBuf::from("data").join("raw"),
            site_name: None,
            timings: Timings::default(),
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ScrapeError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("commodity-scraper").join("config.json"))
    }

    /// 対象URL（環境変数を優先）
    pub fn target_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(TARGET_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url.trim().to_string());
            }
        }

        self.target_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ScrapeError::MissingTargetUrl)
    }

    /// 成果物ファイル名の先頭に付けるサイト名
    pub fn site_name(&self, target_url: &str) -> String {
        if let Some(name) = &self.site_name {
            return name.clone();
        }
        site_from_url(target_url).unwrap_or_else(|| "site".into())
    }
}

/// ホスト名から "www" などを除いた最初のラベル
pub fn site_from_url(target_url: &str) -> Option<String> {
    let parsed = url::Url::parse(target_url).ok()?;
    let host = parsed.host_str()?;
    host.split('.')
        .find(|label| !label.is_empty() && *label != "www")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_from_url() {
        assert_eq!(
            site_from_url("https://www.marketnews.example.gov/portal/fv").as_deref(),
            Some("marketnews")
        );
        assert_eq!(site_from_url("not a url"), None);
    }

    #[test]
    fn test_site_name_override() {
        let config = Config {
            site_name: Some("terminal".into()),
            ..Default::default()
        };
        assert_eq!(config.site_name("https://www.example.com"), "terminal");
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config = serde_json::from_str(r#"{"headless": false, "timings": {"settle_ms": 500}}"#).unwrap();
        assert!(!config.headless);
        assert_eq!(config.timings.settle_ms, 500);
        assert_eq!(config.timings.wait_timeout_ms, 10_000);
        assert_eq!(config.selectors.table_rows, "table.alltable tbody tr");
    }
}
