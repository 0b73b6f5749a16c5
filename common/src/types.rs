//! スクレイピング結果・進捗状態の型定義
//!
//! - SubView: 品目ごとに取得するテーブルの種類
//! - FlowKind / Classification: サマリーテーブルから決まる遷移フロー
//! - RunState: チェックポイントファイルの中身
//! - ScrapedTable: パース済みテーブル（メタデータ付き）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 品目ごとのテーブル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubView {
    Summary,
    Container,
    Variety,
}

impl SubView {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubView::Summary => "summary",
            SubView::Container => "container",
            SubView::Variety => "variety",
        }
    }
}

impl fmt::Display for SubView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 遷移フロー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// データ行が1行以下
    SingleResult,
    /// データ行が2行以上
    MultiResult,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::SingleResult => write!(f, "single-result"),
            FlowKind::MultiResult => write!(f, "multi-result"),
        }
    }
}

/// サマリーテーブルの分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// 合計行を除いたデータ行数
    pub data_row_count: usize,
    pub is_single_result: bool,
}

impl Classification {
    pub fn flow(&self) -> FlowKind {
        if self.is_single_result {
            FlowKind::SingleResult
        } else {
            FlowKind::MultiResult
        }
    }
}

/// チェックポイント（実行位置）
///
/// `current_index` は処理中（未完了の可能性あり）の品目の直前を指す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    pub current_index: usize,
    pub current_commodity: Option<String>,
    pub completed: Vec<String>,
    pub timestamp: String,
    pub run_id: String,
}

impl RunState {
    /// 再開時に最初に走査する位置（0はプレースホルダなので最低1）
    pub fn resume_start(&self) -> usize {
        (self.current_index + 1).max(1)
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.completed.iter().any(|c| c == name)
    }
}

/// テーブルに付与するメタデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub scrape_date: String,
    pub commodity: String,
    pub view: String,
    pub run_id: String,
}

impl TableMeta {
    pub const COLUMNS: [&'static str; 4] = ["scrape_date", "commodity", "view", "run_id"];

    pub fn values(&self) -> [&str; 4] {
        [&self.scrape_date, &self.commodity, &self.view, &self.run_id]
    }
}

/// パース済みテーブル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub meta: Option<TableMeta>,
}

impl ScrapedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows, meta: None }
    }

    pub fn with_meta(mut self, meta: TableMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
