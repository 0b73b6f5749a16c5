//! 完了台帳（品目名 → 取得済みサブビュー）
//!
//! チェックポイントとは独立に保存され、自動で削除されることはない。
//! 記録は既存の種別との和集合になるので台帳は増える一方。

use crate::error::Result;
use crate::persist::write_json_atomic;
use crate::types::SubView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const LEDGER_FILE_NAME: &str = "completed_commodities.json";

/// `{"<品目名>": ["summary", ...], ...}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger {
    entries: BTreeMap<String, Vec<SubView>>,
}

impl CompletionLedger {
    pub fn file_path(state_dir: &Path) -> PathBuf {
        state_dir.join(LEDGER_FILE_NAME)
    }

    /// 台帳を読み込み（無い・壊れている場合は空）
    pub fn load(state_dir: &Path) -> Self {
        let path = Self::file_path(state_dir);
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ledger unreadable, treating as empty");
                return Self::default();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ledger corrupted, treating as empty");
                Self::default()
            }
        }
    }

    pub fn save(&self, state_dir: &Path) -> Result<()> {
        write_json_atomic(&Self::file_path(state_dir), self)
    }

    /// 取得済み種別を追記（既存分との和集合、順序は summary → container → variety）
    pub fn record(&mut self, name: &str, kinds: &[SubView]) {
        let entry = self.entries.entry(name.to_string()).or_default();
        for kind in kinds {
            if !entry.contains(kind) {
                entry.push(*kind);
            }
        }
        entry.sort();
    }

    /// 記録して即保存
    pub fn save_completed_item(&mut self, state_dir: &Path, name: &str, kinds: &[SubView]) -> Result<()> {
        self.record(name, kinds);
        self.save(state_dir)
    }

    /// 記録済み種別が `expected` をすべて含むか
    pub fn is_item_complete(&self, name: &str, expected: &[SubView]) -> bool {
        match self.entries.get(name) {
            Some(kinds) => expected.iter().all(|k| kinds.contains(k)),
            None => false,
        }
    }

    pub fn kinds(&self, name: &str) -> Option<&[SubView]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<SubView>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 台帳ファイルを削除（手動リセット用）
    pub fn clear(state_dir: &Path) -> Result<bool> {
        let path = Self::file_path(state_dir);
        if path.exists() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_superset_is_complete() {
        let mut ledger = CompletionLedger::default();
        ledger.record("Apples", &[SubView::Summary, SubView::Container, SubView::Variety]);

        assert!(ledger.is_item_complete("Apples", &[SubView::Summary]));
        assert!(ledger.is_item_complete("Apples", &[SubView::Summary, SubView::Variety]));
        assert!(!ledger.is_item_complete("Pears", &[SubView::Summary]));
    }

    #[test]
    fn test_missing_kind_is_incomplete() {
        let mut ledger = CompletionLedger::default();
        ledger.record("Apples", &[SubView::Summary]);
        assert!(!ledger.is_item_complete("Apples", &[SubView::Summary, SubView::Container]));
    }

    #[test]
    fn test_record_is_union() {
        let mut ledger = CompletionLedger::default();
        ledger.record("Apples", &[SubView::Summary, SubView::Variety]);
        ledger.record("Apples", &[SubView::Summary, SubView::Container]);
        assert_eq!(
            ledger.kinds("Apples").unwrap(),
            &[SubView::Summary, SubView::Container, SubView::Variety]
        );
    }

    #[test]
    fn test_file_format() {
        let dir = tempdir().unwrap();
        let mut ledger = CompletionLedger::default();
        ledger
            .save_completed_item(dir.path(), "Hass Avocados", &[SubView::Summary])
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join(LEDGER_FILE_NAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"Hass Avocados": ["summary"]}));

        let loaded = CompletionLedger::load(dir.path());
        assert_eq!(loaded, ledger);
    }
}
