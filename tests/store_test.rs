//! チェックポイント・完了台帳の永続化テスト
//!
//! 2つのファイルが独立していることを検証

use commodity_scraper_common::checkpoint::CHECKPOINT_FILE_NAME;
use commodity_scraper_common::ledger::LEDGER_FILE_NAME;
use commodity_scraper_common::{CheckpointStore, CompletionLedger, RunState, SubView};
use tempfile::tempdir;

/// チェックポイント削除は台帳に影響しない
#[test]
fn test_clear_checkpoint_keeps_ledger() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = CheckpointStore::new(dir.path());
    let mut ledger = CompletionLedger::default();

    store.save_position(0, "Apples", &[], "run-1").unwrap();
    ledger
        .save_completed_item(dir.path(), "Apples", &[SubView::Summary])
        .unwrap();

    assert!(store.clear().unwrap());
    assert!(!dir.path().join(CHECKPOINT_FILE_NAME).exists());
    assert!(dir.path().join(LEDGER_FILE_NAME).exists());
    assert_eq!(CompletionLedger::load(dir.path()).len(), 1);
}

/// チェックポイントのJSON形式
#[test]
fn test_checkpoint_file_layout() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = CheckpointStore::new(dir.path());
    store
        .save_position(4, "Hass Avocados", &["Apples".to_string()], "run-20261017T090000")
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join(CHECKPOINT_FILE_NAME)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["current_index"], 4);
    assert_eq!(value["current_commodity"], "Hass Avocados");
    assert_eq!(value["completed"], serde_json::json!(["Apples"]));
    assert_eq!(value["run_id"], "run-20261017T090000");
    assert!(value["timestamp"].is_string());
}

/// 台帳が古いチェックポイントより進んでいても、台帳側で完了判定できる
#[test]
fn test_ledger_independent_of_checkpoint() {
    let dir = tempdir().expect("Failed to create temp dir");
    CheckpointStore::new(dir.path()).save(&RunState::default()).unwrap();

    let mut ledger = CompletionLedger::default();
    ledger
        .save_completed_item(dir.path(), "Bananas", &[SubView::Summary, SubView::Container])
        .unwrap();

    let state = CheckpointStore::new(dir.path()).load();
    let loaded = CompletionLedger::load(dir.path());
    assert!(!state.is_completed("Bananas"));
    assert!(loaded.is_item_complete("Bananas", &[SubView::Summary, SubView::Container]));
}

/// 壊れた台帳は空として扱う
#[test]
fn test_corrupted_ledger() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join(LEDGER_FILE_NAME), "[1, 2").unwrap();
    assert!(CompletionLedger::load(dir.path()).is_empty());
}
