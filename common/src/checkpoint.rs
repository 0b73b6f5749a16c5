//! チェックポイント（実行位置）の永続化
//!
//! 品目の処理を始める直前に保存し、全品目を処理し終えたときだけ削除する。
//! 途中でプロセスが落ちた場合は同じ品目から再開される。

use crate::error::Result;
use crate::persist::write_json_atomic;
use crate::types::RunState;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const CHECKPOINT_FILE_NAME: &str = "scraper_checkpoint.json";

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(state_dir: &Path) -> Self {
        Self { path: state_dir.join(CHECKPOINT_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// チェックポイントを読み込み（無い・壊れている場合は初期状態）
    pub fn load(&self) -> RunState {
        if !self.path.exists() {
            return RunState::default();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint unreadable, starting from the top");
                return RunState::default();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint corrupted, starting from the top");
                RunState::default()
            }
        }
    }

    pub fn save(&self, state: &RunState) -> Result<()> {
        write_json_atomic(&self.path, state)
    }

    /// 位置を記録して保存したRunStateを返す
    pub fn save_position(
        &self,
        index: usize,
        commodity: &str,
        completed: &[String],
        run_id: &str,
    ) -> Result<RunState> {
        let state = RunState {
            current_index: index,
            current_commodity: Some(commodity.to_string()),
            completed: completed.to_vec(),
            timestamp: chrono::Local::now().to_rfc3339(),
            run_id: run_id.to_string(),
        };
        self.save(&state)?;
        Ok(state)
    }

    /// チェックポイントを削除（存在しなかった場合は false）
    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
