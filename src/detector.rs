//! 結果テーブルの更新検知
//!
//! 行数だけを見る: 変化なし = 未更新、0行 = 読み込み中、変化あり かつ 1行以上 = 更新済み。

use crate::browser::Session;
use crate::config::{Selectors, Timings};
use crate::error::Result;
use crate::wait::{poll_until, settle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    NotUpdated,
    Loading,
    Updated(usize),
}

impl TableState {
    pub fn from_counts(baseline: usize, current: usize) -> Self {
        if current == 0 {
            TableState::Loading
        } else if current == baseline {
            TableState::NotUpdated
        } else {
            TableState::Updated(current)
        }
    }
}

pub fn row_count<S: Session + ?Sized>(session: &mut S, selectors: &Selectors) -> Result<usize> {
    Ok(session.find_elements(&selectors.table_rows)?.len())
}

/// 行数が `baseline` から変わり、かつ1行以上になるまで待つ（その後描画待ち）
pub fn wait_for_table_change<S: Session + ?Sized>(
    session: &mut S,
    selectors: &Selectors,
    timings: &Timings,
    baseline: usize,
) -> Result<usize> {
    let count = poll_until(timings.wait_timeout(), timings.poll_interval(), "result table change", || {
        let current = row_count(session, selectors)?;
        Ok(match TableState::from_counts(baseline, current) {
            TableState::Updated(n) => Some(n),
            state => {
                tracing::trace!(baseline, current, ?state, "table not updated yet");
                None
            }
        })
    })?;
    settle(timings.render_settle());
    Ok(count)
}

/// 1行以上になるまで待つ（比較対象がない場合）
pub fn wait_for_rows<S: Session + ?Sized>(
    session: &mut S,
    selectors: &Selectors,
    timings: &Timings,
) -> Result<usize> {
    poll_until(timings.wait_timeout(), timings.poll_interval(), "result table rows", || {
        let current = row_count(session, selectors)?;
        Ok((current > 0).then_some(current))
    })
}
