//! 実行ドライバ
//!
//! Init → 品目選択 → 分類 → フロー実行 → 完了記録 を品目ごとに繰り返す。
//! - タイムアウト・参照切れ: ログを残して復帰を試み、次の品目へ
//! - それ以外: チェックポイントを保存し、復帰を試みてからエラーを返して停止
//! - 最後まで到達したらチェックポイントを削除（完了台帳は残す）
//! - 途中で品目一覧が縮んだ場合はチェックポイントを残したまま終了

use crate::browser::Session;
use crate::catalog::{select_index, Catalog};
use crate::config::Config;
use crate::detector::row_count;
use crate::error::Result;
use crate::export::TableWriter;
use crate::flows::{ItemContext, Navigator};
use crate::frame::enter_content_frame;
use crate::wait::settle;
use commodity_scraper_common::{
    classify, expected_views, parse_table, scrape_date, CheckpointStore, CompletionLedger, SubView,
};
use indicatif::ProgressBar;
use std::path::PathBuf;

/// 実行結果の集計
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub run_id: String,
    /// フローを実行した品目
    pub processed: Vec<String>,
    /// チェックポイント・台帳により飛ばした品目
    pub skipped: Vec<String>,
    /// タイムアウト等で中断した品目
    pub failed: Vec<String>,
    pub files_written: Vec<PathBuf>,
}

enum ItemOutcome {
    Processed(Vec<SubView>),
    Skipped,
    Missing,
}

pub fn new_run_id() -> String {
    format!("run-{}", chrono::Local::now().format("%Y%m%dT%H%M%S"))
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub struct Runner<'a, S: Session + ?Sized> {
    session: &'a mut S,
    config: &'a Config,
    target_url: String,
    checkpoints: CheckpointStore,
    progress: ProgressBar,
    current: Option<String>,
}

impl<'a, S: Session + ?Sized> Runner<'a, S> {
    pub fn new(session: &'a mut S, config: &'a Config, target_url: impl Into<String>) -> Self {
        Self {
            session,
            config,
            target_url: target_url.into(),
            checkpoints: CheckpointStore::new(&config.state_dir),
            progress: ProgressBar::hidden(),
            current: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let state = self.checkpoints.load();
        let mut ledger = CompletionLedger::load(&self.config.state_dir);

        let run_id = if state.run_id.is_empty() { new_run_id() } else { state.run_id.clone() };
        let site = self.config.site_name(&self.target_url);
        let writer = TableWriter::new(&self.config.output_dir, &site, &run_id);
        let mut completed = state.completed.clone();
        let start = state.resume_start();

        let mut summary = RunSummary {
            run_id: run_id.clone(),
            ..Default::default()
        };

        tracing::info!(%run_id, start, completed = completed.len(), ledger = ledger.len(), "run starting");

        self.session.navigate(&self.target_url)?;
        enter_content_frame(&mut *self.session, &self.config.selectors, &self.config.timings)?;
        let total = Catalog::read(&mut *self.session, &self.config.selectors)?.len();
        tracing::info!(items = total.saturating_sub(1), "catalog loaded");

        self.progress.set_length(total.saturating_sub(start) as u64);

        for index in start..total {
            self.current = None;
            match self.process_index(index, &mut completed, &mut ledger, &writer, &mut summary) {
                Ok(ItemOutcome::Processed(kinds)) => {
                    tracing::info!(index, commodity = ?self.current, ?kinds, "item done");
                }
                Ok(ItemOutcome::Skipped) => {}
                Ok(ItemOutcome::Missing) => {
                    tracing::warn!(index, total, "catalog shrank, stopping early and keeping checkpoint");
                    self.progress.abandon();
                    return Ok(summary);
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(index, commodity = ?self.current, error = %e, "item abandoned, moving on");
                    if let Some(label) = self.current.clone() {
                        summary.failed.push(label);
                    }
                    self.recover();
                }
                Err(e) => {
                    tracing::error!(index, commodity = ?self.current, error = ?e, "unexpected failure, halting run");
                    let label = self.current.clone().unwrap_or_default();
                    if let Err(save_err) =
                        self.checkpoints
                            .save_position(index.saturating_sub(1), &label, &completed, &run_id)
                    {
                        tracing::error!(error = %save_err, "checkpoint could not be saved");
                    }
                    self.recover();
                    self.progress.abandon();
                    return Err(e);
                }
            }
            self.progress.inc(1);
        }

        self.checkpoints.clear()?;
        self.progress.finish_and_clear();
        tracing::info!(
            processed = summary.processed.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "run complete"
        );
        Ok(summary)
    }

    fn process_index(
        &mut self,
        index: usize,
        completed: &mut Vec<String>,
        ledger: &mut CompletionLedger,
        writer: &TableWriter,
        summary: &mut RunSummary,
    ) -> Result<ItemOutcome> {
        let config = self.config;
        let selectors = &config.selectors;
        let timings = &config.timings;

        enter_content_frame(&mut *self.session, selectors, timings)?;
        let catalog = Catalog::read(&mut *self.session, selectors)?;
        let Some(item) = catalog.item(index) else {
            return Ok(ItemOutcome::Missing);
        };
        let label = item.label;
        self.current = Some(label.clone());
        self.progress.set_message(label.clone());

        if completed.contains(&label) {
            tracing::debug!(index, commodity = %label, "already completed in this pass");
            summary.skipped.push(label);
            return Ok(ItemOutcome::Skipped);
        }

        self.checkpoints
            .save_position(index - 1, &label, completed, writer.run_id())?;

        select_index(&mut *self.session, selectors, index)?;
        settle(timings.settle());

        let html = self.session.page_source()?;
        let date = scrape_date(&html).unwrap_or_else(today);
        let summary_table = parse_table(&html);
        let baseline = row_count(&mut *self.session, selectors)?;
        let classification = classify(summary_table.as_ref());
        let flow = classification.flow();
        tracing::debug!(
            commodity = %label,
            rows = classification.data_row_count,
            %flow,
            "classified"
        );

        let mut nav = Navigator::new(&mut *self.session, selectors, timings, writer);
        let expected = expected_views(
            flow,
            nav.link_present(SubView::Container)?,
            nav.link_present(SubView::Variety)?,
        );
        if ledger.is_item_complete(&label, &expected) {
            tracing::info!(commodity = %label, ?expected, "already in ledger, skipped");
            completed.push(label.clone());
            summary.skipped.push(label);
            return Ok(ItemOutcome::Skipped);
        }

        let item_ctx = ItemContext {
            label: label.clone(),
            date,
            baseline,
            summary: summary_table,
        };
        let outcome = nav.run(flow, &item_ctx);
        let kinds = nav.captured().to_vec();
        summary.files_written.extend(nav.into_written());

        if let Err(e) = outcome {
            // 戻り遷移で失敗しても、保存済みのサブビューは台帳に残す
            if !kinds.is_empty() {
                tracing::warn!(commodity = %label, ?kinds, error = %e, "item interrupted, recording captured sub-views");
                ledger.save_completed_item(&config.state_dir, &label, &kinds)?;
            }
            return Err(e);
        }

        ledger.save_completed_item(&config.state_dir, &label, &kinds)?;
        completed.push(label.clone());
        summary.processed.push(label);
        Ok(ItemOutcome::Processed(kinds))
    }

    /// 履歴を戻ってフレームに入り直す。だめなら対象URLを開き直す
    fn recover(&mut self) {
        if let Err(e) = self.recover_by_history() {
            tracing::warn!(error = %e, "history recovery failed, reloading target");
            let reload = self
                .session
                .navigate(&self.target_url)
                .and_then(|_| enter_content_frame(&mut *self.session, &self.config.selectors, &self.config.timings));
            if let Err(e) = reload {
                tracing::error!(error = %e, "recovery failed");
            }
        }
    }

    fn recover_by_history(&mut self) -> Result<()> {
        self.session.switch_to_default()?;
        self.session.go_back()?;
        enter_content_frame(&mut *self.session, &self.config.selectors, &self.config.timings)
    }
}
