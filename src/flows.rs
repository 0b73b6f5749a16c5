//! 品目ごとの遷移フロー
//!
//! どちらのフローも summary を最初に保存し、その後 container → variety の順にリンクを辿る。
//! リンクが無ければ黙ってスキップ、リンクはあるが失敗した場合はログを残してスキップ
//! （品目自体は中断しない）。取得できた種別は `captured()` に順次積まれるので、
//! summary への戻り遷移でエラーになっても呼び出し元はそこまでの成果を記録できる。

use crate::browser::Session;
use crate::catalog::reselect_by_label;
use crate::config::{Selectors, Timings};
use crate::detector::{wait_for_rows, wait_for_table_change};
use crate::error::Result;
use crate::export::TableWriter;
use crate::frame::enter_content_frame;
use crate::wait::settle;
use commodity_scraper_common::{parse_table, FlowKind, ScrapedTable, SubView};
use std::path::PathBuf;

/// 処理中の品目
#[derive(Debug, Clone)]
pub struct ItemContext {
    pub label: String,
    /// レポート日付（ファイル名・メタデータ用）
    pub date: String,
    /// summary 取得時の行数（テーブル更新検知の基準）
    pub baseline: usize,
    pub summary: Option<ScrapedTable>,
}

/// リンククリック後の待ち方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitMode {
    /// 固定待機のみ（内容が変わらない場合がある）
    Settle,
    /// 行数が基準から変わるまで
    TableChange(usize),
    /// 1行以上になるまで
    Rows,
}

pub struct Navigator<'a, S: Session + ?Sized> {
    session: &'a mut S,
    selectors: &'a Selectors,
    timings: &'a Timings,
    writer: &'a TableWriter,
    captured: Vec<SubView>,
    written: Vec<PathBuf>,
}

impl<'a, S: Session + ?Sized> Navigator<'a, S> {
    pub fn new(
        session: &'a mut S,
        selectors: &'a Selectors,
        timings: &'a Timings,
        writer: &'a TableWriter,
    ) -> Self {
        Self {
            session,
            selectors,
            timings,
            writer,
            captured: Vec::new(),
            written: Vec::new(),
        }
    }

    /// ここまでに取得できたサブビュー（summary → container → variety の順）
    pub fn captured(&self) -> &[SubView] {
        &self.captured
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }

    fn link_text(&self, view: SubView) -> &str {
        match view {
            SubView::Container => &self.selectors.container_link_text,
            SubView::Variety => &self.selectors.variety_link_text,
            SubView::Summary => "",
        }
    }

    /// サブビューへのリンクの位置（リンク用セレクタ内での順番）
    pub fn find_link(&mut self, view: SubView) -> Result<Option<usize>> {
        if view == SubView::Summary {
            return Ok(None);
        }
        let needle = self.link_text(view).to_lowercase();
        let links = self.session.find_elements(&self.selectors.links)?;
        Ok(links
            .into_iter()
            .find(|l| l.text.to_lowercase().contains(&needle))
            .map(|l| l.index))
    }

    pub fn link_present(&mut self, view: SubView) -> Result<bool> {
        Ok(self.find_link(view)?.is_some())
    }

    /// フローを実行し、取得できたサブビューを順に返す（summary は常に含む）
    pub fn run(&mut self, flow: FlowKind, item: &ItemContext) -> Result<Vec<SubView>> {
        match &item.summary {
            Some(table) => self.save(item, SubView::Summary, table.clone())?,
            None => tracing::info!(commodity = %item.label, "summary table empty, nothing to save"),
        }
        self.captured.push(SubView::Summary);

        match flow {
            FlowKind::SingleResult => self.run_single(item)?,
            FlowKind::MultiResult => self.run_multi(item)?,
        }
        Ok(self.captured.clone())
    }

    /// single-result: container は固定待機、戻ったらラベルで再選択してから variety
    fn run_single(&mut self, item: &ItemContext) -> Result<()> {
        self.follow(item, SubView::Container, WaitMode::Settle, true)?;
        self.follow(item, SubView::Variety, WaitMode::Rows, false)
    }

    /// multi-result: container が前提。無ければ summary のみ
    fn run_multi(&mut self, item: &ItemContext) -> Result<()> {
        if !self.link_present(SubView::Container)? {
            tracing::info!(commodity = %item.label, "no container link, variety not attempted");
            return Ok(());
        }

        self.follow(item, SubView::Container, WaitMode::TableChange(item.baseline), true)?;
        self.follow(item, SubView::Variety, WaitMode::Rows, false)
    }

    /// リンクを辿って保存し、summary 画面に戻る
    ///
    /// クリック・待機・保存の失敗はログのみ。戻り遷移の失敗だけは呼び出し元へ返す
    /// （取得済みの種別は先に `captured` へ積んである）。
    fn follow(
        &mut self,
        item: &ItemContext,
        view: SubView,
        wait: WaitMode,
        reselect_after: bool,
    ) -> Result<()> {
        let Some(nth) = self.find_link(view)? else {
            tracing::debug!(commodity = %item.label, %view, "link absent");
            return Ok(());
        };

        if let Err(e) = self.session.click(&self.selectors.links, nth) {
            tracing::warn!(commodity = %item.label, %view, error = %e, "click failed, sub-view skipped");
            return Ok(());
        }

        match self.wait_and_capture(item, view, wait) {
            Ok(()) => self.captured.push(view),
            Err(e) => tracing::warn!(commodity = %item.label, %view, error = %e, "sub-view skipped"),
        }

        self.return_to_summary(&item.label, reselect_after)
    }

    fn wait_and_capture(&mut self, item: &ItemContext, view: SubView, wait: WaitMode) -> Result<()> {
        match wait {
            WaitMode::Settle => settle(self.timings.settle()),
            WaitMode::TableChange(baseline) => {
                wait_for_table_change(&mut *self.session, self.selectors, self.timings, baseline)?;
            }
            WaitMode::Rows => {
                wait_for_rows(&mut *self.session, self.selectors, self.timings)?;
            }
        }

        let html = self.session.page_source()?;
        match parse_table(&html) {
            Some(table) => self.save(item, view, table),
            None => {
                tracing::info!(commodity = %item.label, %view, "table empty, nothing to save");
                Ok(())
            }
        }
    }

    fn save(&mut self, item: &ItemContext, view: SubView, table: ScrapedTable) -> Result<()> {
        let path = self.writer.write(&item.label, view, &item.date, table)?;
        tracing::info!(commodity = %item.label, %view, path = %path.display(), "saved");
        self.written.push(path);
        Ok(())
    }

    /// 履歴を戻ってフレームに入り直し、必要なら同じ品目をラベルで選び直す
    fn return_to_summary(&mut self, label: &str, reselect: bool) -> Result<()> {
        self.session.go_back()?;
        enter_content_frame(&mut *self.session, self.selectors, self.timings)?;
        if reselect {
            reselect_by_label(&mut *self.session, self.selectors, label)?;
            settle(self.timings.settle());
        }
        Ok(())
    }
}
