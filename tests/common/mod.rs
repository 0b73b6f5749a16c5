//! テスト用の偽ブラウザセッション
//!
//! レポートページを単純化して再現する:
//! - フレームに入らないと要素検索は参照切れエラー
//! - 履歴を戻るとフレームから出て、セレクトボックスはプレースホルダに戻る
//! - リンクをクリックすると container / variety のテーブル画面に遷移

#![allow(dead_code)]

use commodity_scraper::config::{Config, Selectors, Timings};
use commodity_scraper::{ElementInfo, Result, ScrapeError, Session};
use std::path::Path;

/// リンク先の振る舞い
#[derive(Debug, Clone)]
pub enum Link {
    /// 行を持つテーブルが表示される
    Table(Vec<&'static str>),
    /// テーブルが空のまま（行待ちがタイムアウトする）
    NeverLoads,
    /// クリック自体が失敗する
    ClickFails,
}

/// 品目選択時の障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// 予期しないドライバエラー
    Fatal,
    /// フレームが消え、履歴を戻るまで復活しない
    FrameLost,
    /// サブビューから最初に戻ったときだけフレームが消える
    LostOnBack,
    /// 選択するとこの品目より後ろが一覧から消える
    Shrink,
}

#[derive(Debug, Clone)]
pub struct FakeItem {
    pub label: String,
    pub summary: Vec<&'static str>,
    pub container: Option<Link>,
    pub variety: Option<Link>,
    pub fault: Option<Fault>,
}

impl FakeItem {
    /// 1行のみ（single-result）
    pub fn single(label: &str) -> Self {
        Self {
            label: label.to_string(),
            summary: vec!["Mexico"],
            container: None,
            variety: None,
            fault: None,
        }
    }

    /// 2行 + 合計行（multi-result）
    pub fn multi(label: &str) -> Self {
        Self {
            summary: vec!["Mexico", "Peru", "Total"],
            ..Self::single(label)
        }
    }

    pub fn container(mut self, link: Link) -> Self {
        self.container = Some(link);
        self
    }

    pub fn variety(mut self, link: Link) -> Self {
        self.variety = Some(link);
        self
    }

    pub fn fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Summary,
    Container,
    Variety,
}

#[derive(Debug)]
pub struct FakeSession {
    pub items: Vec<FakeItem>,
    selectors: Selectors,
    selected: usize,
    view: View,
    history: Vec<View>,
    in_frame: bool,
    frame_blocked: bool,
    back_fault_tripped: bool,
    /// select_option に渡された位置の履歴
    pub selections: Vec<usize>,
    /// クリックされたリンクの文言
    pub clicks: Vec<String>,
    pub back_count: usize,
    pub navigations: usize,
}

impl FakeSession {
    pub fn new(items: Vec<FakeItem>) -> Self {
        Self {
            items,
            selectors: Selectors::default(),
            selected: 0,
            view: View::Summary,
            history: Vec::new(),
            in_frame: false,
            frame_blocked: false,
            back_fault_tripped: false,
            selections: Vec::new(),
            clicks: Vec::new(),
            back_count: 0,
            navigations: 0,
        }
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn current_item(&self) -> Option<&FakeItem> {
        if self.selected == 0 {
            None
        } else {
            self.items.get(self.selected - 1)
        }
    }

    fn require_frame(&self, what: &str) -> Result<()> {
        if self.in_frame {
            Ok(())
        } else {
            Err(ScrapeError::StaleElement(format!("{} looked up outside the frame", what)))
        }
    }

    fn link_rows(link: &Link) -> Vec<&'static str> {
        match link {
            Link::Table(rows) => rows.clone(),
            Link::NeverLoads | Link::ClickFails => Vec::new(),
        }
    }

    fn visible_rows(&self) -> Vec<&'static str> {
        let Some(item) = self.current_item() else {
            return Vec::new();
        };
        match self.view {
            View::Summary => item.summary.clone(),
            View::Container => item.container.as_ref().map(Self::link_rows).unwrap_or_default(),
            View::Variety => item.variety.as_ref().map(Self::link_rows).unwrap_or_default(),
        }
    }

    fn visible_links(&self) -> Vec<(&'static str, View)> {
        let Some(item) = self.current_item() else {
            return Vec::new();
        };
        if self.view != View::Summary {
            return Vec::new();
        }
        let mut links = Vec::new();
        if item.container.is_some() {
            links.push(("Container Report", View::Container));
        }
        if item.variety.is_some() {
            links.push(("Variety Report", View::Variety));
        }
        links
    }

    fn render(&self) -> String {
        let options: String = std::iter::once("-- Select --".to_string())
            .chain(self.items.iter().map(|i| i.label.clone()))
            .map(|l| format!("<option>{}</option>", l))
            .collect();
        let rows: String = self
            .visible_rows()
            .iter()
            .map(|origin| {
                format!(
                    "<tr><td class=\"tleft2\">{}</td><td class=\"tleft\">10.00</td><td class=\"tleft\">12.00</td></tr>",
                    origin
                )
            })
            .collect();
        format!(
            "<html><body><div id=\"right2\">Report for <b>Oct 17, 2026</b></div>\
             <select>{}</select>\
             <table class=\"alltable\"><thead><tr><th class=\"header\">Origin</th>\
             <th class=\"header\">Low</th><th class=\"header\">High</th></tr></thead>\
             <tbody>{}</tbody></table></body></html>",
            options, rows
        )
    }
}

impl Session for FakeSession {
    fn navigate(&mut self, _url: &str) -> Result<()> {
        self.navigations += 1;
        self.in_frame = false;
        self.frame_blocked = false;
        self.selected = 0;
        self.view = View::Summary;
        self.history.clear();
        Ok(())
    }

    fn switch_to_default(&mut self) -> Result<()> {
        self.in_frame = false;
        Ok(())
    }

    fn switch_to_frame(&mut self, frame_selector: &str) -> Result<bool> {
        assert_eq!(frame_selector, self.selectors.frame);
        if self.frame_blocked {
            return Ok(false);
        }
        self.in_frame = true;
        Ok(true)
    }

    fn find_elements(&mut self, selector: &str) -> Result<Vec<ElementInfo>> {
        self.require_frame(selector)?;

        let texts: Vec<String> = if selector == self.selectors.catalog_options() {
            std::iter::once("-- Select --".to_string())
                .chain(self.items.iter().map(|i| i.label.clone()))
                .collect()
        } else if selector == self.selectors.table_rows {
            self.visible_rows().iter().map(|r| r.to_string()).collect()
        } else if selector == self.selectors.links {
            self.visible_links().iter().map(|(t, _)| t.to_string()).collect()
        } else {
            Vec::new()
        };

        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| ElementInfo { index, text })
            .collect())
    }

    fn click(&mut self, selector: &str, nth: usize) -> Result<()> {
        self.require_frame(selector)?;
        let links = self.visible_links();
        let (text, target) = links
            .get(nth)
            .copied()
            .ok_or_else(|| ScrapeError::StaleElement(format!("{}[{}]", selector, nth)))?;

        let item = self.current_item().cloned().expect("item selected");
        let link = match target {
            View::Container => item.container,
            View::Variety => item.variety,
            View::Summary => None,
        };
        if matches!(link, Some(Link::ClickFails)) {
            return Err(ScrapeError::Browser("element click intercepted".into()));
        }

        self.clicks.push(text.to_string());
        self.history.push(self.view);
        self.view = target;
        Ok(())
    }

    fn select_option(&mut self, select_selector: &str, index: usize) -> Result<()> {
        self.require_frame(select_selector)?;
        assert_eq!(select_selector, self.selectors.catalog);
        if index > self.items.len() {
            return Err(ScrapeError::ElementNotFound(format!("option #{}", index)));
        }

        self.selections.push(index);
        if let Some(fault) = index.checked_sub(1).and_then(|i| self.items[i].fault) {
            match fault {
                Fault::Fatal => return Err(ScrapeError::Browser("session crashed".into())),
                Fault::FrameLost => {
                    self.in_frame = false;
                    self.frame_blocked = true;
                }
                Fault::Shrink => self.items.truncate(index),
                Fault::LostOnBack => {}
            }
        }

        self.selected = index;
        self.view = View::Summary;
        Ok(())
    }

    fn go_back(&mut self) -> Result<()> {
        self.back_count += 1;
        let lose_frame = !self.back_fault_tripped
            && self.current_item().and_then(|i| i.fault) == Some(Fault::LostOnBack);
        self.in_frame = false;
        self.frame_blocked = lose_frame;
        if lose_frame {
            self.back_fault_tripped = true;
        }
        if let Some(previous) = self.history.pop() {
            self.view = previous;
        }
        // サイト側でセレクトボックスが初期状態に戻る
        self.selected = 0;
        Ok(())
    }

    fn page_source(&mut self) -> Result<String> {
        self.require_frame("page source")?;
        Ok(self.render())
    }
}

/// 待機をほぼゼロにしたテスト用設定
pub fn test_config(state_dir: &Path) -> Config {
    Config {
        target_url: Some("https://www.marketnews.example.gov/fv".into()),
        state_dir: state_dir.to_path_buf(),
        output_dir: state_dir.join("data").join("raw"),
        timings: Timings {
            wait_timeout_ms: 40,
            poll_interval_ms: 1,
            settle_ms: 0,
            render_settle_ms: 0,
        },
        ..Default::default()
    }
}

pub const TARGET: &str = "https://www.marketnews.example.gov/fv";
