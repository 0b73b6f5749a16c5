//! レポートHTMLのパース
//!
//! - `table.alltable`: 結果テーブル（thead/tbody が揃っていない場合は「データなし」）
//! - `div#right2 b`: レポート日付

use crate::types::ScrapedTable;
use scraper::{ElementRef, Html, Selector};

lazy_static::lazy_static! {
    static ref TABLE_SEL: Selector = Selector::parse("table.alltable").unwrap();
    static ref THEAD_SEL: Selector = Selector::parse("thead").unwrap();
    static ref TBODY_SEL: Selector = Selector::parse("tbody").unwrap();
    static ref HEADER_SEL: Selector = Selector::parse("th.header").unwrap();
    static ref ROW_SEL: Selector = Selector::parse("tr").unwrap();
    static ref FIRST_CELL_SEL: Selector = Selector::parse("td.tleft2").unwrap();
    static ref CELL_SEL: Selector = Selector::parse("td.tleft").unwrap();
    static ref DATE_SEL: Selector = Selector::parse("div#right2 b").unwrap();
}

/// 要素内テキストを各断片ごとにtrimして連結
fn cell_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect::<Vec<_>>().join("")
}

/// 結果テーブルをパース
///
/// テーブルが無い、または thead/tbody が欠けている場合は `None`。
/// 各行はヘッダー数に合わせて空文字で補完・切り詰めする。
pub fn parse_table(html: &str) -> Option<ScrapedTable> {
    let doc = Html::parse_document(html);
    let table = doc.select(&TABLE_SEL).next()?;
    let thead = table.select(&THEAD_SEL).next()?;
    let tbody = table.select(&TBODY_SEL).next()?;

    let headers: Vec<String> = thead.select(&HEADER_SEL).map(cell_text).collect();

    let mut rows = Vec::new();
    for tr in tbody.select(&ROW_SEL) {
        let mut row = Vec::new();
        if let Some(first) = tr.select(&FIRST_CELL_SEL).next() {
            row.push(cell_text(first));
        }
        row.extend(tr.select(&CELL_SEL).map(cell_text));

        if !headers.is_empty() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Some(ScrapedTable::new(headers, rows))
}

/// レポート日付（`div#right2` 内の `<b>`）
pub fn scrape_date(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let date = doc.select(&DATE_SEL).next().map(cell_text)?;
    if date.is_empty() {
        None
    } else {
        Some(date)
    }
}
