//! サマリーテーブルからのフロー判定

use crate::types::{Classification, FlowKind, ScrapedTable, SubView};
use regex::Regex;

/// 合計行かどうか（行内のいずれかのセルが "total" を単語として含む）
pub fn is_total_row(row: &[String]) -> bool {
    lazy_static::lazy_static! {
        static ref TOTAL_RE: Regex = Regex::new(r"(?i)\b(grand\s+)?totals?\b").unwrap();
    }
    row.iter().any(|cell| TOTAL_RE.is_match(cell))
}

/// サマリーテーブルを分類
///
/// 合計行を除いたデータ行が1行以下なら single-result。
/// テーブルなし（0行）も single-result 扱いになる点に注意。
pub fn classify(summary: Option<&ScrapedTable>) -> Classification {
    let data_row_count = summary
        .map(|t| t.rows.iter().filter(|r| !is_total_row(r)).count())
        .unwrap_or(0);

    Classification {
        data_row_count,
        is_single_result: data_row_count <= 1,
    }
}

/// 品目が「完了」とみなされるために必要なサブビュー
///
/// - single-result: summary + ページ上に存在するリンク
/// - multi-result: summary + container（存在時のみ）+ variety（container 存在時のみ）
pub fn expected_views(flow: FlowKind, container_present: bool, variety_present: bool) -> Vec<SubView> {
    let mut views = vec![SubView::Summary];
    match flow {
        FlowKind::SingleResult => {
            if container_present {
                views.push(SubView::Container);
            }
            if variety_present {
                views.push(SubView::Variety);
            }
        }
        FlowKind::MultiResult => {
            if container_present {
                views.push(SubView::Container);
                if variety_present {
                    views.push(SubView::Variety);
                }
            }
        }
    }
    views
}
