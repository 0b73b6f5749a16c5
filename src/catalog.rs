//! 品目セレクトボックスの操作
//!
//! 位置0はプレースホルダ。遷移のたびに選択肢を引き直す。

use crate::browser::Session;
use crate::config::Selectors;
use crate::error::{Result, ScrapeError};

/// 品目（ページから毎回読み直す）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub index: usize,
    pub label: String,
}

/// 選択肢ラベルのスナップショット
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    labels: Vec<String>,
}

impl Catalog {
    /// 現在のフレームから選択肢を読み取る
    pub fn read<S: Session + ?Sized>(session: &mut S, selectors: &Selectors) -> Result<Self> {
        let labels = session
            .find_elements(&selectors.catalog_options())?
            .into_iter()
            .map(|e| e.text)
            .collect();
        Ok(Self { labels })
    }

    /// プレースホルダを含む選択肢の総数
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// プレースホルダを除いた品目数
    pub fn item_count(&self) -> usize {
        self.labels.len().saturating_sub(1)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn item(&self, index: usize) -> Option<CatalogItem> {
        if index == 0 {
            return None;
        }
        self.labels.get(index).map(|label| CatalogItem {
            index,
            label: label.clone(),
        })
    }

    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, l)| l.as_str() == label)
            .map(|(i, _)| i)
    }
}

/// 位置を指定して選択（呼び出し側で settle 待機すること）
pub fn select_index<S: Session + ?Sized>(session: &mut S, selectors: &Selectors, index: usize) -> Result<()> {
    session.select_option(&selectors.catalog, index)
}

/// ラベルで選び直す
///
/// 前提: コンテンツフレームに入っていて、セレクトボックスが表示されていること。
/// 遷移後は位置が変わりうるので、選択肢を読み直してラベルで位置を探す。
pub fn reselect_by_label<S: Session + ?Sized>(
    session: &mut S,
    selectors: &Selectors,
    label: &str,
) -> Result<CatalogItem> {
    let catalog = Catalog::read(session, selectors)?;
    let index = catalog
        .position_of(label)
        .ok_or_else(|| ScrapeError::StaleElement(format!("catalog option '{}'", label)))?;
    select_index(session, selectors, index)?;
    Ok(CatalogItem {
        index,
        label: label.to_string(),
    })
}
