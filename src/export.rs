//! スクレイピング結果のCSV保存
//!
//! パスは `<output_dir>/<site>_<品目>_<種別>_<日付>.csv`。同じ組み合わせは上書きされる
//! （再実行時の重複判定は完了台帳が担う）。

use crate::error::Result;
use commodity_scraper_common::csv::write_table;
use commodity_scraper_common::{artifact_file_name, ScrapedTable, SubView, TableMeta};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    site: String,
    run_id: String,
}

impl TableWriter {
    pub fn new(output_dir: &Path, site: &str, run_id: &str) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            site: site.to_string(),
            run_id: run_id.to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn path_for(&self, commodity: &str, view: SubView, date: &str) -> PathBuf {
        self.output_dir
            .join(artifact_file_name(&self.site, commodity, view.as_str(), date))
    }

    /// メタデータを付けて書き出し、書いたパスを返す
    pub fn write(&self, commodity: &str, view: SubView, date: &str, table: ScrapedTable) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let table = table.with_meta(TableMeta {
            scrape_date: date.to_string(),
            commodity: commodity.to_string(),
            view: view.to_string(),
            run_id: self.run_id.clone(),
        });

        let path = self.path_for(commodity, view, date);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_table(&mut writer, &table)?;
        writer.flush()?;

        tracing::debug!(path = %path.display(), rows = table.len(), "table written");
        Ok(path)
    }
}
