//! CSV出力

use crate::types::{ScrapedTable, TableMeta};
use std::io::{self, Write};

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// 1行書き出し
pub fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    writeln!(w)
}

/// テーブル全体（ヘッダー + メタデータ列）を書き出し
pub fn write_table<W: Write>(w: &mut W, table: &ScrapedTable) -> io::Result<()> {
    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    if table.meta.is_some() {
        header.extend(TableMeta::COLUMNS);
    }
    write_row(w, &header[..])?;

    for row in &table.rows {
        let mut line: Vec<&str> = row.iter().map(String::as_str).collect();
        if let Some(meta) = &table.meta {
            line.extend(meta.values());
        }
        write_row(w, &line[..])?;
    }
    Ok(())
}

pub fn table_to_string(table: &ScrapedTable) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_table(&mut buf, table);
    String::from_utf8_lossy(&buf).into_owned()
}
