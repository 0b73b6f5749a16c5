//! 状態ファイルの書き込み（一時ファイル → リネーム）

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

fn state_write(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::StateWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// `<name>.json.tmp` に書いてから置き換える。途中で落ちても元のファイルは壊れない
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(state_write(parent))?;
    }

    let tmp = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp).map_err(state_write(&tmp))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush().map_err(state_write(&tmp))?;
    }
    fs::rename(&tmp, path).map_err(state_write(path))?;
    Ok(())
}
