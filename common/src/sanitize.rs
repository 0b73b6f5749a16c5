//! ファイル名用の文字列正規化

/// ファイル名に使える最大文字数
pub const MAX_NAME_LEN: usize = 100;

/// 品目名をファイル名の一部に変換する
///
/// 小文字化 → 空白の連続を `_` 1文字に置換 → `[a-z0-9_-]` 以外を除去 → 100文字に切り詰め。
/// 空白を先に置換するため、記号を挟んだ空白は `_` が連続して残る。
pub fn sanitize_name(name: &str) -> String {
    let lowered = name.to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_space {
                collapsed.push('_');
                in_space = true;
            }
        } else {
            collapsed.push(ch);
            in_space = false;
        }
    }

    collapsed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .take(MAX_NAME_LEN)
        .collect()
}

/// 成果物ファイル名: `<site>_<name>_<kind>_<date>.csv`
pub fn artifact_file_name(site: &str, name: &str, kind: &str, date: &str) -> String {
    format!(
        "{}_{}_{}_{}.csv",
        sanitize_name(site),
        sanitize_name(name),
        kind,
        sanitize_name(date)
    )
}
