//! SKU正規化
//!
//! 表計算ソフトから読み込んだSKUは `12345.0` のように小数として
//! 読まれたり、記号や大文字小文字が揺れていたりする。
//! 比較用のキーに揃える。

/// SKUを比較用キーに正規化する
///
/// 1. 最初の `.` 以降を切り捨て（`.0` 以外の小数部も含む）
/// 2. ASCII英数字以外を除去
/// 3. 大文字化
///
/// 空文字列は空文字列のまま返す。冪等。
pub fn normalize_sku(raw: &str) -> String {
    let head = match raw.find('.') {
        Some(pos) => &raw[..pos],
        None => raw,
    };

    head.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// 欠損値（None）を含むSKUを正規化する
pub fn normalize_sku_opt(raw: Option<&str>) -> String {
    raw.map(normalize_sku).unwrap_or_default()
}
