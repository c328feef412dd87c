//! Googleスプレッドシートの共有リンク変換
//!
//! 「リンクを知っている全員」に公開されたシートの編集URLを
//! CSVエクスポートURLに書き換える。

use regex::Regex;

lazy_static::lazy_static! {
    static ref SHEET_ID_RE: Regex =
        Regex::new(r"^https?://docs\.google\.com/spreadsheets/d/([A-Za-z0-9_-]+)").unwrap();
    static ref GID_RE: Regex = Regex::new(r"[#&?]gid=(\d+)").unwrap();
}

/// CSVエクスポートURLを返す（Googleスプレッドシート以外はそのまま）
///
/// `gid` が指定されていればそのシートを対象にする。
pub fn csv_export_url(url: &str) -> String {
    let Some(caps) = SHEET_ID_RE.captures(url) else {
        return url.to_string();
    };

    let id = &caps[1];
    let mut export = format!("https://docs.google.com/spreadsheets/d/{}/export?format=csv", id);
    if let Some(gid) = GID_RE.captures(url) {
        export.push_str("&gid=");
        export.push_str(&gid[1]);
    }
    export
}
