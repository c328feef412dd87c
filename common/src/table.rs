//! 表形式データ
//!
//! ローダー（CSV/Excel/スプレッドシートURL）が読み込んだ内容を
//! ヘッダー行と文字列セルの組として受け渡す。
//! 列の解決はデータセットごとに一度だけ行う。

use crate::options::ValidationOptions;
use crate::types::InputRecord;

/// ヘッダー行 + データ行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名の完全一致（大文字小文字を区別）で列番号を返す
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 候補を順に試し、最初に存在した列の番号を返す
    pub fn resolve_column<S: AsRef<str>>(&self, candidates: &[S]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|name| self.column_index(name.as_ref()))
    }

    /// セル値を取得（列なし・短い行は空文字列）
    pub fn cell(&self, row: usize, column: Option<usize>) -> &str {
        match (self.rows.get(row), column) {
            (Some(cells), Some(col)) => cells.get(col).map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }

    /// 入力データの列を解決してレコード列に変換する
    pub fn input_records(&self, options: &ValidationOptions) -> Vec<InputRecord> {
        let columns = InputColumns::resolve(self, options);
        tracing::debug!(
            name_column = ?columns.name.map(|i| &self.headers[i]),
            sku_column = ?columns.sku.map(|i| &self.headers[i]),
            "resolved input columns"
        );

        (0..self.rows.len())
            .map(|row| InputRecord::new(self.cell(row, columns.name), self.cell(row, columns.sku)))
            .collect()
    }
}

/// 解決済みの入力列
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputColumns {
    pub name: Option<usize>,
    pub sku: Option<usize>,
}

impl InputColumns {
    pub fn resolve(table: &Table, options: &ValidationOptions) -> Self {
        Self {
            name: table.resolve_column(&options.name_columns),
            sku: table.column_index(&options.sku_column),
        }
    }
}
