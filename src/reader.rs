//! 表ファイルの読み込み
//!
//! CSV と Excel/ODS（先頭シート）を共通の [`Table`] に変換する。
//! 1行目をヘッダーとして扱う。

use crate::error::{Result, ValidatorError};
use calamine::{open_workbook_auto, Data, Reader};
use sku_validator_common::Table;
use std::io::Read;
use std::path::Path;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 拡張子で形式を判定して読み込む
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(ValidatorError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ext == "csv" {
        let file = std::fs::File::open(path)?;
        read_csv(file)
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        read_spreadsheet(path)
    } else {
        Err(ValidatorError::UnsupportedFormat(path.display().to_string()))
    }
}

/// CSVを読み込む（列数が揃っていない行も受け付ける）
///
/// UTF-8として不正なバイトは置換文字にして、その行も読み込む。
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = field_to_string(h);
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;
        rows.push(record.iter().map(field_to_string).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Excel/ODSの先頭シートを読み込む
pub fn read_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ValidatorError::InputRead(format!("シートがありません: {}", path.display())))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.collect();

    Ok(Table::new(headers, rows))
}

fn field_to_string(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// セル値を文字列に変換
///
/// 整数値の浮動小数点は小数部なしで表記する（`12345.0` → `12345`）。
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn float_to_string(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
