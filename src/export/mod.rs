pub mod csv_writer;
pub mod excel;

use crate::error::Result;
use sku_validator_common::ValidationResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// 出力列の見出し
pub const COLUMN_HEADERS: [&str; 7] = [
    "Nama dari AI",
    "SKU dari AI",
    "Nama di Master (Cocok)",
    "SKU di Master",
    "Score Kemiripan",
    "Status",
    "Keterangan",
];

/// 既定の出力ファイル名
pub const DEFAULT_OUTPUT_STEM: &str = "hasil_validasi_sku";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// 出力ファイルの拡張子から形式を推定
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        ext.parse().ok()
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use xlsx, csv, or json", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// 出力ファイルの付帯情報
#[derive(Debug, Clone)]
pub struct ExportMeta {
    /// マスタの取得元
    pub master: String,
    /// 入力ファイル
    pub input: String,
    /// マスタの件数
    pub catalog_size: usize,
}

/// 出力パスを決める（ディレクトリ・拡張子なしなら既定のファイル名を付ける）
pub fn resolve_output_path(output: &Path, format: ExportFormat) -> std::path::PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension()))
    } else {
        output.to_path_buf()
    }
}

/// 1行分の値（見出しと同じ順序）
pub fn row_values(result: &ValidationResult) -> [String; 7] {
    [
        result.raw_name.clone(),
        result.raw_sku.clone(),
        result.matched_name.clone().unwrap_or_default(),
        result.master_sku.clone().unwrap_or_default(),
        result.score.to_string(),
        result.match_status.to_string(),
        result.verdict.to_string(),
    ]
}

pub fn export_results(
    results: &[ValidationResult],
    format: ExportFormat,
    output_path: &Path,
    meta: &ExportMeta,
) -> Result<()> {
    // 出力先フォルダがなければ作る
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Excel => excel::generate_excel(results, output_path, meta),
        ExportFormat::Csv => csv_writer::write_csv(results, output_path),
        ExportFormat::Json => write_json(results, output_path),
    }
}

pub fn write_json(results: &[ValidationResult], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), results)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_str() {
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("Excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_export_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("results").join("2026");
        let output_path = resolve_output_path(&output_dir, ExportFormat::Csv);
        let meta = ExportMeta {
            master: "master.csv".into(),
            input: "input.csv".into(),
            catalog_size: 0,
        };

        export_results(&[], ExportFormat::Csv, &output_path, &meta).unwrap();
        assert_eq!(output_path, output_dir.join("hasil_validasi_sku.csv"));
        assert!(output_path.exists());
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_output_path(dir.path(), ExportFormat::Csv),
            dir.path().join("hasil_validasi_sku.csv")
        );
        assert_eq!(
            resolve_output_path(Path::new("result.xlsx"), ExportFormat::Excel),
            PathBuf::from("result.xlsx")
        );
    }
}
