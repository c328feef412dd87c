//! Excel生成
//!
//! 検証結果シートと集計シートの2枚構成。

use super::{ExportMeta, COLUMN_HEADERS};
use crate::error::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use sku_validator_common::{MatchStatus, RunSummary, SkuVerdict, ValidationResult};
use std::path::Path;

pub const RESULT_SHEET_NAME: &str = "Hasil_Validasi_SKU";
pub const SUMMARY_SHEET_NAME: &str = "Ringkasan";

const COLUMN_WIDTHS: [f64; 7] = [40.0, 16.0, 40.0, 16.0, 10.0, 12.0, 42.0];

fn status_color(status: MatchStatus) -> Color {
    match status {
        MatchStatus::Perfect => Color::RGB(0xC6EFCE),
        MatchStatus::High => Color::RGB(0xDDEBF7),
        MatchStatus::LowMatch => Color::RGB(0xFFEB9C),
        MatchStatus::NotFound => Color::RGB(0xFFC7CE),
    }
}

pub fn generate_excel(results: &[ValidationResult], output_path: &Path, meta: &ExportMeta) -> Result<()> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    write_result_sheet(worksheet, results)?;

    let worksheet = workbook.add_worksheet();
    write_summary_sheet(worksheet, results, meta)?;

    workbook.save(output_path)?;
    Ok(())
}

fn write_result_sheet(worksheet: &mut Worksheet, results: &[ValidationResult]) -> Result<()> {
    worksheet.set_name(RESULT_SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));
    let text_format = Format::new().set_border(FormatBorder::Hair);
    let score_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_align(FormatAlign::Right);
    let mismatch_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_font_color(Color::RGB(0x9C0006));

    for (col, (header, width)) in COLUMN_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, width)?;
    }

    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        let status_format = Format::new()
            .set_border(FormatBorder::Hair)
            .set_align(FormatAlign::Center)
            .set_background_color(status_color(result.match_status));
        let verdict_format = if matches!(result.verdict, SkuVerdict::Mismatch { .. }) {
            &mismatch_format
        } else {
            &text_format
        };

        worksheet.write_string_with_format(row, 0, &result.raw_name, &text_format)?;
        worksheet.write_string_with_format(row, 1, &result.raw_sku, &text_format)?;
        worksheet.write_string_with_format(
            row,
            2,
            result.matched_name.as_deref().unwrap_or(""),
            &text_format,
        )?;
        worksheet.write_string_with_format(
            row,
            3,
            result.master_sku.as_deref().unwrap_or(""),
            &text_format,
        )?;
        worksheet.write_number_with_format(row, 4, result.score, &score_format)?;
        worksheet.write_string_with_format(row, 5, result.match_status.as_str(), &status_format)?;
        worksheet.write_string_with_format(row, 6, result.verdict.to_string(), verdict_format)?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    if !results.is_empty() {
        worksheet.autofilter(0, 0, results.len() as u32, COLUMN_HEADERS.len() as u16 - 1)?;
    }

    Ok(())
}

fn write_summary_sheet(worksheet: &mut Worksheet, results: &[ValidationResult], meta: &ExportMeta) -> Result<()> {
    worksheet.set_name(SUMMARY_SHEET_NAME)?;

    let label_format = Format::new().set_bold();
    let summary = RunSummary::from_results(results);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let info = [
        ("Master", meta.master.clone()),
        ("Input", meta.input.clone()),
        ("Dibuat", generated_at),
    ];
    let mut row = 0u32;
    for (label, value) in info {
        worksheet.write_string_with_format(row, 0, label, &label_format)?;
        worksheet.write_string(row, 1, value)?;
        row += 1;
    }

    row += 1;
    let mut counts: Vec<(&str, usize)> = vec![("Jumlah Master", meta.catalog_size), ("Total", summary.total)];
    counts.extend(
        MatchStatus::ALL
            .iter()
            .map(|status| (status.as_str(), summary.count_for(*status))),
    );
    counts.extend([
        ("SKU matches", summary.sku_matches),
        ("SKU mismatch", summary.sku_mismatch),
        ("SKU missing", summary.sku_missing),
    ]);

    for (label, count) in counts {
        worksheet.write_string_with_format(row, 0, label, &label_format)?;
        worksheet.write_number(row, 1, count as f64)?;
        row += 1;
    }

    worksheet.set_column_width(0, 18)?;
    worksheet.set_column_width(1, 60)?;

    Ok(())
}
