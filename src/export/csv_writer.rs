//! CSV出力

use super::{row_values, COLUMN_HEADERS};
use crate::error::Result;
use sku_validator_common::ValidationResult;
use std::path::Path;

pub fn write_csv(results: &[ValidationResult], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(COLUMN_HEADERS)?;
    for result in results {
        writer.write_record(row_values(result))?;
    }
    writer.flush()?;
    Ok(())
}
