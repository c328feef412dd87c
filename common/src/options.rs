//! 照合オプション
//!
//! 判定閾値と列名の揺れを一つの設定にまとめる。

use serde::{Deserialize, Serialize};

/// 入力データの商品名列（先に見つかった列を採用）
pub const DEFAULT_NAME_COLUMNS: &[&str] = &["NAMA PRODUK", "Nama Produk"];
/// SKU列
pub const DEFAULT_SKU_COLUMN: &str = "SKU";
/// マスタの商品名列
pub const DEFAULT_MASTER_NAME_COLUMN: &str = "Nama Produk";

/// 照合・判定の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// このスコア以上で HIGH
    pub high_threshold: u8,
    /// このスコア以上で PERFECT
    pub perfect_threshold: u8,
    /// 入力データの商品名列の候補（この順に探す）
    pub name_columns: Vec<String>,
    /// 入力データのSKU列
    pub sku_column: String,
    /// マスタの商品名列
    pub master_name_column: String,
    /// マスタのSKU列
    pub master_sku_column: String,
    /// トークン化の前に英数字以外を空白に置換する
    pub strip_punctuation: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            high_threshold: 80,
            perfect_threshold: 100,
            name_columns: DEFAULT_NAME_COLUMNS.iter().map(|s| s.to_string()).collect(),
            sku_column: DEFAULT_SKU_COLUMN.to_string(),
            master_name_column: DEFAULT_MASTER_NAME_COLUMN.to_string(),
            master_sku_column: DEFAULT_SKU_COLUMN.to_string(),
            strip_punctuation: false,
        }
    }
}

impl ValidationOptions {
    /// 閾値の整合性を確認する
    pub fn validate(&self) -> crate::Result<()> {
        if self.perfect_threshold > 100 {
            return Err(crate::Error::Config(format!(
                "perfect_threshold must be <= 100 (got {})",
                self.perfect_threshold
            )));
        }
        if self.high_threshold == 0 || self.high_threshold > self.perfect_threshold {
            return Err(crate::Error::Config(format!(
                "high_threshold must be in 1..={} (got {})",
                self.perfect_threshold, self.high_threshold
            )));
        }
        if self.name_columns.is_empty() {
            return Err(crate::Error::Config("name_columns must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ValidationOptions::default();
        assert_eq!(options.high_threshold, 80);
        assert_eq!(options.perfect_threshold, 100);
        assert_eq!(options.name_columns, vec!["NAMA PRODUK", "Nama Produk"]);
        assert_eq!(options.sku_column, "SKU");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: ValidationOptions = serde_json::from_str(r#"{"high_threshold": 85}"#).unwrap();
        assert_eq!(options.high_threshold, 85);
        assert_eq!(options.perfect_threshold, 100);
        assert_eq!(options.master_name_column, "Nama Produk");
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let options = ValidationOptions {
            high_threshold: 95,
            perfect_threshold: 90,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = ValidationOptions {
            perfect_threshold: 120,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
