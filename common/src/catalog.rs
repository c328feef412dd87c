//! マスタカタログ
//!
//! 読み込み後は変更しない。照合中は複数スレッドから読み取り専用で共有する。

use crate::error::{Error, Result};
use crate::matcher::{best_match_tokens, TokenSet};
use crate::options::ValidationOptions;
use crate::sku::normalize_sku;
use crate::table::Table;
use std::collections::HashSet;

/// マスタの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    /// マスタに記載されたままのSKU
    pub sku: String,
    /// 読み込み時に一度だけ正規化したSKU
    pub normalized_sku: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        let sku = sku.into();
        Self {
            name: name.into(),
            normalized_sku: normalize_sku(&sku),
            sku,
        }
    }
}

/// 照合で見つかったマスタ行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome<'a> {
    pub index: usize,
    pub matched_name: &'a str,
    pub matched_sku: &'a str,
    pub normalized_sku: &'a str,
    pub score: u8,
}

/// 照合用のマスタカタログ
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    tokens: Vec<TokenSet>,
    strip_punctuation: bool,
}

impl CatalogIndex {
    /// (商品名, SKU) の列から構築
    pub fn new<I, N, S>(rows: I, strip_punctuation: bool) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let entries: Vec<CatalogEntry> = rows
            .into_iter()
            .map(|(name, sku)| CatalogEntry::new(name, sku))
            .collect();
        let tokens = entries
            .iter()
            .map(|e| TokenSet::new(&e.name, strip_punctuation))
            .collect();

        Self {
            entries,
            tokens,
            strip_punctuation,
        }
    }

    /// マスタ表から構築（商品名列・SKU列は必須）
    pub fn from_table(table: &Table, options: &ValidationOptions) -> Result<Self> {
        let name_col = table
            .column_index(&options.master_name_column)
            .ok_or_else(|| Error::MissingColumn {
                column: options.master_name_column.clone(),
                table: "master".into(),
            })?;
        let sku_col = table
            .column_index(&options.master_sku_column)
            .ok_or_else(|| Error::MissingColumn {
                column: options.master_sku_column.clone(),
                table: "master".into(),
            })?;

        let rows = (0..table.len()).map(|row| {
            (
                table.cell(row, Some(name_col)).to_string(),
                table.cell(row, Some(sku_col)).to_string(),
            )
        });
        let catalog = Self::new(rows, options.strip_punctuation);
        tracing::debug!(entries = catalog.len(), "built catalog index");

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// 商品名からSKUを引く（同名が複数あれば最初の行）
    pub fn sku_for(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.sku.as_str())
    }

    /// 商品名に最も近いマスタ行を探す（マスタが空なら None）
    pub fn best_match(&self, query: &str) -> Option<MatchOutcome<'_>> {
        let query = TokenSet::new(query, self.strip_punctuation);
        best_match_tokens(&query, &self.tokens).map(|(index, score)| {
            let entry = &self.entries[index];
            MatchOutcome {
                index,
                matched_name: &entry.name,
                matched_sku: &entry.sku,
                normalized_sku: &entry.normalized_sku,
                score,
            }
        })
    }

    /// 重複している商品名（初出順）
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            let name = entry.name.as_str();
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// 正規化後のSKUが空の行数
    pub fn missing_sku_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.normalized_sku.is_empty())
            .count()
    }
}
