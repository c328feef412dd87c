//! 入力レコードと検証結果の型定義

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 入力データの1行（AIが出力した商品リスト）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// 商品名（入力のまま）
    pub raw_name: String,
    /// SKU（入力のまま）
    pub raw_sku: String,
}

impl InputRecord {
    pub fn new(raw_name: impl Into<String>, raw_sku: impl Into<String>) -> Self {
        Self {
            raw_name: raw_name.into(),
            raw_sku: raw_sku.into(),
        }
    }
}

/// 名前照合の確度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Perfect,
    High,
    LowMatch,
    NotFound,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Perfect,
        MatchStatus::High,
        MatchStatus::LowMatch,
        MatchStatus::NotFound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Perfect => "PERFECT",
            MatchStatus::High => "HIGH",
            MatchStatus::LowMatch => "LOW_MATCH",
            MatchStatus::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SKUの判定結果
///
/// 表示文字列は利用者向けの判定文になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkuVerdict {
    /// 正規化後のSKUが一致
    Matches,
    /// どちらかのSKUが空
    Missing,
    /// 不一致（マスタの元のSKUを提示）
    Mismatch { master_sku: String },
    /// 照合候補なし
    NotFound,
}

impl fmt::Display for SkuVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkuVerdict::Matches => f.write_str("SKU matches"),
            SkuVerdict::Missing => f.write_str("SKU missing"),
            SkuVerdict::Mismatch { master_sku } => {
                write!(f, "SKU mismatch; master SKU is {}", master_sku)
            }
            SkuVerdict::NotFound => f.write_str("not found"),
        }
    }
}

impl Serialize for SkuVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 1レコードの検証結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub raw_name: String,
    pub raw_sku: String,
    /// マスタ側で一致した商品名（候補なしなら None）
    pub matched_name: Option<String>,
    /// マスタ側の元のSKU
    pub master_sku: Option<String>,
    /// 類似度スコア (0-100)
    pub score: u8,
    pub match_status: MatchStatus,
    pub verdict: SkuVerdict,
}

/// 検証結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub perfect: usize,
    pub high: usize,
    pub low_match: usize,
    pub not_found: usize,
    pub sku_matches: usize,
    pub sku_missing: usize,
    pub sku_mismatch: usize,
}

impl RunSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            match result.match_status {
                MatchStatus::Perfect => summary.perfect += 1,
                MatchStatus::High => summary.high += 1,
                MatchStatus::LowMatch => summary.low_match += 1,
                MatchStatus::NotFound => summary.not_found += 1,
            }
            match result.verdict {
                SkuVerdict::Matches => summary.sku_matches += 1,
                SkuVerdict::Missing => summary.sku_missing += 1,
                SkuVerdict::Mismatch { .. } => summary.sku_mismatch += 1,
                SkuVerdict::NotFound => {}
            }
        }

        summary
    }

    /// ステータス別の件数
    pub fn count_for(&self, status: MatchStatus) -> usize {
        match status {
            MatchStatus::Perfect => self.perfect,
            MatchStatus::High => self.high,
            MatchStatus::LowMatch => self.low_match,
            MatchStatus::NotFound => self.not_found,
        }
    }
}
