//! 照合結果の判定
//!
//! スコアによる確度（ステータス）とSKU判定は独立した2軸として扱う。

use crate::catalog::MatchOutcome;
use crate::options::ValidationOptions;
use crate::sku::normalize_sku;
use crate::types::{MatchStatus, SkuVerdict};

/// スコアからステータスを決める
pub fn status_for_score(score: u8, options: &ValidationOptions) -> MatchStatus {
    if score >= options.perfect_threshold {
        MatchStatus::Perfect
    } else if score >= options.high_threshold {
        MatchStatus::High
    } else if score > 0 {
        MatchStatus::LowMatch
    } else {
        MatchStatus::NotFound
    }
}

/// 正規化済みSKUを比較する
///
/// `master_raw` は不一致時に利用者へ提示するマスタ側の元の値。
pub fn sku_verdict(normalized_input: &str, normalized_master: &str, master_raw: &str) -> SkuVerdict {
    if normalized_input.is_empty() || normalized_master.is_empty() {
        SkuVerdict::Missing
    } else if normalized_input == normalized_master {
        SkuVerdict::Matches
    } else {
        SkuVerdict::Mismatch {
            master_sku: master_raw.to_string(),
        }
    }
}

/// 入力SKUと照合結果からステータスと判定を返す
pub fn classify(
    input_sku: &str,
    outcome: Option<&MatchOutcome<'_>>,
    options: &ValidationOptions,
) -> (MatchStatus, SkuVerdict) {
    let Some(outcome) = outcome else {
        return (MatchStatus::NotFound, SkuVerdict::NotFound);
    };

    let normalized_input = normalize_sku(input_sku);
    let status = status_for_score(outcome.score, options);
    let verdict = sku_verdict(&normalized_input, outcome.normalized_sku, outcome.matched_sku);

    (status, verdict)
}
