//! 商品名のあいまい照合
//!
//! トークン集合の類似度（token set ratio）で最も近いマスタ商品名を選ぶ。
//!
//! ## スコア計算
//! 1. 小文字化して空白で分割し、トークン集合にする（重複は除去）
//! 2. 共通部分と、それぞれにしかないトークンを求める
//! 3. 各グループをソートして連結した3つの文字列を作る
//!    - `S0 = 共通`
//!    - `S1 = 共通 + クエリのみ`
//!    - `S2 = 共通 + 候補のみ`
//! 4. `{S0,S1}` `{S0,S2}` `{S1,S2}` の Indel 類似度 `2*LCS/(len1+len2)` の最大値を
//!    0-100 に換算し整数に丸める（偶数丸め）

use rapidfuzz::distance::indel;
use std::collections::BTreeSet;

/// トークン化済みの文字列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: BTreeSet<String>,
}

impl TokenSet {
    /// 小文字化して空白で分割する
    ///
    /// `strip_punctuation` が真なら英数字以外を空白とみなす。
    pub fn new(text: &str, strip_punctuation: bool) -> Self {
        let lowered = text.to_lowercase();
        let tokens = if strip_punctuation {
            lowered
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            lowered.split_whitespace().map(str::to_string).collect()
        };
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// 照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch<'a> {
    /// 候補リスト内の位置
    pub index: usize,
    pub candidate: &'a str,
    pub score: u8,
}

/// グループごとにソート済みのトークンを空白1つで連結する
fn join_groups(groups: &[&[&str]]) -> String {
    groups
        .iter()
        .flat_map(|group| group.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

/// トークン化済みの2文字列のスコア (0-100)
pub fn token_set_score(a: &TokenSet, b: &TokenSet) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // BTreeSetの走査順はソート済み
    let intersection: Vec<&str> = a.tokens.intersection(&b.tokens).map(String::as_str).collect();
    let only_a: Vec<&str> = a.tokens.difference(&b.tokens).map(String::as_str).collect();
    let only_b: Vec<&str> = b.tokens.difference(&a.tokens).map(String::as_str).collect();

    let s0 = join_groups(&[intersection.as_slice()]);
    let s1 = join_groups(&[intersection.as_slice(), only_a.as_slice()]);
    let s2 = join_groups(&[intersection.as_slice(), only_b.as_slice()]);

    let best = ratio(&s0, &s1).max(ratio(&s0, &s2)).max(ratio(&s1, &s2));

    (best * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

/// 2つの文字列のトークン集合類似度 (0-100)
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set_score(&TokenSet::new(a, false), &TokenSet::new(b, false))
}

/// トークン化済み候補から最良の位置とスコアを返す
///
/// 同点の場合は先に現れた候補を採用する。
pub fn best_match_tokens(query: &TokenSet, candidates: &[TokenSet]) -> Option<(usize, u8)> {
    let mut best: Option<(usize, u8)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = token_set_score(query, candidate);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
            if score == 100 {
                // これ以上は更新されない
                break;
            }
        }
    }

    best
}

/// 候補リストから最も類似した文字列を返す（候補が空なら None）
pub fn best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    strip_punctuation: bool,
) -> Option<NameMatch<'a>> {
    let query = TokenSet::new(query, strip_punctuation);
    let tokenized: Vec<TokenSet> = candidates
        .iter()
        .map(|c| TokenSet::new(c.as_ref(), strip_punctuation))
        .collect();

    best_match_tokens(&query, &tokenized).map(|(index, score)| NameMatch {
        index,
        candidate: candidates[index].as_ref(),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(token_set_ratio("Batman Pop #01", "Batman Pop #01"), 100);
        assert_eq!(token_set_ratio("a", "a"), 100);
    }

    #[test]
    fn test_case_and_order_insensitive() {
        assert_eq!(token_set_ratio("POP BATMAN", "batman pop"), 100);
        assert_eq!(token_set_ratio("batman batman pop", "pop batman"), 100);
    }

    #[test]
    fn test_subset_scores_100() {
        // 一方のトークンが他方に含まれる場合 S0 == S1
        assert_eq!(token_set_ratio("Batman", "Batman Pop Vinyl"), 100);
    }

    #[test]
    fn test_disjoint_strings_score_0() {
        assert_eq!(token_set_ratio("abc", "xyz"), 0);
        assert_eq!(token_set_ratio("batman", "quirk"), 0);
        assert_eq!(token_set_ratio("aaa", "zzz yyy"), 0);
    }

    #[test]
    fn test_empty_input_scores_0() {
        assert_eq!(token_set_ratio("", "batman"), 0);
        assert_eq!(token_set_ratio("   ", "batman"), 0);
        assert_eq!(token_set_ratio("", ""), 0);
    }

    #[test]
    fn test_known_partial_score() {
        // S0="batman pop"(10), S1="batman pop 01"(13), S2="batman pop #01"(14)
        // S1 vs S2: LCS=13, 2*13/27 = 96.3
        assert_eq!(token_set_ratio("BATMAN POP 01", "Batman Pop #01"), 96);
    }

    #[test]
    fn test_disjoint_tokens_share_characters() {
        // "ab" と "ac" は共通トークンなしだが文字 "a" を共有: 2*1/4 = 50
        assert_eq!(token_set_ratio("ab", "ac"), 50);
    }

    #[test]
    fn test_round_half_to_even() {
        // 2*1/16 = 12.5 -> 12
        assert_eq!(token_set_ratio("abcdefg", "axxxxxxxx"), 12);
    }

    #[test]
    fn test_strip_punctuation_mode() {
        let a = TokenSet::new("BATMAN POP 01", true);
        let b = TokenSet::new("Batman Pop #01", true);
        assert_eq!(token_set_score(&a, &b), 100);
        assert_eq!(TokenSet::new("Pop!-Vinyl", true).len(), 2);
        assert_eq!(TokenSet::new("Pop!-Vinyl", false).len(), 1);
    }

    #[test]
    fn test_best_match_empty_candidates() {
        let candidates: Vec<String> = Vec::new();
        assert!(best_match("Batman", &candidates, false).is_none());
    }

    #[test]
    fn test_best_match_picks_highest() {
        let candidates = ["Superman Pop #02", "Batman Pop #01", "Flash"];
        let m = best_match("batman pop", &candidates, false).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.candidate, "Batman Pop #01");
        assert_eq!(m.score, 100);
    }

    #[test]
    fn test_best_match_tie_prefers_first() {
        let candidates = ["Pop Batman", "Batman Pop", "batman pop"];
        for _ in 0..5 {
            let m = best_match("batman pop", &candidates, false).unwrap();
            assert_eq!(m.index, 0);
        }

        // 同点（100未満）でも先頭を採用
        let candidates = ["Iron Man", "Iron Men", "Iron Man"];
        let first = best_match("iron mas", &candidates, false).unwrap();
        assert_eq!(first.index, 0);
    }

    #[test]
    fn test_best_match_all_zero_returns_first() {
        let candidates = ["xyz", "qqq"];
        let m = best_match("abc", &candidates, false).unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.score, 0);
    }
}
