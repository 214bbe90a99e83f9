//! String similarity scorers on a 0–100 scale.
//!
//! [`ratio`] is the order-sensitive Indel ratio used for column names and
//! the region/zone keys. [`token_set_ratio`] ignores token order and
//! repetition and is used for woreda names, which often gain qualifiers or
//! get reordered between sources.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use rapidfuzz::fuzz;

/// Normalized Indel similarity of `a` and `b`, scaled to 0–100.
pub fn ratio(a: &str, b: &str) -> f64 {
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

/// Similarity of the whitespace-token sets of `a` and `b`, scaled to 0–100.
///
/// Returns 100 when the sets share a token and one contains the other, and 0
/// when either side has no tokens. Otherwise the score is the best of the
/// difference-vs-difference and intersection-vs-(intersection + difference)
/// comparisons.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");
    let ab_len = diff_ab_joined.chars().count();
    let ba_len = diff_ba_joined.chars().count();
    let sect_len = intersection.join(" ").chars().count();

    // Joined lengths once the intersection is prefixed with a separating space.
    let separator = usize::from(sect_len > 0);
    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    let diff_distance = indel::distance(diff_ab_joined.chars(), diff_ba_joined.chars());
    let diff_score = score_from_distance(diff_distance, sect_ab_len + sect_ba_len);
    if sect_len == 0 {
        return diff_score;
    }

    let sect_ab_score = score_from_distance(separator + ab_len, sect_len + sect_ab_len);
    let sect_ba_score = score_from_distance(separator + ba_len, sect_len + sect_ba_len);
    diff_score.max(sect_ab_score).max(sect_ba_score)
}

fn score_from_distance(distance: usize, len_sum: usize) -> f64 {
    if len_sum == 0 {
        return 100.0;
    }
    100.0 - 100.0 * distance as f64 / len_sum as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn ratio_of_identical_strings_is_100() {
        approx(ratio("addis ababa", "addis ababa"), 100.0);
    }

    #[test]
    fn ratio_counts_insertions_and_deletions() {
        // one substitution = one deletion + one insertion over 8 chars
        approx(ratio("abcd", "abce"), 75.0);
        approx(ratio("zone1", "zone 1"), 100.0 * (1.0 - 1.0 / 11.0));
    }

    #[test]
    fn ratio_is_case_sensitive() {
        assert!(ratio("Afar", "afar") < 100.0);
    }

    #[test]
    fn token_set_ignores_order_and_duplicates() {
        approx(token_set_ratio("kola tembien", "tembien kola kola"), 100.0);
    }

    #[test]
    fn token_set_accepts_added_qualifier() {
        approx(token_set_ratio("dessie zuria", "dessie zuria town"), 100.0);
    }

    #[test]
    fn token_set_of_empty_input_is_zero() {
        approx(token_set_ratio("", "w1"), 0.0);
        approx(token_set_ratio("   ", "   "), 0.0);
    }

    #[test]
    fn token_set_without_common_tokens_compares_differences() {
        approx(token_set_ratio("abcd", "abce"), 75.0);
    }

    #[test]
    fn token_set_with_partial_overlap_uses_intersection() {
        // sect = "a" (1), ab = "bb" (2), ba = "cc" (2)
        // diff: distance("bb", "cc") = 4 over (1+1+2)*2 = 8 -> 50
        // sect vs sect+ab: distance 3 over 1 + 4 = 5 -> 40
        approx(token_set_ratio("a bb", "a cc"), 50.0);
    }
}
