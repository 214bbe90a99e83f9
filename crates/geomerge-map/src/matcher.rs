//! Greedy one-to-one matching of rows between two normalized views.

use geomerge_model::{KeyField, KeyThresholds, MatchOptions, MatchStrategy};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::similarity::{ratio, token_set_ratio};
use crate::view::{KeyValues, NormalizedView};

/// Absorbs float rounding in normalized ratios so a score that lands exactly
/// on a threshold still qualifies.
const SCORE_TOLERANCE: f64 = 1e-9;

/// Per-key similarity scores of one row pair, each on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyScores {
    pub region: f64,
    pub zone: f64,
    pub woreda: f64,
}

impl KeyScores {
    /// Region and zone use [`ratio`]; woreda uses [`token_set_ratio`].
    pub fn compute(a: &KeyValues, b: &KeyValues) -> Self {
        Self {
            region: ratio(a.get(KeyField::Region), b.get(KeyField::Region)),
            zone: ratio(a.get(KeyField::Zone), b.get(KeyField::Zone)),
            woreda: token_set_ratio(a.get(KeyField::Woreda), b.get(KeyField::Woreda)),
        }
    }

    pub fn get(&self, key: KeyField) -> f64 {
        match key {
            KeyField::Region => self.region,
            KeyField::Zone => self.zone,
            KeyField::Woreda => self.woreda,
        }
    }

    /// True only if every key reaches its threshold.
    pub fn meets(&self, thresholds: &KeyThresholds) -> bool {
        KeyField::ALL
            .into_iter()
            .all(|key| self.get(key) + SCORE_TOLERANCE >= f64::from(thresholds.get(key)))
    }

    pub fn total(&self) -> f64 {
        self.region + self.zone + self.woreda
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub a_index: usize,
    pub b_index: usize,
    pub scores: KeyScores,
}

/// Row-index partition produced by [`match_rows`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Matched pairs in the order rows of A were processed.
    pub pairs: Vec<MatchedPair>,
    /// Rows of A without a partner, ascending.
    pub unmatched_a: Vec<usize>,
    /// Rows of B never claimed, ascending.
    pub unmatched_b: Vec<usize>,
}

impl MatchOutcome {
    pub fn matched_count(&self) -> usize {
        self.pairs.len()
    }
}

/// Pairs each row of `a` with at most one unclaimed row of `b`.
///
/// Rows of `a` are visited in order and rows of `b` are scanned in order,
/// skipping rows already claimed. A row of `b` qualifies when all three key
/// scores reach their thresholds. Under [`MatchStrategy::FirstFit`] the first
/// qualifying row is taken and the scan stops, even if a later row would
/// score higher. Under [`MatchStrategy::BestFit`] the whole scan runs and the
/// highest total wins, earlier rows breaking ties.
pub fn match_rows(a: &NormalizedView, b: &NormalizedView, options: &MatchOptions) -> MatchOutcome {
    let thresholds = &options.thresholds;
    let mut claimed = vec![false; b.len()];
    let mut outcome = MatchOutcome::default();

    for (a_index, a_keys) in a.rows().iter().enumerate() {
        let mut chosen: Option<(usize, KeyScores)> = None;

        for (b_index, b_keys) in b.rows().iter().enumerate() {
            if claimed[b_index] {
                continue;
            }
            let scores = KeyScores::compute(a_keys, b_keys);
            if !scores.meets(thresholds) {
                continue;
            }
            trace!(
                a_index,
                b_index,
                total = scores.total(),
                "candidate qualifies"
            );
            match options.strategy {
                MatchStrategy::FirstFit => {
                    chosen = Some((b_index, scores));
                    break;
                }
                MatchStrategy::BestFit => {
                    if chosen.is_none_or(|(_, best)| scores.total() > best.total()) {
                        chosen = Some((b_index, scores));
                    }
                }
            }
        }

        match chosen {
            Some((b_index, scores)) => {
                claimed[b_index] = true;
                outcome.pairs.push(MatchedPair {
                    a_index,
                    b_index,
                    scores,
                });
            }
            None => outcome.unmatched_a.push(a_index),
        }
    }

    outcome.unmatched_b = claimed
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(idx, _)| idx)
        .collect();
    outcome
}
