//! Multi-signal similarity scoring between normalized menu names.

use std::collections::HashSet;

use chainmenu_core::MatchRules;

pub const EXACT: f64 = 100.0;
pub const EXACT_IGNORING_WHITESPACE: f64 = 90.0;
pub const CONTAINMENT_CEILING: f64 = 90.0;
pub const ALL_TOKENS_COMMON: f64 = 95.0;
pub const TOKEN_OVERLAP_CEILING: f64 = 70.0;
pub const PREFIX_RUN_CEILING: f64 = 70.0;
const MIN_PREFIX_RUN: usize = 5;

/// Fuzzy floor: ranks near-misses in logs but is capped strictly below
/// every brand's acceptance threshold, so it can never accept a match on
/// its own.
pub const FUZZY_DIAGNOSTIC_CEILING: f64 = 55.0;

/// Score a `(target, candidate)` pair in [0, 100]. Both inputs must
/// already be normalized with the same rules.
///
/// Tiers are independent signals and the result is their maximum, not a
/// sum. Disagreement on any binary qualifier (a junior-size marker on one
/// side only) forces 0 regardless of tiers.
pub fn score(rules: &MatchRules, target: &str, candidate: &str) -> f64 {
    if target.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    for qualifier in &rules.qualifiers {
        if qualifier.applies_to(target) != qualifier.applies_to(candidate) {
            return 0.0;
        }
    }

    if target == candidate {
        return EXACT;
    }

    let mut best: f64 = 0.0;

    let target_packed: String = target.split_whitespace().collect();
    let candidate_packed: String = candidate.split_whitespace().collect();
    if target_packed == candidate_packed {
        best = best.max(EXACT_IGNORING_WHITESPACE);
    }

    best = best.max(containment_score(rules, &target_packed, &candidate_packed));
    best = best.max(token_overlap_score(target, candidate));
    best = best.max(prefix_run_score(&target_packed, &candidate_packed));
    best = best.max(strsim::jaro_winkler(target, candidate) * FUZZY_DIAGNOSTIC_CEILING);

    best
}

/// One name fully containing the other, scaled by the length ratio.
/// Credited only when the shorter side is long enough to be meaningful.
fn containment_score(rules: &MatchRules, a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = shorter.chars().count();
    if short_len < rules.containment_min_chars {
        return 0.0;
    }
    if !longer.contains(shorter) {
        return 0.0;
    }
    let long_len = longer.chars().count();
    (short_len as f64 / long_len as f64) * CONTAINMENT_CEILING
}

fn token_overlap_score(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = a
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .collect();
    let tokens_b: HashSet<&str> = b
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let common = tokens_a.intersection(&tokens_b).count();
    if common == 0 {
        return 0.0;
    }
    if common == tokens_a.len() && common == tokens_b.len() {
        return ALL_TOKENS_COMMON;
    }
    let larger = tokens_a.len().max(tokens_b.len());
    (common as f64 / larger as f64) * TOKEN_OVERLAP_CEILING
}

fn prefix_run_score(a: &str, b: &str) -> f64 {
    let run = a
        .chars()
        .zip(b.chars())
        .take_while(|(ca, cb)| ca == cb)
        .count();
    if run < MIN_PREFIX_RUN {
        return 0.0;
    }
    let min_len = a.chars().count().min(b.chars().count());
    (run as f64 / min_len as f64) * PREFIX_RUN_CEILING
}
