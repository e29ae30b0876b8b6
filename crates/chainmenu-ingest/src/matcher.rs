//! Greedy target-to-candidate assignment.

use chainmenu_core::{CandidateRecord, MatchRules};

use crate::normalize::normalize;
use crate::score::score;

/// Why a target ended the run without a bound candidate, for operator
/// diagnostics. Carries the best rejected candidate when one scored at all.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched {
        candidate: CandidateRecord,
        score: f64,
    },
    Unmatched {
        best_rejected: Option<(String, f64)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetMatch {
    pub target: String,
    pub outcome: MatchOutcome,
}

impl TargetMatch {
    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Matched { .. })
    }
}

/// Bind each canonical target to its best-scoring candidate.
///
/// Targets are processed in canonical-list order and each candidate is
/// consumed by at most one target per run. Ties on score go to the longer
/// original candidate name, so `빅맥버거 세트` beats a bare promotional
/// `빅맥` tile carrying less data. A best score below `threshold` leaves
/// the target unmatched; the rejected runner-up is kept for the error
/// message.
pub fn assign(
    rules: &MatchRules,
    threshold: f64,
    targets: &[String],
    candidates: &[CandidateRecord],
) -> Vec<TargetMatch> {
    let normalized_candidates: Vec<String> = candidates
        .iter()
        .map(|c| normalize(rules, &c.name))
        .collect();
    let mut consumed = vec![false; candidates.len()];

    let mut matches = Vec::with_capacity(targets.len());
    for target in targets {
        let normalized_target = normalize(rules, target);

        let mut best: Option<(usize, f64)> = None;
        for (idx, normalized_candidate) in normalized_candidates.iter().enumerate() {
            if consumed[idx] {
                continue;
            }
            let pair_score = score(rules, &normalized_target, normalized_candidate);
            if pair_score <= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_idx, best_score)) => {
                    pair_score > best_score
                        || (pair_score == best_score
                            && candidates[idx].name.chars().count()
                                > candidates[best_idx].name.chars().count())
                }
            };
            if better {
                best = Some((idx, pair_score));
            }
        }

        let outcome = match best {
            Some((idx, best_score)) if best_score >= threshold => {
                consumed[idx] = true;
                tracing::info!(
                    target = %target,
                    candidate = %candidates[idx].name,
                    score = best_score,
                    threshold,
                    "match accepted"
                );
                MatchOutcome::Matched {
                    candidate: candidates[idx].clone(),
                    score: best_score,
                }
            }
            Some((idx, best_score)) => {
                tracing::info!(
                    target = %target,
                    candidate = %candidates[idx].name,
                    score = best_score,
                    threshold,
                    "match rejected below threshold"
                );
                MatchOutcome::Unmatched {
                    best_rejected: Some((candidates[idx].name.clone(), best_score)),
                }
            }
            None => {
                tracing::info!(target = %target, threshold, "no scoring candidate");
                MatchOutcome::Unmatched {
                    best_rejected: None,
                }
            }
        };
        matches.push(TargetMatch {
            target: target.clone(),
            outcome,
        });
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(names: &[&str]) -> Vec<CandidateRecord> {
        names.iter().map(|n| CandidateRecord::named(*n)).collect()
    }

    fn rules() -> MatchRules {
        MatchRules::default().with_noise_tokens(&["세트", "단품", "버거"])
    }

    #[test]
    fn binds_each_target_to_its_best_candidate() {
        let targets = vec!["빅맥".to_string(), "맥치킨".to_string()];
        let cands = candidates(&["맥치킨 단품", "빅맥 버거 세트"]);
        let matches = assign(&rules(), 60.0, &targets, &cands);

        assert!(matches.iter().all(TargetMatch::is_matched));
        match &matches[0].outcome {
            MatchOutcome::Matched { candidate, score } => {
                assert_eq!(candidate.name, "빅맥 버거 세트");
                assert_eq!(*score, 100.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn each_candidate_is_consumed_at_most_once() {
        let targets = vec!["빅맥".to_string(), "빅맥".to_string()];
        let cands = candidates(&["빅맥 세트"]);
        let matches = assign(&rules(), 60.0, &targets, &cands);

        assert!(matches[0].is_matched());
        assert_eq!(
            matches[1].outcome,
            MatchOutcome::Unmatched {
                best_rejected: None
            }
        );
    }

    #[test]
    fn score_ties_go_to_the_longer_original_name() {
        let targets = vec!["빅맥".to_string()];
        // Both normalize to `빅맥` and score 100; the richer listing wins.
        let cands = candidates(&["빅맥", "빅맥버거 세트"]);
        let matches = assign(&rules(), 60.0, &targets, &cands);

        match &matches[0].outcome {
            MatchOutcome::Matched { candidate, .. } => {
                assert_eq!(candidate.name, "빅맥버거 세트");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn sub_threshold_best_is_reported_not_bound() {
        let targets = vec!["트리플 치즈버거".to_string()];
        let cands = candidates(&["치즈 스틱"]);
        let matches = assign(&MatchRules::default(), 70.0, &targets, &cands);

        match &matches[0].outcome {
            MatchOutcome::Unmatched {
                best_rejected: Some((name, score)),
            } => {
                assert_eq!(name, "치즈 스틱");
                assert!(*score < 70.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn earlier_targets_have_first_pick() {
        // Canonical order decides who gets the contested candidate.
        let targets = vec!["치즈와퍼".to_string(), "콰트로치즈와퍼".to_string()];
        let cands = candidates(&["치즈와퍼"]);
        let rules = MatchRules::default().with_containment_min_chars(4);
        let matches = assign(&rules, 65.0, &targets, &cands);

        assert!(matches[0].is_matched());
        assert!(!matches[1].is_matched());
    }
}
