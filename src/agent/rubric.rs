//! Heuristic rubrics turning one agent response (or, for M1, a set of
//! duplicate-probe responses) into a 1-10 score.
//!
//! Scoring is deterministic and indicator-weighted rather than another LLM
//! call judging the first: the same response always yields the same score,
//! and a probe that times out or errors never reaches this stage (the caller
//! substitutes `unavailable` instead).

use std::collections::HashSet;

pub const RUBRIC_VERSION: u32 = 1;

/// The five fixed probes run against sampled files: consistency,
/// comprehension, navigation, identifiers, documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Metric {
    /// M1: does the agent answer the same question about the same file the
    /// same way twice?
    Consistency,
    /// M2: can the agent explain the most complex functions in the repo?
    Comprehension,
    /// M3: can the agent reason about how a change propagates through
    /// highly-coupled files?
    Navigation,
    /// M4: does the agent read signal out of identifier-dense files?
    Identifiers,
    /// M5: does the agent notice undocumented public API surface?
    Documentation,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Consistency,
        Metric::Comprehension,
        Metric::Navigation,
        Metric::Identifiers,
        Metric::Documentation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Consistency => "m1_consistency",
            Metric::Comprehension => "m2_comprehension",
            Metric::Navigation => "m3_navigation",
            Metric::Identifiers => "m4_identifiers",
            Metric::Documentation => "m5_documentation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Consistency => "consistency",
            Metric::Comprehension => "comprehension",
            Metric::Navigation => "navigation",
            Metric::Identifiers => "identifiers",
            Metric::Documentation => "documentation",
        }
    }

    /// Number of probe samples this metric wants, overriding the run's
    /// default K: M1 always probes the same file exactly twice regardless
    /// of the configured K, since that's the whole point of the metric.
    pub fn sample_count(&self, configured_k: usize) -> usize {
        match self {
            Metric::Consistency => 2,
            _ => configured_k.max(1),
        }
    }

    /// This metric's indicator table: substrings and their signed weight.
    /// Positive weights reward grounded, specific answers; negative weights
    /// penalize hedging. Applied additively to the base score (see
    /// [`score_response`]), so the table is the whole rubric for a metric.
    fn indicators(&self) -> &'static [(&'static str, i32)] {
        match self {
            Metric::Consistency | Metric::Comprehension => &[
                ("purpose", 2),
                ("responsible for", 2),
                ("handles", 2),
                ("implements", 2),
                ("because", 2),
                ("i don't know", -3),
                ("unclear", -3),
                ("cannot determine", -3),
                ("not enough information", -3),
                ("unsure", -3),
            ],
            Metric::Navigation => &[
                ("imports", 2),
                ("depends on", 2),
                ("calls", 2),
                ("used by", 2),
                ("propagate", 2),
                ("module", 1),
                ("caller", 1),
                ("i don't know", -3),
                ("unclear", -3),
                ("cannot determine", -3),
                ("not enough information", -3),
                ("unsure", -3),
            ],
            Metric::Identifiers => &[
                ("function", 1),
                ("struct", 1),
                ("variable", 1),
                ("field", 1),
                ("parameter", 1),
                ("descriptive", 2),
                ("name", 1),
                ("i don't know", -3),
                ("unclear", -3),
                ("cannot determine", -3),
                ("not enough information", -3),
                ("unsure", -3),
            ],
            Metric::Documentation => &[
                ("undocumented", 2),
                ("missing doc", 2),
                ("should document", 2),
                ("doc comment", 2),
                ("public api", 2),
                ("no documentation", 2),
                ("i don't know", -3),
                ("unclear", -3),
                ("cannot determine", -3),
                ("not enough information", -3),
                ("unsure", -3),
            ],
        }
    }

    pub fn prompt(&self, file_path: &str, source: &str) -> String {
        let instruction = match self {
            Metric::Consistency | Metric::Comprehension => {
                "Explain what this file is responsible for and why it exists in this codebase."
            }
            Metric::Navigation => {
                "Given this file's imports and the modules likely to depend on it, describe how a \
                 change here would propagate through the codebase."
            }
            Metric::Identifiers => {
                "List the key identifiers (functions, types, variables) in this file and explain what \
                 each name tells you about its role."
            }
            Metric::Documentation => {
                "Identify which public items in this file lack documentation and draft a one-line doc \
                 comment for each."
            }
        };
        format!("File: {file_path}\n\n{instruction}\n\n```\n{source}\n```\n")
    }
}

/// Score one response against `metric`'s rubric.
///
/// Starts from a base of 5 and adds each indicator's signed weight on first
/// match (repeats of the same phrase don't count twice). Every metric's
/// table sums its positive weights to at least 5, so an indicator-saturated
/// response always clamps to exactly 10; an all-negative response clamps to
/// 1. The clamp is what guarantees monotonicity (an answer that only hits
/// positive indicators can never score below one that only hits negative
/// ones) rather than any ordering in the table itself.
pub fn score_response(metric: Metric, response: &str) -> u8 {
    if response.trim().is_empty() {
        return 1;
    }

    let lower = response.to_lowercase();
    let word_count = response.split_whitespace().count();
    let length_bonus: i32 = if word_count > 100 { 1 } else { 0 };

    let adjustment: i32 = metric
        .indicators()
        .iter()
        .filter(|(phrase, _)| lower.contains(phrase))
        .map(|(_, weight)| weight)
        .sum();

    let score = 5i32 + adjustment + length_bonus;
    score.clamp(1, 10) as u8
}

fn tokenize(response: &str) -> HashSet<String> {
    response.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// M1's aggregation: instead of averaging independent per-response scores,
/// consistency is the average pairwise token-overlap similarity across the
/// duplicate probes, scaled onto `[1, 10]`. Identical responses score 10;
/// completely disjoint responses score 1; any empty response in the set
/// scores 1 outright (an agent that goes silent on a repeat probe is not
/// behaving consistently by any definition).
pub fn score_consistency(responses: &[String]) -> u8 {
    if responses.is_empty() || responses.iter().any(|r| r.trim().is_empty()) {
        return 1;
    }
    if responses.len() == 1 {
        return score_response(Metric::Consistency, &responses[0]);
    }

    let sets: Vec<HashSet<String>> = responses.iter().map(|r| tokenize(r)).collect();
    let mut similarities = Vec::new();
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            similarities.push(jaccard(&sets[i], &sets[j]));
        }
    }
    let avg = similarities.iter().sum::<f64>() / similarities.len() as f64;
    let score = 1.0 + avg * 9.0;
    score.round().clamp(1.0, 10.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_scores_the_floor() {
        assert_eq!(score_response(Metric::Comprehension, ""), 1);
    }

    #[test]
    fn indicator_rich_response_scores_higher_than_bare() {
        let bare = score_response(Metric::Navigation, "It does some stuff.");
        let rich = score_response(
            Metric::Navigation,
            "This module imports the parser and is used by every caller that needs to propagate \
             changes through the pipeline module.",
        );
        assert!(rich > bare);
    }

    #[test]
    fn uncertainty_phrases_pull_the_score_down() {
        let response = "purpose handles implements, but I'm unsure, unclear, cannot determine the rest.";
        assert!(score_response(Metric::Comprehension, response) <= 4);
    }

    #[test]
    fn all_indicators_saturates_at_ten() {
        for metric in Metric::ALL {
            let flooded: String =
                metric.indicators().iter().filter(|(_, w)| *w > 0).map(|(phrase, _)| *phrase).collect::<Vec<_>>().join(" ");
            assert_eq!(score_response(metric, &flooded), 10);
        }
    }

    #[test]
    fn all_negative_indicators_floors_at_one() {
        for metric in Metric::ALL {
            let hedged: String =
                metric.indicators().iter().filter(|(_, w)| *w < 0).map(|(phrase, _)| *phrase).collect::<Vec<_>>().join(" ");
            assert_eq!(score_response(metric, &hedged), 1);
        }
    }

    #[test]
    fn score_is_always_in_range() {
        for metric in Metric::ALL {
            for response in ["", "x", &"descriptive function parameter name field".repeat(5)] {
                let score = score_response(metric, response);
                assert!((1..=10).contains(&score));
            }
        }
    }

    #[test]
    fn identical_responses_are_fully_consistent() {
        let responses = vec!["this file parses rust source".to_string(), "this file parses rust source".to_string()];
        assert_eq!(score_consistency(&responses), 10);
    }

    #[test]
    fn disjoint_responses_score_the_floor() {
        let responses = vec!["alpha bravo charlie".to_string(), "delta echo foxtrot".to_string()];
        assert_eq!(score_consistency(&responses), 1);
    }

    #[test]
    fn any_empty_response_breaks_consistency() {
        let responses = vec!["this file parses rust source".to_string(), String::new()];
        assert_eq!(score_consistency(&responses), 1);
    }

    #[test]
    fn m1_always_wants_exactly_two_samples() {
        assert_eq!(Metric::Consistency.sample_count(3), 2);
        assert_eq!(Metric::Comprehension.sample_count(3), 3);
    }
}
