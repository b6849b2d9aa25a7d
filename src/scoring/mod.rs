//! Converts raw per-category [`crate::core::AnalysisResult`]s into a
//! [`crate::core::ScoredResult`]: metric → sub-score → category → composite.
//!
//! Single-threaded and deterministic by construction — metrics are read out
//! of `AnalysisResult::metrics` (a `BTreeMap`), so the same inputs always
//! walk in the same order and produce byte-identical JSON.

pub mod breakpoints;

use crate::config::Config;
use crate::core::{
    AnalysisResult, CategoryDelta, CategoryId, CategoryScore, RunMetadata, ScoredResult, SubScore, Tier,
};
use std::path::PathBuf;

const SCHEMA_VERSION: u32 = 1;

fn score_sub(metric: &str, value: &crate::core::MetricValue, weight: f64, config: &Config) -> SubScore {
    if !value.available || config.metric_disabled(metric) {
        return SubScore {
            metric: metric.to_string(),
            raw: None,
            score: None,
            weight,
            available: false,
            evidence: Vec::new(),
        };
    }

    let raw = value.raw.unwrap_or(0.0);
    let score = breakpoints::table_for(metric).map(|t| t.interpolate(raw)).unwrap_or(raw.clamp(1.0, 10.0));

    SubScore {
        metric: metric.to_string(),
        raw: Some(raw),
        score: Some(score),
        weight,
        available: true,
        evidence: value.evidence.clone(),
    }
}

/// Aggregate one analyzer's result into a `CategoryScore`.
///
/// Sub-scores within a category are weighted equally; the category score
/// is a weighted mean over only the sub-scores that are `available`,
/// renormalized so an unavailable metric neither drags the score down nor
/// needs a synthetic value.
pub fn score_category(result: &AnalysisResult, category_weight: f64, config: &Config) -> CategoryScore {
    let metric_count = result.metrics.len().max(1);
    let uniform_weight = 1.0 / metric_count as f64;

    let sub_scores: Vec<SubScore> = result
        .metrics
        .iter()
        .map(|(name, value)| score_sub(name, value, uniform_weight, config))
        .collect();

    let available_weight: f64 = sub_scores.iter().filter(|s| s.available).map(|s| s.weight).sum();
    let score = if available_weight > 0.0 {
        let weighted_sum: f64 = sub_scores
            .iter()
            .filter(|s| s.available)
            .map(|s| s.score.unwrap() * s.weight)
            .sum();
        Some(weighted_sum / available_weight)
    } else {
        None
    };

    CategoryScore {
        category: result.category,
        name: result.category.display_name().to_string(),
        weight: category_weight,
        score,
        sub_scores,
        debug_samples: result.debug_samples.clone(),
    }
}

/// Weighted mean over categories that produced a score, weights
/// renormalized over just those categories. Returns `(rounded, unrounded)`.
pub fn score_composite(categories: &[CategoryScore]) -> (Option<f64>, Option<f64>) {
    let available: Vec<&CategoryScore> = categories.iter().filter(|c| c.is_available()).collect();
    if available.is_empty() {
        return (None, None);
    }

    let weight_sum: f64 = available.iter().map(|c| c.weight).sum();
    if weight_sum <= 0.0 {
        return (None, None);
    }

    let composite = available.iter().map(|c| c.score.unwrap() * c.weight).sum::<f64>() / weight_sum;
    let rounded = (composite * 10.0).round() / 10.0;
    (Some(rounded), Some(composite))
}

fn baseline_deltas(categories: &[CategoryScore], baseline: &ScoredResult) -> Vec<CategoryDelta> {
    categories
        .iter()
        .filter_map(|category| {
            let current = category.score?;
            let previous = baseline
                .categories
                .iter()
                .find(|b| b.category == category.category)
                .and_then(|b| b.score)?;
            Some(CategoryDelta {
                category: category.category,
                delta: current - previous,
            })
        })
        .collect()
}

/// Score every `AnalysisResult` of a run into a `ScoredResult`.
///
/// Categories missing from `results` (an analyzer never ran, or a
/// language was entirely absent) are treated the same as a result whose
/// every metric is unavailable: they contribute no weight to the
/// composite. `recommendations` is left empty here; the recommender stage
/// fills it in from this `ScoredResult` afterward.
pub fn score(
    results: &[AnalysisResult],
    config: &Config,
    target_root: PathBuf,
    baseline: Option<&ScoredResult>,
) -> ScoredResult {
    let categories: Vec<CategoryScore> = CategoryId::ALL
        .iter()
        .map(|&category| {
            let category_weight = config.scoring.weights.get(category);
            match results.iter().find(|r| r.category == category) {
                Some(result) => score_category(result, category_weight, config),
                None => CategoryScore {
                    category,
                    name: category.display_name().to_string(),
                    weight: category_weight,
                    score: None,
                    sub_scores: Vec::new(),
                    debug_samples: None,
                },
            }
        })
        .collect();

    let (rounded, unrounded) = score_composite(&categories);
    let tier = rounded.map(Tier::classify).unwrap_or(Tier::Unavailable);
    let unavailable_category_count = categories.iter().filter(|c| !c.is_available()).count();
    let deltas = baseline.map(|b| baseline_deltas(&categories, b));

    ScoredResult {
        version: SCHEMA_VERSION,
        score: rounded,
        score_unrounded: unrounded,
        tier,
        categories,
        recommendations: Vec::new(),
        metadata: RunMetadata {
            timestamp: chrono::Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            target_root,
            schema_version: SCHEMA_VERSION,
        },
        baseline_deltas: deltas,
        unavailable_category_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MetricValue;

    fn result_with(category: CategoryId, metrics: &[(&str, Option<f64>)]) -> AnalysisResult {
        let mut result = AnalysisResult::new(category);
        for (name, raw) in metrics {
            let value = match raw {
                Some(v) => MetricValue::available(*v),
                None => MetricValue::unavailable(),
            };
            result.insert(*name, value);
        }
        result
    }

    #[test]
    fn category_with_all_metrics_unavailable_has_no_score() {
        let result = result_with(CategoryId::C5, &[("public_doc_ratio", None)]);
        let scored = score_category(&result, 0.1, &Config::default());
        assert!(scored.score.is_none());
    }

    #[test]
    fn category_score_ignores_unavailable_metrics_in_the_mean() {
        let result = result_with(
            CategoryId::C1,
            &[("avg_cyclomatic_complexity", Some(1.0)), ("max_cyclomatic_complexity", None)],
        );
        let scored = score_category(&result, 0.15, &Config::default());
        // only the available metric should drive the category score
        assert_eq!(scored.score, Some(10.0));
    }

    #[test]
    fn disabled_metric_is_treated_as_unavailable() {
        let result = result_with(CategoryId::C1, &[("avg_cyclomatic_complexity", Some(1.0))]);
        let mut config = Config::default();
        config.metrics.insert(
            "avg_cyclomatic_complexity".to_string(),
            crate::config::MetricOverride {
                enabled: Some(false),
                threshold: None,
            },
        );
        let scored = score_category(&result, 0.15, &config);
        assert!(scored.score.is_none());
    }

    #[test]
    fn composite_is_none_when_no_category_is_available() {
        let categories = vec![CategoryScore {
            category: CategoryId::C1,
            name: "x".to_string(),
            weight: 0.15,
            score: None,
            sub_scores: Vec::new(),
            debug_samples: None,
        }];
        assert_eq!(score_composite(&categories), (None, None));
    }

    #[test]
    fn composite_renormalizes_over_available_categories_only() {
        let categories = vec![
            CategoryScore {
                category: CategoryId::C1,
                name: "a".to_string(),
                weight: 0.5,
                score: Some(10.0),
                sub_scores: Vec::new(),
                debug_samples: None,
            },
            CategoryScore {
                category: CategoryId::C2,
                name: "b".to_string(),
                weight: 0.5,
                score: None,
                sub_scores: Vec::new(),
                debug_samples: None,
            },
        ];
        let (rounded, _) = score_composite(&categories);
        assert_eq!(rounded, Some(10.0));
    }

    #[test]
    fn full_run_produces_a_classified_tier() {
        let results = vec![result_with(CategoryId::C5, &[("public_doc_ratio", Some(1.0))])];
        let config = Config::default();
        let scored = score(&results, &config, PathBuf::from("."), None);
        assert_eq!(scored.score, Some(10.0));
        assert!(matches!(scored.tier, Tier::Ready));
        assert_eq!(scored.unavailable_category_count, 6);
    }
}
