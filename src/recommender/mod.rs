//! Ranks improvement actions by estimated impact on the composite score and
//! packages each one as a structured, agent-actionable prompt.
//!
//! Runs single-threaded after scoring, reading a `ScoredResult` and nothing
//! else — it never re-scores or re-ranks categories, only decides which
//! already-scored sub-scores are worth acting on first.

use crate::core::{
    CategoryId, CategoryScore, EffortLabel, ImprovementPrompt, Recommendation, ScoredResult, SubScore,
};
use crate::scoring::breakpoints;
use std::cmp::Ordering;
use std::path::Path;

/// Sub-scores at or above this bar aren't worth recommending against —
/// matches the tier boundary between "Assisted" and "Ready".
const CANDIDATE_THRESHOLD: f64 = 8.0;

const MAX_RECOMMENDATIONS: usize = 5;

/// Strip ASCII control characters (other than tab/newline) from text that
/// gets interpolated into a rendered prompt — a metric name is fixed, but
/// evidence file paths and C7 responses come from the repository being
/// scanned and must not be able to inject terminal escape sequences.
fn sanitize(s: &str) -> String {
    s.chars().filter(|c| !c.is_control() || *c == '\n' || *c == '\t').collect()
}

struct ActionTemplate {
    action: &'static str,
    task: &'static str,
    effort: EffortLabel,
}

fn template_for(metric: &str) -> ActionTemplate {
    match metric {
        "avg_cyclomatic_complexity" => ActionTemplate {
            action: "Reduce average cyclomatic complexity by extracting guard clauses and splitting branching functions.",
            task: "Lower the average cyclomatic complexity across the codebase without changing behavior.",
            effort: EffortLabel::Medium,
        },
        "max_cyclomatic_complexity" => ActionTemplate {
            action: "Refactor the most complex function into smaller, single-purpose functions.",
            task: "Split the highest-complexity function identified in the evidence into smaller functions, preserving behavior.",
            effort: EffortLabel::Medium,
        },
        "avg_function_length" => ActionTemplate {
            action: "Break up long functions into smaller named helpers.",
            task: "Shorten long functions by extracting cohesive blocks into well-named helper functions.",
            effort: EffortLabel::Medium,
        },
        "max_nesting_depth" => ActionTemplate {
            action: "Flatten deeply nested control flow using early returns or guard clauses.",
            task: "Reduce the maximum nesting depth of the flagged function using early returns.",
            effort: EffortLabel::Small,
        },
        "duplication_ratio" => ActionTemplate {
            action: "Extract duplicated code blocks into a shared function.",
            task: "Identify the largest duplicated block and extract it into a single shared implementation.",
            effort: EffortLabel::Medium,
        },
        "test_function_ratio" => ActionTemplate {
            action: "Add unit tests for untested functions, especially public entry points.",
            task: "Raise test coverage by adding unit tests for currently untested public functions.",
            effort: EffortLabel::Large,
        },
        "import_cycle_ratio" => ActionTemplate {
            action: "Break the import cycle by extracting shared types into a lower-level module.",
            task: "Eliminate the flagged import cycle by extracting the shared dependency into its own module.",
            effort: EffortLabel::Large,
        },
        "churn_concentration" => ActionTemplate {
            action: "Split the most frequently-changed file into smaller, more stable modules.",
            task: "Reduce churn concentration by splitting the flagged file along its natural seams.",
            effort: EffortLabel::Large,
        },
        "public_doc_ratio" => ActionTemplate {
            action: "Add doc comments to public items that currently lack them.",
            task: "Write doc comments for the public items flagged as undocumented.",
            effort: EffortLabel::Small,
        },
        "naming_convention_ratio" => ActionTemplate {
            action: "Rename identifiers to follow standard naming conventions.",
            task: "Bring non-conforming identifiers in line with the language's naming conventions.",
            effort: EffortLabel::Small,
        },
        "todo_density_per_1000_lines" => ActionTemplate {
            action: "Resolve or ticket outstanding TODO/FIXME markers.",
            task: "Work through the TODO/FIXME markers flagged by the scan: resolve them or convert them into tracked issues.",
            effort: EffortLabel::Small,
        },
        "m1_consistency" => ActionTemplate {
            action: "Clarify the file's purpose (naming, doc comments, structure) so repeated agent queries answer it the same way.",
            task: "Reduce ambiguity in the flagged file so an agent explains it identically on repeated runs.",
            effort: EffortLabel::Medium,
        },
        "m2_comprehension" => ActionTemplate {
            action: "Simplify or document the most complex logic so an agent can explain it confidently.",
            task: "Make the flagged file's most complex function easier for an agent to summarize correctly.",
            effort: EffortLabel::Medium,
        },
        "m3_navigation" => ActionTemplate {
            action: "Reduce coupling on heavily-depended-upon files, or document their role for downstream callers.",
            task: "Make it easier for an agent to reason about how a change to the flagged file propagates.",
            effort: EffortLabel::Large,
        },
        "m4_identifiers" => ActionTemplate {
            action: "Rename identifiers in dense files to be self-descriptive.",
            task: "Replace terse or ambiguous identifiers in the flagged file with self-descriptive names.",
            effort: EffortLabel::Small,
        },
        "m5_documentation" => ActionTemplate {
            action: "Document the public API surface an agent flagged as unclear.",
            task: "Add doc comments to the public items an agent identified as undocumented.",
            effort: EffortLabel::Small,
        },
        _ => ActionTemplate {
            action: "Improve this metric's underlying measurement.",
            task: "Address the flagged measurement.",
            effort: EffortLabel::Medium,
        },
    }
}

/// Build/test commands a recommendation's verification step can reference,
/// inferred from which project manifest is present at the scan root.
fn detect_build_test_commands(root: &Path) -> Vec<String> {
    if root.join("Cargo.toml").exists() {
        vec!["cargo build".to_string(), "cargo test".to_string()]
    } else if root.join("package.json").exists() {
        vec!["npm install".to_string(), "npm test".to_string()]
    } else if root.join("pyproject.toml").exists() || root.join("setup.py").exists() {
        vec!["pip install -e .".to_string(), "pytest".to_string()]
    } else if root.join("go.mod").exists() {
        vec!["go build ./...".to_string(), "go test ./...".to_string()]
    } else {
        Vec::new()
    }
}

fn build_prompt(category: &CategoryScore, sub: &SubScore, next_raw: Option<f64>, root: &Path) -> ImprovementPrompt {
    let template = template_for(&sub.metric);
    let current_score = sub.score.unwrap_or(1.0);

    let evidence_line = sub
        .evidence
        .first()
        .and_then(|e| e.file.as_ref())
        .map(|f| format!(" (see {})", sanitize(&f.display().to_string())))
        .unwrap_or_default();

    let target_state = match next_raw {
        Some(raw) => format!("{}: raw value at or beyond {raw:.2}", sub.metric),
        None => format!("{}: 10.0/10", sub.metric),
    };

    ImprovementPrompt {
        context: sanitize(&format!(
            "This repository scored {current_score:.1}/10 on {} ({}).{evidence_line}",
            sanitize(&sub.metric),
            category.name,
        )),
        build_test_commands: detect_build_test_commands(root),
        task: sanitize(template.task),
        current_state: sanitize(&format!("{}: {current_score:.1}/10", sub.metric)),
        target_state: sanitize(&target_state),
        constraints: vec![
            "Do not change externally observable behavior.".to_string(),
            "Keep the existing public API stable unless the task explicitly requires otherwise.".to_string(),
        ],
        verification: sanitize("Re-run the scan and confirm the target metric's score has improved."),
    }
}

/// Rank up to [`MAX_RECOMMENDATIONS`] sub-scores below [`CANDIDATE_THRESHOLD`]
/// by estimated composite impact: find the nearest breakpoint that would
/// raise this metric's score at all, and estimate `(next.score - score) *
/// sub.weight * category.weight / sum(available category weights)` — "how
/// much would the composite move if this metric reached its next tier,
/// holding everything else fixed". A metric with no raw value on record (or
/// already at its table's best attainable score) falls back to a flat jump
/// to 10.0. Ties broken by lower current score, then metric name, matching
/// the ranking's own determinism requirement.
pub fn recommend(scored: &ScoredResult) -> Vec<Recommendation> {
    let weight_sum: f64 = scored.categories.iter().filter(|c| c.is_available()).map(|c| c.weight).sum();
    if weight_sum <= 0.0 {
        return Vec::new();
    }

    let mut candidates: Vec<(CategoryId, &CategoryScore, &SubScore, Option<f64>, f64)> = Vec::new();
    for category in &scored.categories {
        if !category.is_available() {
            continue;
        }
        let category_fraction = category.weight / weight_sum;
        for sub in &category.sub_scores {
            if !sub.available {
                continue;
            }
            let score = sub.score.unwrap_or(1.0);
            if score >= CANDIDATE_THRESHOLD {
                continue;
            }

            let next = sub.raw.and_then(|raw| breakpoints::table_for(&sub.metric).and_then(|t| t.next_improvement(raw)));
            let next_score = next.map(|b| b.score).unwrap_or(10.0);
            let estimated_delta = (next_score - score) * sub.weight * category_fraction;
            candidates.push((category.category, category, sub, next.map(|b| b.raw), estimated_delta));
        }
    }

    candidates.sort_by(|a, b| {
        b.4.partial_cmp(&a.4)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.2.score
                    .unwrap_or(1.0)
                    .partial_cmp(&b.2.score.unwrap_or(1.0))
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.2.metric.cmp(&b.2.metric))
    });

    let root = scored.metadata.target_root.as_path();
    candidates
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(category_id, category, sub, next_raw, estimated_delta)| Recommendation {
            category: category_id,
            metric: sub.metric.clone(),
            action: template_for(&sub.metric).action.to_string(),
            estimated_delta,
            effort: template_for(&sub.metric).effort,
            prompt: build_prompt(category, sub, next_raw, root),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RunMetadata, Tier};
    use std::path::PathBuf;

    fn category(id: CategoryId, weight: f64, subs: Vec<SubScore>) -> CategoryScore {
        let score = {
            let available: Vec<&SubScore> = subs.iter().filter(|s| s.available).collect();
            if available.is_empty() {
                None
            } else {
                let weight_sum: f64 = available.iter().map(|s| s.weight).sum();
                Some(available.iter().map(|s| s.score.unwrap() * s.weight).sum::<f64>() / weight_sum)
            }
        };
        CategoryScore {
            category: id,
            name: id.display_name().to_string(),
            weight,
            score,
            sub_scores: subs,
            debug_samples: None,
        }
    }

    fn sub(metric: &str, raw: f64, score: f64, weight: f64) -> SubScore {
        SubScore {
            metric: metric.to_string(),
            raw: Some(raw),
            score: Some(score),
            weight,
            available: true,
            evidence: Vec::new(),
        }
    }

    fn scored_with(categories: Vec<CategoryScore>) -> ScoredResult {
        ScoredResult {
            version: 1,
            score: Some(5.0),
            score_unrounded: Some(5.0),
            tier: Tier::Limited,
            categories,
            recommendations: Vec::new(),
            metadata: RunMetadata {
                timestamp: chrono::Utc::now(),
                tool_version: "0.1.0".to_string(),
                target_root: PathBuf::from("."),
                schema_version: 1,
            },
            baseline_deltas: None,
            unavailable_category_count: 0,
        }
    }

    #[test]
    fn worst_sub_score_ranks_first() {
        let scored = scored_with(vec![category(
            CategoryId::C1,
            0.5,
            vec![
                sub("avg_cyclomatic_complexity", 2.0, 9.0, 0.5),
                sub("max_cyclomatic_complexity", 40.0, 1.0, 0.5),
            ],
        )]);
        let recs = recommend(&scored);
        assert_eq!(recs[0].metric, "max_cyclomatic_complexity");
    }

    #[test]
    fn perfect_scores_produce_no_recommendations() {
        let scored = scored_with(vec![category(
            CategoryId::C5,
            1.0,
            vec![sub("public_doc_ratio", 1.0, 10.0, 1.0)],
        )]);
        assert!(recommend(&scored).is_empty());
    }

    #[test]
    fn caps_at_five_recommendations() {
        let subs: Vec<SubScore> = (0..8)
            .map(|i| sub(&format!("metric_{i}"), 0.0, 2.0, 1.0 / 8.0))
            .collect();
        let scored = scored_with(vec![category(CategoryId::C1, 1.0, subs)]);
        assert_eq!(recommend(&scored).len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn prompt_tokens_strip_control_characters() {
        assert_eq!(sanitize("normal text"), "normal text");
        assert_eq!(sanitize("esc\x1b[31minjected"), "esc[31minjected");
    }
}
