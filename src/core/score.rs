//! Scored output: `SubScore`, `CategoryScore`, `ScoredResult`, `Recommendation`.

use crate::core::result::Evidence;
use crate::core::types::{CategoryId, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One metric's contribution within a category, after piecewise-linear
/// interpolation against its breakpoint table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScore {
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub weight: f64,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

/// Aggregate over one category's sub-scores: a weighted mean over the
/// available sub-scores, or `None` if none of them are available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: CategoryId,
    pub name: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub sub_scores: Vec<SubScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_samples: Option<Vec<crate::core::sample::C7Sample>>,
}

impl CategoryScore {
    pub fn is_available(&self) -> bool {
        self.score.is_some()
    }
}

/// Per-category delta against a `--baseline` run, when one was supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: CategoryId,
    pub delta: f64,
}

/// Run metadata attached to a `ScoredResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub timestamp: DateTime<Utc>,
    pub tool_version: String,
    pub target_root: PathBuf,
    pub schema_version: u32,
}

/// The full scored output of one run: the only thing renderers see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Unrounded composite, retained for baseline comparisons. Never rendered directly.
    #[serde(skip)]
    pub score_unrounded: Option<f64>,
    pub tier: Tier,
    pub categories: Vec<CategoryScore>,
    pub recommendations: Vec<Recommendation>,
    pub metadata: RunMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_deltas: Option<Vec<CategoryDelta>>,
    /// How many declared categories contributed no score to the composite.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unavailable_category_count: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Effort estimate attached to a recommendation, drawn from a fixed
/// per-metric table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLabel {
    Small,
    Medium,
    Large,
}

/// A structured, copy-pasteable block an agent can act on directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementPrompt {
    pub context: String,
    pub build_test_commands: Vec<String>,
    pub task: String,
    pub current_state: String,
    pub target_state: String,
    pub constraints: Vec<String>,
    pub verification: String,
}

/// One ranked improvement suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: CategoryId,
    pub metric: String,
    pub action: String,
    pub estimated_delta: f64,
    pub effort: EffortLabel,
    pub prompt: ImprovementPrompt,
}
