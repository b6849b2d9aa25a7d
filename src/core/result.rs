//! Output of one analyzer run: `AnalysisResult`, `MetricValue`, `Evidence`.

use crate::core::types::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An advisory pointer to the data that produced a metric's raw value.
///
/// Evidence is for explanation only: the scoring engine must never branch
/// on it, and removing it from a `MetricValue` never changes the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Evidence {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            entity: None,
            value: None,
        }
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A single named metric observation from one analyzer.
///
/// `raw` and `evidence` are only meaningful when `available` is `true`. An
/// analyzer sets `available = false` (leaving `raw` as `None`) when it could
/// not produce the metric for this target at all, rather than guessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricValue {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl MetricValue {
    pub fn available(raw: f64) -> Self {
        Self {
            available: true,
            raw: Some(raw),
            evidence: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            raw: None,
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<Evidence>) -> Self {
        self.evidence = evidence;
        self
    }
}

/// Output of one analyzer on one category's worth of targets.
///
/// `metrics` is a `BTreeMap` rather than a `HashMap` deliberately: scoring
/// determinism requires sorted iteration, not insertion order or hash order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub category: CategoryId,
    pub metrics: BTreeMap<String, MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present only when `--debug-c7` was requested and this is the C7 result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_samples: Option<Vec<crate::core::sample::C7Sample>>,
}

impl AnalysisResult {
    pub fn new(category: CategoryId) -> Self {
        Self {
            category,
            metrics: BTreeMap::new(),
            error: None,
            debug_samples: None,
        }
    }

    /// Build a result where every declared metric is unavailable, e.g.
    /// because the analyzer's language parser failed or the category was
    /// never enabled for this run.
    pub fn unavailable(category: CategoryId, metric_names: &[&str], error: Option<String>) -> Self {
        let metrics = metric_names
            .iter()
            .map(|name| (name.to_string(), MetricValue::unavailable()))
            .collect();
        Self {
            category,
            metrics,
            error,
            debug_samples: None,
        }
    }

    pub fn insert(&mut self, metric: impl Into<String>, value: MetricValue) {
        self.metrics.insert(metric.into(), value);
    }
}
