//! Category weights used to combine per-category scores into the composite.

use serde::{Deserialize, Serialize};

/// Weight given to each category when computing the composite score.
///
/// Weights need not sum to 1.0 in the config file: [`CategoryWeights::normalize`]
/// rescales them, and the scoring engine additionally renormalizes at
/// composite time over whichever categories actually produced a score (see
/// [`crate::scoring::composite`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryWeights {
    #[serde(default = "default_c1_weight")]
    pub c1_structure: f64,
    #[serde(default = "default_c2_weight")]
    pub c2_duplication: f64,
    #[serde(default = "default_c3_weight")]
    pub c3_testing: f64,
    #[serde(default = "default_c4_weight")]
    pub c4_architecture: f64,
    #[serde(default = "default_c5_weight")]
    pub c5_documentation: f64,
    #[serde(default = "default_c6_weight")]
    pub c6_conventions: f64,
    #[serde(default = "default_c7_weight")]
    pub c7_agent_eval: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            c1_structure: default_c1_weight(),
            c2_duplication: default_c2_weight(),
            c3_testing: default_c3_weight(),
            c4_architecture: default_c4_weight(),
            c5_documentation: default_c5_weight(),
            c6_conventions: default_c6_weight(),
            c7_agent_eval: default_c7_weight(),
        }
    }
}

// C7 carries the most predictive weight: it is the only category that
// actually exercises an agent against the repository rather than proxying
// for agent-friendliness through static metrics.
fn default_c1_weight() -> f64 {
    0.15
}
fn default_c2_weight() -> f64 {
    0.10
}
fn default_c3_weight() -> f64 {
    0.10
}
fn default_c4_weight() -> f64 {
    0.10
}
fn default_c5_weight() -> f64 {
    0.10
}
fn default_c6_weight() -> f64 {
    0.05
}
fn default_c7_weight() -> f64 {
    0.40
}

impl CategoryWeights {
    pub fn get(&self, category: crate::core::CategoryId) -> f64 {
        use crate::core::CategoryId;
        match category {
            CategoryId::C1 => self.c1_structure,
            CategoryId::C2 => self.c2_duplication,
            CategoryId::C3 => self.c3_testing,
            CategoryId::C4 => self.c4_architecture,
            CategoryId::C5 => self.c5_documentation,
            CategoryId::C6 => self.c6_conventions,
            CategoryId::C7 => self.c7_agent_eval,
        }
    }

    fn sum(&self) -> f64 {
        self.c1_structure
            + self.c2_duplication
            + self.c3_testing
            + self.c4_architecture
            + self.c5_documentation
            + self.c6_conventions
            + self.c7_agent_eval
    }

    /// Reject negative weights and an all-zero table; anything else is
    /// renormalized rather than rejected, matching how per-run
    /// renormalization already has to tolerate missing categories.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("c1_structure", self.c1_structure),
            ("c2_duplication", self.c2_duplication),
            ("c3_testing", self.c3_testing),
            ("c4_architecture", self.c4_architecture),
            ("c5_documentation", self.c5_documentation),
            ("c6_conventions", self.c6_conventions),
            ("c7_agent_eval", self.c7_agent_eval),
        ];
        for (name, weight) in fields {
            if weight < 0.0 {
                return Err(format!("{name} weight must not be negative, got {weight}"));
            }
        }
        if self.sum() <= 0.0 {
            return Err("category weights must not all be zero".to_string());
        }
        Ok(())
    }

    /// Rescale weights to sum to 1.0. Assumes `validate` already passed.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum > 0.0 && (sum - 1.0).abs() > 1e-9 {
            self.c1_structure /= sum;
            self.c2_duplication /= sum;
            self.c3_testing /= sum;
            self.c4_architecture /= sum;
            self.c5_documentation /= sum;
            self.c6_conventions /= sum;
            self.c7_agent_eval /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_normalize_to_one() {
        let mut weights = CategoryWeights::default();
        weights.validate().unwrap();
        weights.normalize();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let weights = CategoryWeights {
            c1_structure: -0.1,
            ..CategoryWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn all_zero_is_rejected() {
        let weights = CategoryWeights {
            c1_structure: 0.0,
            c2_duplication: 0.0,
            c3_testing: 0.0,
            c4_architecture: 0.0,
            c5_documentation: 0.0,
            c6_conventions: 0.0,
            c7_agent_eval: 0.0,
        };
        assert!(weights.validate().is_err());
    }
}
