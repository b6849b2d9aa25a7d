//! Root configuration structure, merged from defaults, `.arsrc.yml` and CLI flags.

use super::scoring::CategoryWeights;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File discovery settings: what gets walked, what gets skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Glob patterns excluded in addition to `.gitignore`.
    #[serde(default = "default_exclude_patterns")]
    pub exclude: Vec<String>,

    /// Hard cap on files discovered; discovery stops and warns past this.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Files larger than this are skipped and recorded as unavailable evidence.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Follow symlinks while walking. Off by default to avoid cycles.
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude_patterns(),
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
            follow_symlinks: false,
        }
    }
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "target/**".to_string(),
        "node_modules/**".to_string(),
        ".git/**".to_string(),
        "vendor/**".to_string(),
        "dist/**".to_string(),
        "build/**".to_string(),
        "testdata/**".to_string(),
    ]
}

fn default_max_files() -> usize {
    20_000
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024
}

/// C7 agent-evaluation subsystem settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// C7 is opt-in: it shells out to a real agent binary and costs real time.
    #[serde(default)]
    pub enabled: bool,

    /// Command used to invoke the headless agent, e.g. `["claude", "-p"]`.
    #[serde(default = "default_agent_command")]
    pub command: Vec<String>,

    /// Per-probe timeout before the subprocess group is killed.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Maximum probes running concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Samples per metric (M1 always uses exactly 2, regardless of this).
    #[serde(default = "default_k_samples")]
    pub k_samples: usize,

    /// Retain full prompts/responses on the `AnalysisResult` for this run.
    #[serde(default)]
    pub debug: bool,

    /// Where content-hash-keyed probe responses are cached between runs.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Capability names passed through to the agent, e.g. restricting it to
    /// read-only tool use during evaluation. Empty means no restriction flag
    /// is passed at all.
    #[serde(default)]
    pub allowed_tools: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_agent_command(),
            probe_timeout_secs: default_probe_timeout_secs(),
            max_concurrency: default_max_concurrency(),
            k_samples: default_k_samples(),
            debug: false,
            cache_dir: default_cache_dir(),
            allowed_tools: Vec::new(),
        }
    }
}

fn default_agent_command() -> Vec<String> {
    vec!["claude".to_string(), "-p".to_string()]
}

fn default_probe_timeout_secs() -> u64 {
    60
}

fn default_max_concurrency() -> usize {
    4
}

fn default_k_samples() -> usize {
    3
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".ars-cache")
}

/// `scoring:` section of `.arsrc.yml`: category weights plus the
/// `--threshold` equivalent, grouped the way the file nests them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScoringSection {
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Non-negative; exit code 2 if the rounded composite falls below it.
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Per-metric override: disable a metric outright, or note the raw value
/// past which the recommender should consider it "good enough".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MetricOverride {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

fn default_version() -> u32 {
    1
}

/// Root configuration. `deny_unknown_fields` at every level: a typo'd key
/// in `.arsrc.yml` fails loudly at load time rather than being silently
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub scoring: ScoringSection,

    #[serde(default)]
    pub agent: AgentConfig,

    /// Allowlist of languages to analyze, by display name (e.g. `Rust`,
    /// `Python`); `None` analyzes every language discovery classifies.
    #[serde(default)]
    pub languages: Option<Vec<String>>,

    /// Per-metric overrides, keyed by the stable metric name used in
    /// `AnalysisResult::metrics` (e.g. `avg_cyclomatic_complexity`).
    #[serde(default)]
    pub metrics: std::collections::BTreeMap<String, MetricOverride>,

    /// Analyzer worker threads; `None` defers to rayon's default (num_cpus).
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            discovery: DiscoveryConfig::default(),
            scoring: ScoringSection::default(),
            agent: AgentConfig::default(),
            languages: None,
            metrics: std::collections::BTreeMap::new(),
            jobs: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.version != 1 {
            return Err(format!("unsupported config version {}, expected 1", self.version));
        }
        self.scoring.weights.validate()?;
        if let Some(threshold) = self.scoring.threshold {
            if !(1.0..=10.0).contains(&threshold) {
                return Err(format!("threshold must be within [1.0, 10.0], got {threshold}"));
            }
        }
        if self.discovery.max_files == 0 {
            return Err("discovery.max_files must be greater than zero".to_string());
        }
        if self.agent.enabled && self.agent.command.is_empty() {
            return Err("agent.command must not be empty when agent.enabled is true".to_string());
        }
        if let Some(languages) = &self.languages {
            for name in languages {
                if crate::core::Language::from_name(name).is_none() {
                    return Err(format!("unknown language '{name}' in languages allowlist"));
                }
            }
        }
        Ok(())
    }

    /// Whether `language` passes the configured allowlist (everything
    /// passes when no allowlist was configured).
    pub fn allows_language(&self, language: crate::core::Language) -> bool {
        match &self.languages {
            None => true,
            Some(allowed) => allowed.iter().any(|name| crate::core::Language::from_name(name) == Some(language)),
        }
    }

    /// Whether `metric` was explicitly disabled via `metrics.<name>.enabled: false`.
    pub fn metric_disabled(&self, metric: &str) -> bool {
        self.metrics.get(metric).and_then(|m| m.enabled).is_some_and(|enabled| !enabled)
    }

    /// Normalize derived fields after validation (currently just the weights).
    pub fn normalize(&mut self) {
        self.scoring.weights.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let config = Config {
            scoring: ScoringSection {
                threshold: Some(11.0),
                ..ScoringSection::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn enabling_agent_with_empty_command_is_rejected() {
        let config = Config {
            agent: AgentConfig {
                enabled: true,
                command: Vec::new(),
                ..AgentConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_language_in_allowlist_is_rejected() {
        let config = Config {
            languages: Some(vec!["Cobol".to_string()]),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let config = Config {
            version: 2,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn metric_disabled_reflects_explicit_override_only() {
        let mut config = Config::default();
        assert!(!config.metric_disabled("avg_cyclomatic_complexity"));
        config.metrics.insert(
            "avg_cyclomatic_complexity".to_string(),
            MetricOverride {
                enabled: Some(false),
                threshold: None,
            },
        );
        assert!(config.metric_disabled("avg_cyclomatic_complexity"));
    }
}
