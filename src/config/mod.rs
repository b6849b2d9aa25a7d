//! Layered configuration: CLI flags override `--config`, which overrides a
//! discovered `.arsrc.yml`, which overrides built-in defaults.

pub mod core;
pub mod loader;
pub mod scoring;

pub use core::{AgentConfig, Config, DiscoveryConfig, MetricOverride, ScoringSection};
pub use loader::load_config;
pub use scoring::CategoryWeights;
