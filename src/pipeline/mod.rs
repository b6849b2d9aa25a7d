//! Orchestrates one scan end to end: discovery, parsing, the C1-C6
//! reference analyzers, the C7 agent subsystem, scoring and recommending.
//!
//! Mirrors the phased execution the CLI's single `analyze` command drives —
//! each stage logs its own phase, and the C1-C6 fan-out runs on a rayon pool
//! sized from [`Config::jobs`], the same knob the CLI's `--jobs` flag feeds.
//! The async C7 subsystem gets its own single-purpose tokio runtime rather
//! than sharing the rayon pool, since it's I/O-bound on a subprocess, not
//! CPU-bound like the reference analyzers.

use crate::agent;
use crate::analyzers::{self, Analyzer};
use crate::config::Config;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, ScoredResult};
use crate::discovery::{self, DiscoveryReport};
use crate::errors::{ArsError, ArsResult};
use crate::parsers::{self, ParseFailure};
use crate::recommender;
use crate::scoring;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

/// How long a single C1-C6 analyzer gets before it's abandoned and its
/// category degrades to unavailable. Generous on purpose: this bounds a
/// hang or infinite loop in one analyzer, not normal run time.
const ANALYZER_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything one scan produced, beyond the [`ScoredResult`] renderers see.
/// Discovery and parse diagnostics matter for terminal summaries and
/// `--json` debug output, but aren't part of the scored schema itself.
pub struct ScanOutcome {
    pub scored: ScoredResult,
    pub discovery: DiscoveryReport,
    pub parse_failures: Vec<ParseFailure>,
}

fn configure_thread_pool(jobs: Option<usize>) -> Option<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        if jobs > 0 {
            builder = builder.num_threads(jobs);
        }
    }
    builder.build().ok()
}

/// Run one analyzer on a detached thread so a panic or hang never takes the
/// whole scan down with it — both degrade that category to unavailable.
fn run_analyzer_guarded(analyzer: Box<dyn Analyzer>, targets: Arc<Vec<AnalysisTarget>>) -> AnalysisResult {
    let category = analyzer.category();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| analyzer.analyze(&targets)));
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(ANALYZER_TIMEOUT) {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => {
            tracing::warn!(category = category.config_key(), "analyzer panicked, category unavailable");
            AnalysisResult::unavailable(category, &[], Some("analyzer panicked".to_string()))
        }
        Err(_) => {
            tracing::warn!(
                category = category.config_key(),
                timeout_secs = ANALYZER_TIMEOUT.as_secs(),
                "analyzer timed out, category unavailable"
            );
            AnalysisResult::unavailable(category, &[], Some("analyzer timed out".to_string()))
        }
    }
}

fn run_reference_analyzers(targets: Arc<Vec<AnalysisTarget>>, jobs: Option<usize>) -> Vec<AnalysisResult> {
    use rayon::prelude::*;

    let analyzers = analyzers::reference_analyzers();
    let run = move || -> Vec<AnalysisResult> {
        analyzers
            .into_par_iter()
            .map(|analyzer| run_analyzer_guarded(analyzer, Arc::clone(&targets)))
            .collect()
    };

    match configure_thread_pool(jobs) {
        Some(pool) => pool.install(run),
        None => run(),
    }
}

fn run_agent_evaluation(root: &Path, targets: &[AnalysisTarget], config: &Config) -> AnalysisResult {
    let metric_names: Vec<&str> = agent::rubric::Metric::ALL.iter().map(|m| m.key()).collect();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            return AnalysisResult::unavailable(
                CategoryId::C7,
                &metric_names,
                Some(format!("failed to start agent runtime: {e}")),
            );
        }
    };

    runtime.block_on(agent::evaluate(root, targets, &config.agent))
}

/// Run one full scan: discovery through ranked recommendations.
///
/// `root` must exist and contain at least one analyzable file; either
/// failure surfaces as a fatal [`ArsError::Discovery`] since there is
/// nothing left to score. Every later stage degrades gracefully instead of
/// aborting: a failed analyzer, a missing agent binary, or an unparsable
/// file all become `unavailable` data rather than a failed run.
pub fn run(root: &Path, config: &Config, baseline: Option<&ScoredResult>) -> ArsResult<ScanOutcome> {
    config.validate().map_err(ArsError::config)?;

    crate::observability::set_phase("discovery");
    tracing::info!(phase = "discovery", root = %root.display(), "starting scan");
    let discovery = discovery::discover(root, &config.discovery)?;
    if discovery.total_files() == 0 {
        return Err(ArsError::discovery_with_path(
            "no analyzable files found under target path",
            root,
        ));
    }

    crate::observability::set_phase("parse");
    tracing::info!(phase = "parse", files = discovery.total_files(), "parsing discovered files");
    let parse_report = parsers::parse_all(root, &discovery);
    let targets: Vec<AnalysisTarget> = parse_report
        .targets
        .iter()
        .filter(|t| config.allows_language(t.language))
        .cloned()
        .collect();
    let targets = Arc::new(targets);

    crate::observability::set_phase("analyze");
    tracing::info!(phase = "analyze", "running reference analyzers");
    let mut results = run_reference_analyzers(Arc::clone(&targets), config.jobs);

    crate::observability::set_phase("agent");
    tracing::info!(phase = "agent", enabled = config.agent.enabled, "running agent evaluation");
    results.push(run_agent_evaluation(root, &targets, config));

    crate::observability::set_phase("score");
    tracing::info!(phase = "score", "scoring results");
    let mut scored = scoring::score(&results, config, root.to_path_buf(), baseline);

    crate::observability::set_phase("recommend");
    tracing::info!(phase = "recommend", "ranking recommendations");
    scored.recommendations = recommender::recommend(&scored);

    Ok(ScanOutcome {
        scored,
        discovery,
        parse_failures: parse_report.failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_repository_is_a_fatal_discovery_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = run(tmp.path(), &Config::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn single_trivial_file_produces_a_defined_composite() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("lib.rs"), "pub fn add(a: i32, b: i32) -> i32 { a + b }\n").unwrap();

        let outcome = run(tmp.path(), &Config::default(), None).unwrap();
        assert!(outcome.scored.score.is_some());
        // C7 is disabled by default, so it contributes no weight.
        assert_eq!(outcome.scored.unavailable_category_count, 1);
    }

    #[test]
    fn missing_root_is_a_fatal_discovery_error() {
        let result = run(Path::new("/no/such/path/at/all"), &Config::default(), None);
        assert!(result.is_err());
    }
}
