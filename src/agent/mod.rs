//! C7: agent-probe evaluation — the only category that actually exercises
//! an agent against the repository rather than proxying for
//! agent-friendliness through static metrics.
//!
//! Disabled by default ([`crate::config::AgentConfig::enabled`] is `false`):
//! it shells out to a real binary and is the slowest stage in a run by far.
//! When enabled, the five [`rubric::Metric`]s run concurrently, one task
//! each; within a metric, samples are probed sequentially so a slow or
//! failing probe doesn't waste its sibling samples' budget on work that
//! will be thrown away anyway.

mod cache;
mod executor;
mod progress;
pub mod rubric;
mod sampling;

use crate::config::AgentConfig;
use crate::core::sample::C7Sample;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, Evidence, MetricValue};
use cache::{CachedResponse, ResponseCache};
pub use executor::{MockExecutor, ProcessExecutor, PromptExecutor};
use progress::ProbeProgress;
use rubric::Metric;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Extra time a metric's timeout grants beyond `samples * probe_timeout`,
/// covering cache lookups and scheduling jitter between sequential probes.
const METRIC_TIMEOUT_BUFFER_SECS: u64 = 10;

async fn run_one_probe(
    executor: Arc<dyn PromptExecutor>,
    cache: Arc<ResponseCache>,
    root: Arc<String>,
    allowed_tools: Arc<Vec<String>>,
    path: PathBuf,
    metric: Metric,
) -> C7Sample {
    let started = Instant::now();
    let content = std::fs::read(&path).unwrap_or_default();
    let source = String::from_utf8_lossy(&content).into_owned();
    let file_path_display = path.display().to_string();
    let prompt = metric.prompt(&file_path_display, &source);

    if let Some(cached) = cache.get(&content, metric) {
        return C7Sample {
            metric: metric.key().to_string(),
            file_path: path,
            description: metric.label().to_string(),
            prompt,
            response: cached.response,
            score: cached.score,
            duration_secs: started.elapsed().as_secs_f64(),
            error: None,
        };
    }

    match executor.execute_prompt(&root, &prompt, &allowed_tools).await {
        Ok(response) => {
            let score = rubric::score_response(metric, &response);
            let _ = cache.put(
                &content,
                metric,
                &CachedResponse {
                    response: response.clone(),
                    score,
                },
            );
            C7Sample {
                metric: metric.key().to_string(),
                file_path: path,
                description: metric.label().to_string(),
                prompt,
                response,
                score,
                duration_secs: started.elapsed().as_secs_f64(),
                error: None,
            }
        }
        Err(err) => C7Sample {
            metric: metric.key().to_string(),
            file_path: path,
            description: metric.label().to_string(),
            prompt,
            response: String::new(),
            score: 1,
            duration_secs: started.elapsed().as_secs_f64(),
            error: Some(err.to_string()),
        },
    }
}

/// Run one metric's samples sequentially, stopping early if a sibling
/// metric (or an earlier sample of this one) hit a fatal agent error.
///
/// "Fatal" here means the executor itself failed — binary crashed, timed
/// out, exited non-zero — not a low-quality response, which still scores
/// normally via the rubric.
async fn run_metric(
    executor: Arc<dyn PromptExecutor>,
    cache: Arc<ResponseCache>,
    root: Arc<String>,
    allowed_tools: Arc<Vec<String>>,
    semaphore: Arc<Semaphore>,
    progress: Arc<ProbeProgress>,
    cancelled: Arc<AtomicBool>,
    metric: Metric,
    paths: Vec<PathBuf>,
) -> Vec<C7Sample> {
    let mut samples = Vec::with_capacity(paths.len());
    for path in paths {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        let Ok(_permit) = semaphore.acquire().await else {
            break;
        };
        let sample = run_one_probe(
            Arc::clone(&executor),
            Arc::clone(&cache),
            Arc::clone(&root),
            Arc::clone(&allowed_tools),
            path,
            metric,
        )
        .await;
        progress.tick(metric.key());
        if sample.error.is_some() {
            cancelled.store(true, Ordering::SeqCst);
        }
        samples.push(sample);
    }
    samples
}

fn aggregate(metric: Metric, samples: &[C7Sample]) -> MetricValue {
    let successful: Vec<&C7Sample> = samples.iter().filter(|s| s.error.is_none()).collect();
    if successful.is_empty() {
        return MetricValue::unavailable();
    }

    let score = if metric == Metric::Consistency {
        let responses: Vec<String> = successful.iter().map(|s| s.response.clone()).collect();
        rubric::score_consistency(&responses) as f64
    } else {
        successful.iter().map(|s| s.score as f64).sum::<f64>() / successful.len() as f64
    };

    let evidence = successful
        .first()
        .map(|s| vec![Evidence::file(s.file_path.clone())])
        .unwrap_or_default();
    MetricValue::available(score).with_evidence(evidence)
}

/// Run the full C7 probe sweep and fold it into an `AnalysisResult`, using
/// the real [`ProcessExecutor`] against `config.command`.
///
/// Returns every metric `unavailable` without spawning a single subprocess
/// when C7 is disabled or the configured agent binary can't be found —
/// callers don't need to branch on `config.enabled` themselves.
pub async fn evaluate(root: &Path, targets: &[AnalysisTarget], config: &AgentConfig) -> AnalysisResult {
    let executor = ProcessExecutor::new(config.command.clone(), Duration::from_secs(config.probe_timeout_secs));
    evaluate_with(Arc::new(executor), root, targets, config).await
}

/// Same as [`evaluate`] but takes the executor as a parameter, so tests can
/// pass a [`MockExecutor`] instead of spawning a real agent binary.
pub async fn evaluate_with(
    executor: Arc<dyn PromptExecutor>,
    root: &Path,
    targets: &[AnalysisTarget],
    config: &AgentConfig,
) -> AnalysisResult {
    let metric_names: Vec<&str> = Metric::ALL.iter().map(|m| m.key()).collect();

    if !config.enabled {
        return AnalysisResult::unavailable(CategoryId::C7, &metric_names, None);
    }

    if let Err(err) = executor.check_available() {
        return AnalysisResult::unavailable(CategoryId::C7, &metric_names, Some(err.to_string()));
    }

    let cache = Arc::new(ResponseCache::new(root.join(&config.cache_dir)));
    let root_display = Arc::new(root.display().to_string());
    let allowed_tools = Arc::new(config.allowed_tools.clone());
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
    let cancelled = Arc::new(AtomicBool::new(false));

    let plans: Vec<(Metric, Vec<PathBuf>)> = Metric::ALL
        .iter()
        .map(|&metric| (metric, sampling::select_targets(metric, targets, config.k_samples)))
        .collect();

    if plans.iter().all(|(_, paths)| paths.is_empty()) {
        return AnalysisResult::unavailable(
            CategoryId::C7,
            &metric_names,
            Some("no eligible files to probe".to_string()),
        );
    }

    let progress = Arc::new(ProbeProgress::new(
        plans.iter().map(|(metric, paths)| (metric.key(), paths.len())).collect(),
    ));

    let mut join_set = tokio::task::JoinSet::new();
    for (metric, paths) in plans {
        let executor = Arc::clone(&executor);
        let cache = Arc::clone(&cache);
        let root_display = Arc::clone(&root_display);
        let allowed_tools = Arc::clone(&allowed_tools);
        let semaphore = Arc::clone(&semaphore);
        let progress = Arc::clone(&progress);
        let cancelled = Arc::clone(&cancelled);
        let sample_count = paths.len().max(1) as u64;
        let metric_timeout = Duration::from_secs(sample_count * config.probe_timeout_secs + METRIC_TIMEOUT_BUFFER_SECS);

        join_set.spawn(async move {
            let samples = tokio::time::timeout(
                metric_timeout,
                run_metric(
                    executor,
                    cache,
                    root_display,
                    allowed_tools,
                    semaphore,
                    progress,
                    cancelled,
                    metric,
                    paths,
                ),
            )
            .await
            .unwrap_or_default();
            (metric, samples)
        });
    }

    let mut all_samples: Vec<C7Sample> = Vec::new();
    let mut by_metric: std::collections::BTreeMap<&'static str, Vec<C7Sample>> = std::collections::BTreeMap::new();
    while let Some(joined) = join_set.join_next().await {
        if let Ok((metric, samples)) = joined {
            all_samples.extend(samples.iter().cloned());
            by_metric.insert(metric.key(), samples);
        }
    }

    let mut result = AnalysisResult::new(CategoryId::C7);
    for metric in Metric::ALL {
        let samples = by_metric.get(metric.key()).cloned().unwrap_or_default();
        result.insert(metric.key(), aggregate(metric, &samples));
    }

    if config.debug {
        all_samples.sort_by(|a, b| (&a.metric, &a.file_path).cmp(&(&b.metric, &b.file_path)));
        result.debug_samples = Some(all_samples);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetPayload;

    #[tokio::test]
    async fn disabled_config_returns_unavailable_without_spawning() {
        let config = AgentConfig {
            enabled: false,
            ..AgentConfig::default()
        };
        let result = evaluate(Path::new("."), &[], &config).await;
        assert_eq!(result.category, CategoryId::C7);
        assert!(result.metrics.values().all(|m| !m.available));
    }

    #[tokio::test]
    async fn missing_binary_returns_unavailable_with_error() {
        let config = AgentConfig {
            enabled: true,
            command: vec!["ars-nonexistent-binary".to_string()],
            ..AgentConfig::default()
        };
        let target = AnalysisTarget::new(
            crate::core::Language::Rust,
            ".".into(),
            vec![PathBuf::from("src/lib.rs")],
            TargetPayload::Unparsed,
        );
        let result = evaluate(Path::new("."), &[target], &config).await;
        assert!(result.error.is_some());
        assert!(result.metrics.values().all(|m| !m.available));
    }

    #[test]
    fn aggregate_consistency_uses_jaccard_not_mean() {
        let samples = vec![
            C7Sample {
                metric: Metric::Consistency.key().to_string(),
                file_path: PathBuf::from("a.rs"),
                description: "consistency".to_string(),
                prompt: String::new(),
                response: "this file parses rust source".to_string(),
                score: 9,
                duration_secs: 0.1,
                error: None,
            },
            C7Sample {
                metric: Metric::Consistency.key().to_string(),
                file_path: PathBuf::from("a.rs"),
                description: "consistency".to_string(),
                prompt: String::new(),
                response: "this file parses rust source".to_string(),
                score: 9,
                duration_secs: 0.1,
                error: None,
            },
        ];
        let value = aggregate(Metric::Consistency, &samples);
        assert_eq!(value.raw, Some(10.0));
    }

    #[test]
    fn aggregate_with_no_successful_samples_is_unavailable() {
        let samples = vec![C7Sample {
            metric: Metric::Comprehension.key().to_string(),
            file_path: PathBuf::from("a.rs"),
            description: "comprehension".to_string(),
            prompt: String::new(),
            response: String::new(),
            score: 1,
            duration_secs: 0.1,
            error: Some("boom".to_string()),
        }];
        let value = aggregate(Metric::Comprehension, &samples);
        assert!(!value.available);
    }
}
