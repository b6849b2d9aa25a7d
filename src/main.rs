//! `ars` CLI entry point: panic hook, tracing, config resolution, the scan
//! itself, then dispatch to whichever renderer the flags selected.

use ars::cli::{BadgeFormat, Cli, Commands};
use ars::config::load_config;
use ars::core::ScoredResult;
use ars::observability::{install_panic_hook, init_tracing};
use ars::renderers::{badge, debug, html, json, terminal};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Deeply nested `syn` AST traversals on large files can overrun the
/// default ~1MB of main-thread stack; run the real work on a thread with
/// headroom instead.
const MAIN_STACK_SIZE: usize = 16 * 1024 * 1024;

fn main() -> ExitCode {
    install_panic_hook();
    init_tracing();

    match std::thread::Builder::new()
        .stack_size(MAIN_STACK_SIZE)
        .spawn(run)
        .expect("failed to spawn main worker thread")
        .join()
    {
        Ok(code) => code,
        Err(panic) => {
            let message = ars::observability::last_panic_info()
                .map(|info| info.to_string())
                .unwrap_or_else(|| extract_panic_message(&panic));
            eprintln!("ars: internal error: {message}");
            ExitCode::from(1)
        }
    }
}

fn extract_panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Scan {
        root,
        json: json_flag,
        threshold,
        enable_c7,
        debug_c7,
        config: config_path,
        baseline,
        badge: badge_format,
        html: html_flag,
        jobs,
        max_files,
        languages,
        output,
    } = cli.command;

    if [json_flag, badge_format.is_some(), html_flag].iter().filter(|b| **b).count() > 1 {
        eprintln!("ars: --json, --badge and --html are mutually exclusive");
        return ExitCode::from(1);
    }

    let mut config = match load_config(&root, config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ars: {e}");
            return ExitCode::from(1);
        }
    };

    if enable_c7 || debug_c7 {
        config.agent.enabled = true;
    }
    if debug_c7 {
        config.agent.debug = true;
    }
    if let Some(jobs) = jobs {
        config.jobs = Some(jobs);
    }
    if let Some(max_files) = max_files {
        config.discovery.max_files = max_files;
    }
    if let Some(languages) = languages {
        config.languages = Some(languages);
    }
    if let Some(threshold) = threshold {
        config.scoring.threshold = Some(threshold);
    }
    config.normalize();

    if let Err(e) = config.validate() {
        eprintln!("ars: invalid configuration: {e}");
        return ExitCode::from(1);
    }

    let baseline_result = match baseline.as_deref().map(load_baseline) {
        Some(Ok(result)) => Some(result),
        Some(Err(e)) => {
            eprintln!("ars: failed to load baseline: {e}");
            return ExitCode::from(1);
        }
        None => None,
    };

    let outcome = match ars::pipeline::run(&root, &config, baseline_result.as_ref()) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("ars: {e}");
            return ExitCode::from(1);
        }
    };
    let scored = outcome.scored;

    if config.agent.debug {
        let mut stderr = io::stderr();
        if let Err(e) = debug::render(&scored, &mut stderr) {
            eprintln!("ars: failed to render debug trace: {e}");
        }
    }

    let rendered = match render_report(&scored, json_flag, badge_format, html_flag) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("ars: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = write_report(&rendered, output.as_deref()) {
        eprintln!("ars: failed to write report: {e}");
        return ExitCode::from(1);
    }

    exit_code_for(&scored, config.scoring.threshold)
}

fn render_report(
    scored: &ScoredResult,
    json_flag: bool,
    badge_format: Option<BadgeFormat>,
    html_flag: bool,
) -> Result<Vec<u8>, ars::errors::ArsError> {
    let mut buf = Vec::new();
    if json_flag {
        json::render(scored, &mut buf)?;
    } else if let Some(format) = badge_format {
        badge::render(scored, format, &mut buf)?;
    } else if html_flag {
        html::render(scored, &mut buf)?;
    } else {
        terminal::render(scored, &mut buf)?;
    }
    Ok(buf)
}

fn write_report(bytes: &[u8], output: Option<&Path>) -> io::Result<()> {
    match output {
        Some(path) => fs::write(path, bytes),
        None => io::stdout().write_all(bytes),
    }
}

fn load_baseline(path: &Path) -> Result<ScoredResult, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// 0 on success (no threshold configured, or the rounded composite meets
/// it), 2 when a threshold was configured and the rounded composite falls
/// below it, or there is no composite at all (a threshold can never be met
/// by a score that doesn't exist). The comparison uses the rounded,
/// one-decimal score — the same number the terminal and JSON renderers show
/// — so a displayed "8.0" never silently fails a `threshold: 8.0` gate.
fn exit_code_for(scored: &ScoredResult, threshold: Option<f64>) -> ExitCode {
    match (scored.score, threshold) {
        (Some(score), Some(threshold)) if score < threshold => ExitCode::from(2),
        (None, Some(_)) => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    }
}
