//! Command-line surface: argument parsing only. Dispatch lives in `main.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ars")]
#[command(about = "Agent-Readiness Scoring: predicts how well an autonomous coding agent will do in a repository", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BadgeFormat {
    Url,
    Markdown,
    Html,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a repository and produce an agent-readiness score
    Scan {
        /// Path to the repository root
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Write the scored result as JSON to the result channel instead
        /// of a human-readable report; suppresses terminal rendering
        #[arg(long)]
        json: bool,

        /// Exit with code 2 if the composite score falls below this
        /// threshold (compared against the rounded, one-decimal score)
        #[arg(long)]
        threshold: Option<f64>,

        /// Run the C7 agent-evaluation subsystem (off by default: it
        /// shells out to a real agent binary and is the slowest stage)
        #[arg(long)]
        enable_c7: bool,

        /// Retain and render full C7 prompt/response traces; implies
        /// `--enable-c7`
        #[arg(long)]
        debug_c7: bool,

        /// Load project configuration from this path instead of
        /// discovering `.arsrc.yml` by walking up from `root`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Load a prior JSON result and report per-category deltas
        /// against it
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Emit a badge (URL, Markdown, or HTML snippet) instead of the
        /// full report; mutually exclusive with `--json` on stdout
        #[arg(long, value_enum)]
        badge: Option<BadgeFormat>,

        /// Render the report as escaped HTML instead of the terminal
        /// report; mutually exclusive with `--json` and `--badge`
        #[arg(long)]
        html: bool,

        /// Analyzer worker threads; defaults to the number of available cores
        #[arg(long)]
        jobs: Option<usize>,

        /// Hard cap on files discovered before the walk is truncated
        #[arg(long)]
        max_files: Option<usize>,

        /// Restrict analysis to this comma-separated list of languages
        #[arg(long, value_delimiter = ',')]
        languages: Option<Vec<String>>,

        /// Write the rendered report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
