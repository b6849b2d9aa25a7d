//! C7 debug trace output — the diagnostic channel's view of `--debug-c7`.
//!
//! Invariant (spec §4.5.5): debug traces are written **only** to the
//! diagnostic channel, never the result channel, so `--json --debug-c7`
//! piped into another tool stays parseable. The one decided exception
//! (see DESIGN.md) is the JSON body itself: when both `--json` and
//! `--debug-c7` are set, `categories.C7.debug_samples` carries the full,
//! untruncated prompt/response text as part of the JSON on stdout — that's
//! `renderers::json`'s job, not this module's. This module always writes
//! to the writer it's given (callers pass stderr) and always truncates,
//! matching the terminal report's presentation regardless of `--json`.
//!
//! In a non-TTY environment this must be plain line-oriented text: no ANSI
//! escapes, no carriage-return redraws. Unlike [`super::terminal`], this
//! renderer never checks `is_terminal()` — a debug trace is for logs and
//! piping, not an interactive display.

use super::truncate_for_terminal;
use crate::core::{CategoryId, ScoredResult};
use crate::errors::ArsResult;
use std::io::Write;

/// Write every C7 sample's (truncated) prompt, response, score and
/// duration as plain lines. A no-op when the run has no debug samples
/// attached (C7 was disabled, or `--debug-c7` wasn't set).
pub fn render(scored: &ScoredResult, writer: &mut impl Write) -> ArsResult<()> {
    let Some(c7) = super::category_by_id(scored, CategoryId::C7) else {
        return Ok(());
    };
    let Some(samples) = &c7.debug_samples else {
        return Ok(());
    };
    if samples.is_empty() {
        return Ok(());
    }

    (|| -> std::io::Result<()> {
        writeln!(writer, "--- C7 debug trace ({} samples) ---", samples.len())?;
        for sample in samples {
            writeln!(writer, "[{}] {}", sample.metric, sample.file_path.display())?;
            writeln!(writer, "  prompt:   {}", truncate_for_terminal(&sample.prompt))?;
            writeln!(writer, "  response: {}", truncate_for_terminal(&sample.response))?;
            writeln!(writer, "  score: {}  duration: {:.2}s", sample.score, sample.duration_secs)?;
            if let Some(err) = &sample.error {
                writeln!(writer, "  error: {err}")?;
            }
        }
        Ok(())
    })()
    .map_err(|e| super::render_error("debug", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{C7Sample, CategoryScore, RunMetadata, Tier};
    use std::path::PathBuf;

    fn scored_with_samples(samples: Vec<C7Sample>) -> ScoredResult {
        ScoredResult {
            version: 1,
            score: Some(5.0),
            score_unrounded: Some(5.0),
            tier: Tier::Limited,
            categories: vec![CategoryScore {
                category: CategoryId::C7,
                name: "Agent Evaluation".to_string(),
                weight: 1.0,
                score: Some(5.0),
                sub_scores: Vec::new(),
                debug_samples: Some(samples),
            }],
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
    fn no_debug_samples_produces_no_output() {
        let scored = scored_with_samples(Vec::new());
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn renders_plain_lines_with_no_ansi_escapes() {
        let samples = vec![C7Sample {
            metric: "m2_comprehension".to_string(),
            file_path: PathBuf::from("src/lib.rs"),
            description: "comprehension".to_string(),
            prompt: "explain this file".to_string(),
            response: "this file implements the pipeline".to_string(),
            score: 8,
            duration_secs: 1.23,
            error: None,
        }];
        let scored = scored_with_samples(samples);
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("m2_comprehension"));
        assert!(text.contains("score: 8"));
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn long_response_is_truncated() {
        let samples = vec![C7Sample {
            metric: "m1_consistency".to_string(),
            file_path: PathBuf::from("a.rs"),
            description: "consistency".to_string(),
            prompt: "x".repeat(500),
            response: "y".repeat(500),
            score: 5,
            duration_secs: 0.5,
            error: None,
        }];
        let scored = scored_with_samples(samples);
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('…'));
        assert!(!text.contains(&"y".repeat(500)));
    }
}
