//! The stable, versioned JSON result format.
//!
//! `ScoredResult` and friends already derive `Serialize` with "omit when
//! empty" field attributes (see `core::score`), so rendering is just
//! `serde_json::to_writer_pretty` plus the crate's own error taxonomy on
//! failure — this module adds no shape of its own.

use super::render_error;
use crate::core::ScoredResult;
use crate::errors::ArsResult;
use std::io::Write;

/// Serialize `scored` to pretty-printed JSON and write it to `writer`
/// (normally stdout or a `--output` file — the result channel, never the
/// diagnostic one).
pub fn render(scored: &ScoredResult, writer: &mut impl Write) -> ArsResult<()> {
    serde_json::to_writer_pretty(&mut *writer, scored).map_err(|e| render_error("json", e.to_string()))?;
    writeln!(writer).map_err(|e| render_error("json", e.to_string()))?;
    Ok(())
}

/// Render to an owned `String`, for callers (tests, `--baseline` round
/// trips) that don't need a writer.
pub fn render_to_string(scored: &ScoredResult) -> ArsResult<String> {
    serde_json::to_string_pretty(scored).map_err(|e| render_error("json", e.to_string()))
}
