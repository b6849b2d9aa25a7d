//! Stage 6: present a [`ScoredResult`] to the user.
//!
//! Every renderer here is read-only over the scored data: none of them
//! re-scores, re-ranks, or mutates a sub-score, a recommendation, or a C7
//! sample. They differ only in how they present the same numbers — the
//! JSON renderer is the stable, versioned wire format; terminal and HTML
//! are human presentations of it; badge is a compact one-line summary.
//!
//! Every renderer writes to the *result channel* the caller hands it
//! (normally stdout, or a `--output <path>` file) and never to the
//! diagnostic channel (stderr) — that separation is what keeps `--json`
//! pipeable into another tool even while `RUST_LOG` is noisy.

pub mod badge;
pub mod debug;
pub mod html;
pub mod json;
pub mod terminal;

use crate::core::{CategoryId, ScoredResult};
use crate::errors::ArsError;

/// Truncate a C7 sample's rendered text for terminal/HTML presentation.
/// JSON keeps the full verbatim text — this bound only applies to
/// human-facing renderers.
pub const TERMINAL_SAMPLE_TRUNCATE: usize = 280;

pub(crate) fn truncate_for_terminal(s: &str) -> String {
    if s.chars().count() <= TERMINAL_SAMPLE_TRUNCATE {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(TERMINAL_SAMPLE_TRUNCATE).collect();
    truncated.push('…');
    truncated
}

pub(crate) fn category_by_id(scored: &ScoredResult, id: CategoryId) -> Option<&crate::core::CategoryScore> {
    scored.categories.iter().find(|c| c.category == id)
}

pub(crate) fn render_error(format: &str, message: impl Into<String>) -> ArsError {
    ArsError::Render {
        format: format.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_for_terminal("hello"), "hello");
    }

    #[test]
    fn long_text_is_truncated_with_an_ellipsis() {
        let long = "x".repeat(300);
        let truncated = truncate_for_terminal(&long);
        assert_eq!(truncated.chars().count(), TERMINAL_SAMPLE_TRUNCATE + 1);
        assert!(truncated.ends_with('…'));
    }
}
