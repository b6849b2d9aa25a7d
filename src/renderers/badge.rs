//! Compact one-line badge output (`--badge url|markdown|html`).
//!
//! A badge summarizes a run as a single shields.io-style URL with the
//! composite score and a tier-derived color, in one of three wrappers the
//! caller chose on the command line.

use crate::cli::BadgeFormat;
use crate::core::{ScoredResult, Tier};
use crate::errors::ArsResult;
use html_escape::encode_text;
use std::io::Write;

fn badge_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Ready => "brightgreen",
        Tier::Assisted => "blue",
        Tier::Limited => "yellow",
        Tier::Hostile => "red",
        Tier::Unavailable => "lightgrey",
    }
}

fn badge_label(scored: &ScoredResult) -> String {
    match scored.score {
        Some(s) => format!("{s:.1}%2F10"),
        None => "n%2Fa".to_string(),
    }
}

/// Build the bare shields.io URL for this result, with no wrapper.
fn badge_url(scored: &ScoredResult) -> String {
    format!(
        "https://img.shields.io/badge/agent--readiness-{}-{}",
        badge_label(scored),
        badge_color(scored.tier)
    )
}

/// Render `scored` as a badge in the requested wrapper format.
pub fn render(scored: &ScoredResult, format: BadgeFormat, writer: &mut impl Write) -> ArsResult<()> {
    let url = badge_url(scored);
    let rendered = match format {
        BadgeFormat::Url => url,
        BadgeFormat::Markdown => format!("![agent-readiness]({url})"),
        BadgeFormat::Html => format!(
            "<img src=\"{}\" alt=\"agent-readiness: {}\">",
            encode_text(&url),
            encode_text(scored.tier.label())
        ),
    };
    writeln!(writer, "{rendered}").map_err(|e| super::render_error("badge", e.to_string()))
}
