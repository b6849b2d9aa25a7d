//! Human-readable terminal report.
//!
//! Renders the same `ScoredResult` the JSON renderer serializes, laid out
//! as a composite summary, a per-category table, and a ranked
//! recommendation list. Color is applied via `colored`; it degrades
//! gracefully when stdout isn't a TTY since `colored` checks that itself.

use super::truncate_for_terminal;
use crate::core::{CategoryScore, EffortLabel, ScoredResult, Tier};
use crate::errors::ArsResult;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use std::io::Write;

fn tier_color(tier: Tier) -> colored::Color {
    match tier {
        Tier::Ready => colored::Color::Green,
        Tier::Assisted => colored::Color::Cyan,
        Tier::Limited => colored::Color::Yellow,
        Tier::Hostile => colored::Color::Red,
        Tier::Unavailable => colored::Color::BrightBlack,
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{s:.1}"),
        None => "n/a".to_string(),
    }
}

fn category_table(categories: &[CategoryScore]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Category", "Weight", "Score", "Metrics"]);

    for category in categories {
        let available = category.sub_scores.iter().filter(|s| s.available).count();
        let total = category.sub_scores.len();
        table.add_row(vec![
            Cell::new(&category.name),
            Cell::new(format!("{:.0}%", category.weight * 100.0)),
            Cell::new(format_score(category.score)),
            Cell::new(format!("{available}/{total}")),
        ]);
    }
    table
}

fn effort_label(effort: EffortLabel) -> &'static str {
    match effort {
        EffortLabel::Small => "small",
        EffortLabel::Medium => "medium",
        EffortLabel::Large => "large",
    }
}

fn print_summary(scored: &ScoredResult, writer: &mut impl Write) -> std::io::Result<()> {
    let composite = format_score(scored.score);
    let tier_label = scored.tier.label();
    writeln!(writer, "{}", "Agent-Readiness Score".bold())?;
    writeln!(
        writer,
        "  Composite: {} / 10   Tier: {}",
        composite.bold(),
        tier_label.color(tier_color(scored.tier)).bold()
    )?;
    if scored.unavailable_category_count > 0 {
        writeln!(
            writer,
            "  {} {} of {} categories were unavailable and excluded from the composite.",
            "note:".yellow(),
            scored.unavailable_category_count,
            crate::core::CategoryId::ALL.len()
        )?;
    }
    writeln!(writer)
}

fn print_categories(scored: &ScoredResult, writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "{}", category_table(&scored.categories))?;
    writeln!(writer)
}

fn print_recommendations(scored: &ScoredResult, writer: &mut impl Write) -> std::io::Result<()> {
    if scored.recommendations.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{}", "Top Recommendations".bold())?;
    for (i, rec) in scored.recommendations.iter().enumerate() {
        writeln!(
            writer,
            "  {}. [{}] {} (+{:.2} est., {} effort)",
            i + 1,
            rec.category.config_key(),
            rec.action,
            rec.estimated_delta,
            effort_label(rec.effort)
        )?;
    }
    writeln!(writer)
}

fn print_baseline_deltas(scored: &ScoredResult, writer: &mut impl Write) -> std::io::Result<()> {
    let Some(deltas) = &scored.baseline_deltas else {
        return Ok(());
    };
    writeln!(writer, "{}", "Baseline Deltas".bold())?;
    for delta in deltas {
        let sign = if delta.delta >= 0.0 { "+" } else { "" };
        writeln!(writer, "  {}: {sign}{:.2}", delta.category.config_key(), delta.delta)?;
    }
    writeln!(writer)
}

/// Render the full terminal report: summary, per-category table,
/// recommendations, and baseline deltas when present.
///
/// This always writes to the result channel the caller hands it. C7 debug
/// traces never go here even when `--debug-c7` is set — they're the
/// diagnostic channel's job (see [`super::debug`]), so a terminal report
/// redirected to a file never silently picks up prompt/response text that
/// belongs on stderr.
pub fn render(scored: &ScoredResult, writer: &mut impl Write) -> ArsResult<()> {
    (|| -> std::io::Result<()> {
        print_summary(scored, writer)?;
        print_categories(scored, writer)?;
        print_recommendations(scored, writer)?;
        print_baseline_deltas(scored, writer)?;
        Ok(())
    })()
    .map_err(|e| super::render_error("terminal", e.to_string()))
}

/// One truncated line of a C7 sample, used by both the terminal report
/// (when `--debug-c7` is set) and tests that want a stable human summary.
pub(crate) fn format_sample_line(sample: &crate::core::C7Sample) -> String {
    format!(
        "    [{}] {} — score {} ({:.1}s)\n      prompt:   {}\n      response: {}",
        sample.metric,
        sample.file_path.display(),
        sample.score,
        sample.duration_secs,
        truncate_for_terminal(&sample.prompt),
        truncate_for_terminal(&sample.response)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategoryId, RunMetadata};
    use std::path::PathBuf;

    fn sample_result() -> ScoredResult {
        ScoredResult {
            version: 1,
            score: Some(6.4),
            score_unrounded: Some(6.41),
            tier: Tier::Assisted,
            categories: vec![CategoryScore {
                category: CategoryId::C1,
                name: "Structure & Complexity".to_string(),
                weight: 1.0,
                score: Some(6.4),
                sub_scores: Vec::new(),
                debug_samples: None,
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
    fn renders_without_error() {
        let scored = sample_result();
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("6.4"));
        assert!(text.contains("Structure & Complexity"));
    }

    #[test]
    fn unavailable_category_count_surfaces_a_note() {
        let mut scored = sample_result();
        scored.unavailable_category_count = 2;
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("2 of 7 categories"));
    }
}
