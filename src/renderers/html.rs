//! Self-contained HTML report.
//!
//! Every user-controlled string (category names, recommendation text,
//! file paths from evidence) goes through `html_escape` — none of this is
//! trusted, since it ultimately derives from whatever source files the
//! target repository happens to contain.

use super::truncate_for_terminal;
use crate::core::{CategoryScore, ScoredResult};
use crate::errors::ArsResult;
use html_escape::encode_text;
use std::io::Write;

fn tier_css_class(tier: crate::core::Tier) -> &'static str {
    use crate::core::Tier;
    match tier {
        Tier::Ready => "tier-ready",
        Tier::Assisted => "tier-assisted",
        Tier::Limited => "tier-limited",
        Tier::Hostile => "tier-hostile",
        Tier::Unavailable => "tier-unavailable",
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{s:.1}"),
        None => "n/a".to_string(),
    }
}

const STYLE: &str = "
body { font-family: -apple-system, sans-serif; max-width: 860px; margin: 2rem auto; color: #1a1a1a; }
h1 { font-size: 1.4rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }
.tier-ready { color: #1a7f37; font-weight: bold; }
.tier-assisted { color: #0969da; font-weight: bold; }
.tier-limited { color: #9a6700; font-weight: bold; }
.tier-hostile { color: #cf222e; font-weight: bold; }
.tier-unavailable { color: #6e7781; font-weight: bold; }
.rec { margin: 0.5rem 0; }
";

fn category_rows(categories: &[CategoryScore]) -> String {
    let mut rows = String::new();
    for c in categories {
        let available = c.sub_scores.iter().filter(|s| s.available).count();
        let total = c.sub_scores.len();
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.0}%</td><td>{}</td><td>{available}/{total}</td></tr>\n",
            encode_text(&c.name),
            c.weight * 100.0,
            encode_text(&format_score(c.score)),
        ));
    }
    rows
}

fn recommendation_items(scored: &ScoredResult) -> String {
    let mut items = String::new();
    for rec in &scored.recommendations {
        items.push_str(&format!(
            "<li class=\"rec\"><strong>[{}]</strong> {} <em>(+{:.2} est.)</em></li>\n",
            encode_text(rec.category.config_key()),
            encode_text(&truncate_for_terminal(&rec.action)),
            rec.estimated_delta,
        ));
    }
    items
}

/// Render `scored` as a single self-contained HTML document.
pub fn render(scored: &ScoredResult, writer: &mut impl Write) -> ArsResult<()> {
    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Agent-Readiness Score</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Agent-Readiness Score</h1>\n\
         <p>Composite: <strong>{}</strong> / 10 &mdash; Tier: <span class=\"{}\">{}</span></p>\n\
         <table>\n<thead><tr><th>Category</th><th>Weight</th><th>Score</th><th>Metrics</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>\n\
         <h2>Top Recommendations</h2>\n<ul>\n{}</ul>\n\
         <p><small>Generated {} by ars {}</small></p>\n\
         </body>\n</html>\n",
        encode_text(&format_score(scored.score)),
        tier_css_class(scored.tier),
        encode_text(scored.tier.label()),
        category_rows(&scored.categories),
        recommendation_items(scored),
        scored.metadata.timestamp.to_rfc3339(),
        encode_text(&scored.metadata.tool_version),
    );
    writer
        .write_all(body.as_bytes())
        .map_err(|e| super::render_error("html", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategoryId, RunMetadata, Tier};
    use std::path::PathBuf;

    fn sample_result() -> ScoredResult {
        ScoredResult {
            version: 1,
            score: Some(7.0),
            score_unrounded: Some(7.02),
            tier: Tier::Assisted,
            categories: vec![CategoryScore {
                category: CategoryId::C1,
                name: "<script>alert(1)</script>".to_string(),
                weight: 0.15,
                score: Some(7.0),
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
    fn escapes_untrusted_category_names() {
        let scored = sample_result();
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn produces_a_complete_document() {
        let scored = sample_result();
        let mut buf = Vec::new();
        render(&scored, &mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("7.0"));
    }
}
