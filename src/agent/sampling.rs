//! Per-metric sample selection for the C7 probe sweep.
//!
//! Each [`Metric`] samples the repository differently: M1 repeats a single
//! file to check for drift, M2 chases complexity, M3 chases coupling, M4
//! chases identifier density, M5 chases undocumented public surface. All
//! five selectors are deterministic given the same target set — sorting by
//! path breaks ties — so a re-run probes the same files in the same order.

use super::rubric::Metric;
use crate::analyzers::{architecture, documentation, structure};
use crate::core::{AnalysisTarget, Language};
use std::collections::HashSet;
use std::path::PathBuf;

/// Files discovery found, excluding test modules and the pack's own
/// `examples/` directory — probes about "what is this file for" are
/// trivial on test code and uninteresting on vendored examples.
fn eligible_files(targets: &[AnalysisTarget]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = targets
        .iter()
        .flat_map(|t| t.files.iter().cloned())
        .filter(|p| {
            let s = p.to_string_lossy();
            !s.contains("test") && !s.contains("/examples/")
        })
        .collect();
    files.sort();
    files.dedup();
    files
}

fn rust_units(targets: &[AnalysisTarget]) -> Vec<(&PathBuf, &syn::File)> {
    targets
        .iter()
        .filter_map(|t| t.rust_units())
        .flatten()
        .map(|u| (&u.path, &u.ast))
        .collect()
}

/// M1 (consistency): a single, deterministically-chosen file, probed twice.
/// Picks the largest eligible file by line count — big enough that a
/// non-deterministic agent has room to drift between the two answers.
fn select_consistency(targets: &[AnalysisTarget]) -> Vec<PathBuf> {
    let files = eligible_files(targets);
    let chosen = files
        .into_iter()
        .max_by_key(|p| std::fs::read_to_string(p).map(|s| s.lines().count()).unwrap_or(0));
    chosen.into_iter().collect()
}

/// M2 (comprehension): the `k` Rust files containing the most complex
/// function, falling back to the largest eligible files when no Rust units
/// are available at all.
fn select_comprehension(targets: &[AnalysisTarget], k: usize) -> Vec<PathBuf> {
    let mut scored: Vec<(PathBuf, u32)> = rust_units(targets)
        .into_iter()
        .map(|(path, ast)| (path.clone(), structure::file_max_complexity(ast)))
        .collect();

    if scored.is_empty() {
        return fallback_by_size(targets, k);
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().take(k).map(|(path, _)| path).collect()
}

/// M3 (navigation): the `k` Rust files with the highest afferent coupling
/// (most other files importing them).
fn select_navigation(targets: &[AnalysisTarget], k: usize) -> Vec<PathBuf> {
    let rust_files: Vec<PathBuf> = targets
        .iter()
        .filter(|t| matches!(t.language, Language::Rust))
        .flat_map(|t| t.files.clone())
        .collect();

    if rust_files.is_empty() {
        return fallback_by_size(targets, k);
    }

    let coupling = architecture::afferent_coupling(&rust_files);
    let mut scored: Vec<(PathBuf, usize)> = rust_files
        .into_iter()
        .map(|path| {
            let count = coupling.get(&path).copied().unwrap_or(0);
            (path, count)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().take(k).map(|(path, _)| path).collect()
}

fn identifier_density(content: &str) -> f64 {
    let lines = content.lines().count().max(1);
    let identifiers: HashSet<&str> = content
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|tok| {
            !tok.is_empty()
                && tok.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
                && tok.len() > 1
        })
        .collect();
    identifiers.len() as f64 / lines as f64
}

/// M4 (identifiers): the `k` files (any language) with the most distinct
/// identifiers per line.
fn select_identifiers(targets: &[AnalysisTarget], k: usize) -> Vec<PathBuf> {
    let mut scored: Vec<(PathBuf, f64)> = eligible_files(targets)
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let density = identifier_density(&content);
            Some((path, density))
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().take(k).map(|(path, _)| path).collect()
}

/// M5 (documentation): the `k` Rust files with the highest fraction of
/// undocumented public items.
fn select_documentation(targets: &[AnalysisTarget], k: usize) -> Vec<PathBuf> {
    let mut scored: Vec<(PathBuf, f64)> = rust_units(targets)
        .into_iter()
        .filter_map(|(path, ast)| documentation::undocumented_public_ratio(ast).map(|ratio| (path.clone(), ratio)))
        .filter(|(_, ratio)| *ratio > 0.0)
        .collect();

    if scored.is_empty() {
        return fallback_by_size(targets, k);
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().take(k).map(|(path, _)| path).collect()
}

fn fallback_by_size(targets: &[AnalysisTarget], k: usize) -> Vec<PathBuf> {
    let mut files: Vec<(PathBuf, usize)> = eligible_files(targets)
        .into_iter()
        .map(|path| {
            let size = std::fs::metadata(&path).map(|m| m.len() as usize).unwrap_or(0);
            (path, size)
        })
        .collect();
    files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    files.into_iter().take(k).map(|(path, _)| path).collect()
}

/// Select the probe targets for `metric`. `configured_k` is the run's
/// default sample count; individual metrics (M1) may override it via
/// [`Metric::sample_count`].
pub fn select_targets(metric: Metric, targets: &[AnalysisTarget], configured_k: usize) -> Vec<PathBuf> {
    let k = metric.sample_count(configured_k);
    match metric {
        Metric::Consistency => {
            let file = select_consistency(targets);
            match file.first() {
                Some(path) => std::iter::repeat_n(path.clone(), k).collect(),
                None => Vec::new(),
            }
        }
        Metric::Comprehension => select_comprehension(targets, k),
        Metric::Navigation => select_navigation(targets, k),
        Metric::Identifiers => select_identifiers(targets, k),
        Metric::Documentation => select_documentation(targets, k),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::RustUnit;
    use crate::core::TargetPayload;

    fn target_from(path: &str, source: &str) -> AnalysisTarget {
        let ast = syn::parse_file(source).unwrap();
        let unit = RustUnit {
            path: PathBuf::from(path),
            source: source.to_string(),
            ast,
        };
        AnalysisTarget::new(Language::Rust, ".".into(), vec![PathBuf::from(path)], TargetPayload::Rust(vec![unit]))
    }

    #[test]
    fn consistency_selects_the_same_file_twice() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.rs");
        std::fs::write(&path, "fn main() {}\nfn helper() {}\n").unwrap();
        let target = AnalysisTarget::new(Language::Rust, tmp.path().into(), vec![path.clone()], TargetPayload::Unparsed);

        let selected = select_targets(Metric::Consistency, &[target], 3);
        assert_eq!(selected, vec![path.clone(), path]);
    }

    #[test]
    fn comprehension_prefers_the_more_complex_file() {
        let simple = target_from("simple.rs", "fn add(a: i32, b: i32) -> i32 { a + b }");
        let complex = target_from(
            "complex.rs",
            "fn classify(n: i32) -> &'static str {
                if n < 0 { \"neg\" } else if n == 0 { \"zero\" } else { \"pos\" }
            }",
        );
        let selected = select_targets(Metric::Comprehension, &[simple, complex], 1);
        assert_eq!(selected, vec![PathBuf::from("complex.rs")]);
    }

    #[test]
    fn documentation_prefers_files_with_undocumented_public_items() {
        let documented = target_from("documented.rs", "/// does a thing\npub fn a() {}\n");
        let undocumented = target_from("undocumented.rs", "pub fn b() {}\npub fn c() {}\n");
        let selected = select_targets(Metric::Documentation, &[documented, undocumented], 1);
        assert_eq!(selected, vec![PathBuf::from("undocumented.rs")]);
    }

    #[test]
    fn identifiers_selector_is_deterministic_on_ties() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.rs");
        let b = tmp.path().join("b.rs");
        std::fs::write(&a, "let alpha = 1;\n").unwrap();
        std::fs::write(&b, "let alpha = 1;\n").unwrap();
        let target = AnalysisTarget::new(
            Language::Rust,
            tmp.path().into(),
            vec![a.clone(), b.clone()],
            TargetPayload::Unparsed,
        );

        let first = select_targets(Metric::Identifiers, &[target.clone()], 2);
        let second = select_targets(Metric::Identifiers, &[target], 2);
        assert_eq!(first, second);
    }
}
