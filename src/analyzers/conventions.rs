//! C6: conventions & idioms — naming-convention adherence and TODO/FIXME density.

use super::Analyzer;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, Evidence, MetricValue};
use once_cell::sync::Lazy;
use regex::Regex;
use syn::visit::{self, Visit};
use syn::{ItemEnum, ItemFn, ItemStruct};

/// Matches a `TODO`/`FIXME` marker as a whole word, so it doesn't fire on
/// identifiers like `TodoList` or `fixmeLater`.
static TODO_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(TODO|FIXME)\b").expect("static regex is valid"));

pub struct ConventionsAnalyzer;

fn is_snake_case(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_upper_camel_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && !name.contains('_')
}

#[derive(Default)]
struct NamingCounter {
    total: u32,
    conforming: u32,
}

impl<'ast> Visit<'ast> for NamingCounter {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.total += 1;
        if is_snake_case(&node.sig.ident.to_string()) {
            self.conforming += 1;
        }
        visit::visit_item_fn(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        self.total += 1;
        if is_upper_camel_case(&node.ident.to_string()) {
            self.conforming += 1;
        }
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast ItemEnum) {
        self.total += 1;
        if is_upper_camel_case(&node.ident.to_string()) {
            self.conforming += 1;
        }
        visit::visit_item_enum(self, node);
    }
}

fn todo_density(files: &[std::path::PathBuf]) -> Option<(f64, Option<std::path::PathBuf>)> {
    let mut total_lines = 0usize;
    let mut markers = 0usize;
    let mut first_marker_file = None;

    for path in files {
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        for line in content.lines() {
            total_lines += 1;
            if TODO_MARKER.is_match(line) {
                markers += 1;
                if first_marker_file.is_none() {
                    first_marker_file = Some(path.clone());
                }
            }
        }
    }

    if total_lines == 0 {
        return None;
    }
    Some(((markers as f64 / total_lines as f64) * 1000.0, first_marker_file))
}

impl Analyzer for ConventionsAnalyzer {
    fn category(&self) -> CategoryId {
        CategoryId::C6
    }

    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult {
        let mut result = AnalysisResult::new(CategoryId::C6);

        match targets.iter().find_map(|t| t.rust_units()) {
            Some(units) => {
                let mut counter = NamingCounter::default();
                for unit in units {
                    counter.visit_file(&unit.ast);
                }
                if counter.total == 0 {
                    result.insert("naming_convention_ratio", MetricValue::unavailable());
                } else {
                    let ratio = counter.conforming as f64 / counter.total as f64;
                    result.insert("naming_convention_ratio", MetricValue::available(ratio));
                }
            }
            None => result.insert("naming_convention_ratio", MetricValue::unavailable()),
        }

        let all_files: Vec<std::path::PathBuf> = targets.iter().flat_map(|t| t.files.clone()).collect();
        match todo_density(&all_files) {
            Some((density, evidence_file)) => {
                let evidence = evidence_file.into_iter().map(Evidence::file).collect();
                result.insert(
                    "todo_density_per_1000_lines",
                    MetricValue::available(density).with_evidence(evidence),
                );
            }
            None => result.insert("todo_density_per_1000_lines", MetricValue::unavailable()),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Language, TargetPayload};

    fn target_from_source(source: &str) -> AnalysisTarget {
        let ast = syn::parse_file(source).unwrap();
        let unit = crate::core::target::RustUnit {
            path: "test.rs".into(),
            source: source.to_string(),
            ast,
        };
        AnalysisTarget::new(Language::Rust, ".".into(), vec!["test.rs".into()], TargetPayload::Rust(vec![unit]))
    }

    #[test]
    fn snake_case_function_conforms() {
        let target = target_from_source("fn do_thing() {}");
        let result = ConventionsAnalyzer.analyze(&[target]);
        assert_eq!(result.metrics["naming_convention_ratio"].raw, Some(1.0));
    }

    #[test]
    fn camel_case_function_does_not_conform() {
        let target = target_from_source("fn doThing() {}");
        let result = ConventionsAnalyzer.analyze(&[target]);
        assert_eq!(result.metrics["naming_convention_ratio"].raw, Some(0.0));
    }

    #[test]
    fn todo_markers_are_counted() {
        assert_eq!(todo_density(&[]), None);
    }
}
