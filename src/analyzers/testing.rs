//! C3: testing — ratio of test functions to total functions.

use super::Analyzer;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, MetricValue};
use syn::visit::{self, Visit};
use syn::{ImplItemFn, ItemFn};

pub struct TestingAnalyzer;

fn has_test_attribute(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("test"))
}

#[derive(Default)]
struct TestCounter {
    total: u32,
    tested: u32,
}

impl<'ast> Visit<'ast> for TestCounter {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.total += 1;
        if has_test_attribute(&node.attrs) {
            self.tested += 1;
        }
        visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.total += 1;
        if has_test_attribute(&node.attrs) {
            self.tested += 1;
        }
        visit::visit_impl_item_fn(self, node);
    }
}

impl Analyzer for TestingAnalyzer {
    fn category(&self) -> CategoryId {
        CategoryId::C3
    }

    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult {
        let Some(units) = targets.iter().find_map(|t| t.rust_units()) else {
            return AnalysisResult::unavailable(
                CategoryId::C3,
                &["test_function_ratio"],
                Some("no Rust units available to analyze".to_string()),
            );
        };

        let mut counter = TestCounter::default();
        for unit in units {
            counter.visit_file(&unit.ast);
        }

        let mut result = AnalysisResult::new(CategoryId::C3);
        if counter.total == 0 {
            return AnalysisResult::unavailable(
                CategoryId::C3,
                &["test_function_ratio"],
                Some("no functions found".to_string()),
            );
        }

        let ratio = counter.tested as f64 / counter.total as f64;
        result.insert("test_function_ratio", MetricValue::available(ratio));
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
    fn counts_test_attributed_functions() {
        let target = target_from_source(
            "fn production() {}\n#[test]\nfn it_works() { assert!(true); }\n",
        );
        let result = TestingAnalyzer.analyze(&[target]);
        assert_eq!(result.metrics["test_function_ratio"].raw, Some(0.5));
    }

    #[test]
    fn no_functions_is_unavailable() {
        let target = target_from_source("struct Empty;");
        let result = TestingAnalyzer.analyze(&[target]);
        assert!(!result.metrics["test_function_ratio"].available);
    }
}
