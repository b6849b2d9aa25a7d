//! C5: documentation — doc-comment coverage of public items.

use super::Analyzer;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, Evidence, MetricValue};
use syn::visit::{self, Visit};
use syn::{ItemEnum, ItemFn, ItemStruct, ItemTrait, Visibility};

pub struct DocumentationAnalyzer;

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn has_doc_comment(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("doc"))
}

#[derive(Default)]
struct DocCounter {
    public_items: u32,
    documented: u32,
    undocumented_example: Option<String>,
}

impl DocCounter {
    fn record(&mut self, name: &str, public: bool, documented: bool) {
        if !public {
            return;
        }
        self.public_items += 1;
        if documented {
            self.documented += 1;
        } else if self.undocumented_example.is_none() {
            self.undocumented_example = Some(name.to_string());
        }
    }
}

impl<'ast> Visit<'ast> for DocCounter {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.record(
            &node.sig.ident.to_string(),
            is_public(&node.vis),
            has_doc_comment(&node.attrs),
        );
        visit::visit_item_fn(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        self.record(
            &node.ident.to_string(),
            is_public(&node.vis),
            has_doc_comment(&node.attrs),
        );
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast ItemEnum) {
        self.record(
            &node.ident.to_string(),
            is_public(&node.vis),
            has_doc_comment(&node.attrs),
        );
        visit::visit_item_enum(self, node);
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        self.record(
            &node.ident.to_string(),
            is_public(&node.vis),
            has_doc_comment(&node.attrs),
        );
        visit::visit_item_trait(self, node);
    }
}

/// Fraction of `ast`'s public items that have no doc comment, or `None`
/// when the file declares no public items at all.
///
/// Shared with [`crate::agent::sampling`], which uses it to pick M5's
/// (documentation) probe targets: the files with the most undocumented
/// public surface.
pub(crate) fn undocumented_public_ratio(ast: &syn::File) -> Option<f64> {
    let mut counter = DocCounter::default();
    counter.visit_file(ast);
    if counter.public_items == 0 {
        return None;
    }
    let undocumented = counter.public_items - counter.documented;
    Some(undocumented as f64 / counter.public_items as f64)
}

impl Analyzer for DocumentationAnalyzer {
    fn category(&self) -> CategoryId {
        CategoryId::C5
    }

    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult {
        let Some(units) = targets.iter().find_map(|t| t.rust_units()) else {
            return AnalysisResult::unavailable(
                CategoryId::C5,
                &["public_doc_ratio"],
                Some("no Rust units available to analyze".to_string()),
            );
        };

        let mut counter = DocCounter::default();
        let mut undocumented_path = None;
        for unit in units {
            let before = counter.undocumented_example.clone();
            counter.visit_file(&unit.ast);
            if before.is_none() && counter.undocumented_example.is_some() {
                undocumented_path = Some(unit.path.clone());
            }
        }

        if counter.public_items == 0 {
            return AnalysisResult::unavailable(
                CategoryId::C5,
                &["public_doc_ratio"],
                Some("no public items found".to_string()),
            );
        }

        let ratio = counter.documented as f64 / counter.public_items as f64;
        let evidence = match (undocumented_path, &counter.undocumented_example) {
            (Some(path), Some(name)) => vec![Evidence::file(path).entity(name.clone())],
            _ => Vec::new(),
        };

        let mut result = AnalysisResult::new(CategoryId::C5);
        result.insert("public_doc_ratio", MetricValue::available(ratio).with_evidence(evidence));
        result
    }
}
