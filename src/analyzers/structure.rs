//! C1: structure & complexity — cyclomatic complexity, function length, nesting depth.

use super::Analyzer;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, Evidence, MetricValue};
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{Block, ImplItemFn, ItemFn};

pub struct StructureAnalyzer;

struct FunctionMetrics {
    name: String,
    cyclomatic: u32,
    length_lines: usize,
    max_nesting: u32,
}

/// Counts decision points in a function body. Each `if`/`while`/`for`/match
/// arm/`&&`/`||` adds one path; a bare block adds none.
struct CyclomaticVisitor {
    complexity: u32,
    depth: u32,
    max_depth: u32,
}

impl CyclomaticVisitor {
    fn new() -> Self {
        Self {
            complexity: 1,
            depth: 0,
            max_depth: 0,
        }
    }

    fn enter_block(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn exit_block(&mut self) {
        self.depth -= 1;
    }
}

impl<'ast> Visit<'ast> for CyclomaticVisitor {
    fn visit_expr_if(&mut self, node: &'ast syn::ExprIf) {
        self.complexity += 1;
        visit::visit_expr_if(self, node);
    }

    fn visit_expr_while(&mut self, node: &'ast syn::ExprWhile) {
        self.complexity += 1;
        visit::visit_expr_while(self, node);
    }

    fn visit_expr_for_loop(&mut self, node: &'ast syn::ExprForLoop) {
        self.complexity += 1;
        visit::visit_expr_for_loop(self, node);
    }

    fn visit_arm(&mut self, node: &'ast syn::Arm) {
        self.complexity += 1;
        visit::visit_arm(self, node);
    }

    fn visit_expr_binary(&mut self, node: &'ast syn::ExprBinary) {
        if matches!(node.op, syn::BinOp::And(_) | syn::BinOp::Or(_)) {
            self.complexity += 1;
        }
        visit::visit_expr_binary(self, node);
    }

    fn visit_block(&mut self, node: &'ast Block) {
        self.enter_block();
        visit::visit_block(self, node);
        self.exit_block();
    }
}

fn measure(name: String, block: &Block) -> FunctionMetrics {
    let mut visitor = CyclomaticVisitor::new();
    visitor.visit_block(block);

    let length_lines = match (block.span().start().line, block.span().end().line) {
        (start, end) if end >= start => end - start + 1,
        _ => 0,
    };

    FunctionMetrics {
        name,
        cyclomatic: visitor.complexity,
        length_lines,
        max_nesting: visitor.max_depth.saturating_sub(1),
    }
}

struct FunctionCollector {
    functions: Vec<FunctionMetrics>,
}

impl<'ast> Visit<'ast> for FunctionCollector {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.functions
            .push(measure(node.sig.ident.to_string(), &node.block));
        visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.functions
            .push(measure(node.sig.ident.to_string(), &node.block));
        visit::visit_impl_item_fn(self, node);
    }
}

fn collect_functions(ast: &syn::File) -> Vec<FunctionMetrics> {
    let mut collector = FunctionCollector { functions: Vec::new() };
    collector.visit_file(ast);
    collector.functions
}

/// The highest cyclomatic complexity of any single function in `ast`.
///
/// Shared with [`crate::agent::sampling`], which uses it to pick M2's
/// (comprehension) probe targets: the files with the most complex logic.
pub(crate) fn file_max_complexity(ast: &syn::File) -> u32 {
    collect_functions(ast).iter().map(|f| f.cyclomatic).max().unwrap_or(0)
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<u32>() as f64 / values.len() as f64
    }
}

impl Analyzer for StructureAnalyzer {
    fn category(&self) -> CategoryId {
        CategoryId::C1
    }

    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult {
        let mut result = AnalysisResult::new(CategoryId::C1);

        let Some(units) = targets.iter().find_map(|t| t.rust_units()) else {
            return AnalysisResult::unavailable(
                CategoryId::C1,
                &[
                    "avg_cyclomatic_complexity",
                    "max_cyclomatic_complexity",
                    "avg_function_length",
                    "max_nesting_depth",
                ],
                Some("no Rust units available to analyze".to_string()),
            );
        };

        let mut all_functions: Vec<(std::path::PathBuf, FunctionMetrics)> = Vec::new();
        for unit in units {
            for function in collect_functions(&unit.ast) {
                all_functions.push((unit.path.clone(), function));
            }
        }

        if all_functions.is_empty() {
            return AnalysisResult::unavailable(
                CategoryId::C1,
                &[
                    "avg_cyclomatic_complexity",
                    "max_cyclomatic_complexity",
                    "avg_function_length",
                    "max_nesting_depth",
                ],
                Some("no functions found".to_string()),
            );
        }

        let cyclomatic: Vec<u32> = all_functions.iter().map(|(_, f)| f.cyclomatic).collect();
        let lengths: Vec<u32> = all_functions.iter().map(|(_, f)| f.length_lines as u32).collect();
        let nesting: Vec<u32> = all_functions.iter().map(|(_, f)| f.max_nesting).collect();

        let (worst_path, worst_fn) = all_functions
            .iter()
            .max_by_key(|(_, f)| f.cyclomatic)
            .expect("all_functions is non-empty");

        result.insert(
            "avg_cyclomatic_complexity",
            MetricValue::available(mean(&cyclomatic)),
        );
        result.insert(
            "max_cyclomatic_complexity",
            MetricValue::available(*cyclomatic.iter().max().unwrap_or(&0) as f64).with_evidence(vec![
                Evidence::file(worst_path.clone()).entity(worst_fn.name.clone()),
            ]),
        );
        result.insert("avg_function_length", MetricValue::available(mean(&lengths)));
        result.insert(
            "max_nesting_depth",
            MetricValue::available(*nesting.iter().max().unwrap_or(&0) as f64),
        );

        result
    }
}
