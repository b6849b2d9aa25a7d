//! C4: architecture & coupling — import-cycle detection and, when a `.git`
//! directory is present, commit churn concentration.
//!
//! The import graph is arena-indexed (file path -> `petgraph` node index)
//! rather than built from pointer-linked module nodes, so cycles can't
//! produce a graph structure Rust's ownership model would reject.

use super::Analyzer;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, Evidence, MetricValue};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct ArchitectureAnalyzer;

fn module_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

/// Extract the first path segment of every `use crate::...` statement in a
/// Rust file's source, as a best-effort proxy for "which sibling module does
/// this file depend on". Good enough to find cycles; not a real resolver.
fn extract_crate_use_targets(source: &str) -> Vec<String> {
    let mut targets = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("use crate::") {
            let segment = rest
                .split(|c: char| !c.is_alphanumeric() && c != '_')
                .find(|s| !s.is_empty());
            if let Some(segment) = segment {
                targets.push(segment.to_string());
            }
        }
    }
    targets
}

fn build_import_graph(files: &[PathBuf]) -> (DiGraph<PathBuf, ()>, HashMap<String, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut nodes_by_stem: HashMap<String, NodeIndex> = HashMap::new();

    for path in files {
        let idx = graph.add_node(path.clone());
        if let Some(stem) = module_stem(path) {
            nodes_by_stem.entry(stem).or_insert(idx);
        }
    }

    for path in files {
        let Ok(source) = std::fs::read_to_string(path) else {
            continue;
        };
        let Some(&from) = module_stem(path).and_then(|s| nodes_by_stem.get(&s)) else {
            continue;
        };
        for target_stem in extract_crate_use_targets(&source) {
            if let Some(&to) = nodes_by_stem.get(&target_stem) {
                if to != from {
                    graph.add_edge(from, to, ());
                }
            }
        }
    }

    (graph, nodes_by_stem)
}

fn import_cycle_ratio(graph: &DiGraph<PathBuf, ()>) -> (f64, Option<PathBuf>) {
    if graph.node_count() == 0 {
        return (0.0, None);
    }

    let sccs = tarjan_scc(graph);
    let mut nodes_in_cycles = 0usize;
    let mut example = None;

    for scc in &sccs {
        if scc.len() > 1 {
            nodes_in_cycles += scc.len();
            if example.is_none() {
                example = scc.first().map(|&idx| graph[idx].clone());
            }
        }
    }

    (nodes_in_cycles as f64 / graph.node_count() as f64, example)
}

/// Incoming-edge count per file in the crate-local import graph: how many
/// other files `use crate::` into this one.
///
/// Shared with [`crate::agent::sampling`], which uses it to pick M3's
/// (navigation) probe targets: the files most other code depends on.
pub(crate) fn afferent_coupling(files: &[PathBuf]) -> HashMap<PathBuf, usize> {
    let (graph, _) = build_import_graph(files);
    graph
        .node_indices()
        .map(|idx| {
            let incoming = graph.neighbors_directed(idx, petgraph::Direction::Incoming).count();
            (graph[idx].clone(), incoming)
        })
        .collect()
}

/// Commits touching each file over the repository's history, when `.git`
/// exists. Returns `None` when there's no repository to walk.
fn churn_concentration(root: &Path, files: &[PathBuf]) -> Option<f64> {
    let repo = git2::Repository::discover(root).ok()?;
    let mut walker = repo.revwalk().ok()?;
    walker.push_head().ok()?;

    let mut touches: HashMap<PathBuf, u32> = HashMap::new();
    let mut total_commits = 0u32;

    for oid in walker.flatten().take(500) {
        total_commits += 1;
        let Ok(commit) = repo.find_commit(oid) else { continue };
        let Ok(tree) = commit.tree() else { continue };
        let parent_tree = commit.parents().next().and_then(|p| p.tree().ok());
        let Ok(diff) = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None) else {
            continue;
        };
        let _ = diff.foreach(
            &mut |delta, _| {
                if let Some(path) = delta.new_file().path() {
                    *touches.entry(root.join(path)).or_insert(0) += 1;
                }
                true
            },
            None,
            None,
            None,
        );
    }

    if total_commits == 0 || files.is_empty() {
        return None;
    }

    let tracked: Vec<u32> = files.iter().filter_map(|f| touches.get(f)).copied().collect();
    if tracked.is_empty() {
        return Some(0.0);
    }
    let max_touches = *tracked.iter().max().unwrap_or(&0) as f64;
    Some((max_touches / total_commits as f64).min(1.0))
}

impl Analyzer for ArchitectureAnalyzer {
    fn category(&self) -> CategoryId {
        CategoryId::C4
    }

    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult {
        let mut result = AnalysisResult::new(CategoryId::C4);

        let rust_files: Vec<PathBuf> = targets
            .iter()
            .filter(|t| matches!(t.language, crate::core::Language::Rust))
            .flat_map(|t| t.files.clone())
            .collect();

        if rust_files.is_empty() {
            return AnalysisResult::unavailable(
                CategoryId::C4,
                &["import_cycle_ratio", "churn_concentration"],
                Some("no Rust files to build an import graph from".to_string()),
            );
        }

        let (graph, _) = build_import_graph(&rust_files);
        let (ratio, example) = import_cycle_ratio(&graph);
        let evidence = example.into_iter().map(Evidence::file).collect();
        result.insert(
            "import_cycle_ratio",
            MetricValue::available(ratio).with_evidence(evidence),
        );

        let root = targets.first().map(|t| t.root.as_path()).unwrap_or_else(|| Path::new("."));
        match churn_concentration(root, &rust_files) {
            Some(churn) => result.insert("churn_concentration", MetricValue::available(churn)),
            None => result.insert("churn_concentration", MetricValue::unavailable()),
        }

        result
    }
}
