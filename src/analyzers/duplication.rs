//! C2: duplication — rolling-hash token windows over raw source lines.
//!
//! Works on any language's file list (it never needs an AST), so it runs
//! against `TargetPayload::Unparsed` targets too.

use super::Analyzer;
use crate::core::{AnalysisResult, AnalysisTarget, CategoryId, Evidence, MetricValue};
use std::collections::HashMap;
use std::path::PathBuf;
use xxhash_rust::xxh64::xxh64;

pub struct DuplicationAnalyzer;

const MIN_CHUNK_LINES: usize = 6;

struct ChunkLocation {
    file: PathBuf,
    start_line: usize,
}

fn normalize_chunk(chunk: &str) -> String {
    chunk
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_chunks(path: &std::path::Path, content: &str, chunk_size: usize) -> Vec<(u64, ChunkLocation)> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < chunk_size {
        return Vec::new();
    }

    (0..=lines.len() - chunk_size)
        .map(|i| {
            let normalized = normalize_chunk(&lines[i..i + chunk_size].join("\n"));
            let hash = xxh64(normalized.as_bytes(), 0);
            (
                hash,
                ChunkLocation {
                    file: path.to_path_buf(),
                    start_line: i + 1,
                },
            )
        })
        .collect()
}

impl Analyzer for DuplicationAnalyzer {
    fn category(&self) -> CategoryId {
        CategoryId::C2
    }

    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult {
        let mut result = AnalysisResult::new(CategoryId::C2);

        let files: Vec<&PathBuf> = targets.iter().flat_map(|t| t.files.iter()).collect();
        if files.is_empty() {
            return AnalysisResult::unavailable(
                CategoryId::C2,
                &["duplication_ratio"],
                Some("no files discovered".to_string()),
            );
        }

        let mut chunk_locations: HashMap<u64, Vec<ChunkLocation>> = HashMap::new();
        let mut total_lines = 0usize;

        for path in &files {
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            total_lines += content.lines().count();
            for (hash, location) in extract_chunks(path, &content, MIN_CHUNK_LINES) {
                chunk_locations.entry(hash).or_default().push(location);
            }
        }

        if total_lines == 0 {
            return AnalysisResult::unavailable(
                CategoryId::C2,
                &["duplication_ratio"],
                Some("no readable source lines".to_string()),
            );
        }

        let duplicate_blocks: Vec<_> = chunk_locations
            .into_iter()
            .filter(|(_, locations)| locations.len() > 1)
            .collect();

        let duplicated_lines: usize = duplicate_blocks
            .iter()
            .map(|(_, locations)| locations.len() * MIN_CHUNK_LINES)
            .sum();

        let ratio = (duplicated_lines as f64 / total_lines as f64).min(1.0);

        let evidence: Vec<Evidence> = duplicate_blocks
            .iter()
            .take(5)
            .filter_map(|(_, locations)| locations.first())
            .map(|loc| Evidence::file(loc.file.clone()).value(format!("line {}", loc.start_line)))
            .collect();

        result.insert(
            "duplication_ratio",
            MetricValue::available(ratio).with_evidence(evidence),
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Language;

    fn target_for(files: Vec<PathBuf>) -> AnalysisTarget {
        AnalysisTarget::new(Language::Rust, ".".into(), files, crate::core::TargetPayload::Unparsed)
    }

    #[test]
    fn identical_blocks_are_flagged_as_duplicate() {
        let tmp = tempfile::tempdir().unwrap();
        let block = "let a = 1;\nlet b = 2;\nlet c = 3;\nlet d = 4;\nlet e = 5;\nlet f = 6;\n";
        let a = tmp.path().join("a.rs");
        let b = tmp.path().join("b.rs");
        std::fs::write(&a, block).unwrap();
        std::fs::write(&b, block).unwrap();

        let result = DuplicationAnalyzer.analyze(&[target_for(vec![a, b])]);
        assert!(result.metrics["duplication_ratio"].raw.unwrap() > 0.0);
    }

    #[test]
    fn unique_content_has_zero_duplication() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.rs");
        std::fs::write(&a, "fn unique_one() {}\nfn unique_two() {}\n").unwrap();

        let result = DuplicationAnalyzer.analyze(&[target_for(vec![a])]);
        assert_eq!(result.metrics["duplication_ratio"].raw, Some(0.0));
    }

    #[test]
    fn no_files_is_unavailable() {
        let result = DuplicationAnalyzer.analyze(&[target_for(vec![])]);
        assert!(!result.metrics["duplication_ratio"].available);
    }
}
