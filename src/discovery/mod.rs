//! Stage 1: walk the target repository and classify files by language.
//!
//! Discovery never parses a file — it only decides which files exist, which
//! language each belongs to, and which are skipped (too large, excluded, or
//! unreadable). Parsing happens in [`crate::parsers`].

use crate::config::DiscoveryConfig;
use crate::core::Language;
use crate::errors::ArsError;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything discovery found, partitioned by language.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub files_by_language: BTreeMap<Language, Vec<PathBuf>>,
    pub skipped_too_large: Vec<PathBuf>,
    pub skipped_unreadable: Vec<PathBuf>,
    /// True when `max_files` was hit and the walk was cut short.
    pub truncated: bool,
}

impl DiscoveryReport {
    pub fn total_files(&self) -> usize {
        self.files_by_language.values().map(Vec::len).sum()
    }
}

fn build_overrides(root: &Path, patterns: &[String]) -> Result<ignore::overrides::Override, ArsError> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in patterns {
        let negated = format!("!{pattern}");
        builder
            .add(&negated)
            .map_err(|e| ArsError::discovery(format!("invalid exclude pattern '{pattern}': {e}")))?;
    }
    builder
        .build()
        .map_err(|e| ArsError::discovery(format!("failed to compile exclude patterns: {e}")))
}

/// Walk `root`, honoring `.gitignore` plus the configured exclude globs, and
/// classify every file by extension. Stops early (setting `truncated`) once
/// `config.max_files` entries have been accepted.
pub fn discover(root: &Path, config: &DiscoveryConfig) -> Result<DiscoveryReport, ArsError> {
    if !root.exists() {
        return Err(ArsError::discovery_with_path("target path does not exist", root));
    }

    let overrides = build_overrides(root, &config.exclude)?;
    let mut report = DiscoveryReport::default();

    let walker = WalkBuilder::new(root)
        .follow_links(config.follow_symlinks)
        .overrides(overrides)
        .git_ignore(true)
        .git_global(true)
        .build();

    for entry in walker {
        if report.total_files() >= config.max_files {
            report.truncated = true;
            tracing::warn!(max_files = config.max_files, "discovery truncated: too many files");
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(language) = classify(path) else {
            continue;
        };

        match entry.metadata() {
            Ok(meta) if meta.len() > config.max_file_bytes => {
                report.skipped_too_large.push(path.to_path_buf());
                continue;
            }
            Ok(_) => {}
            Err(_) => {
                report.skipped_unreadable.push(path.to_path_buf());
                continue;
            }
        }

        report
            .files_by_language
            .entry(language)
            .or_default()
            .push(path.to_path_buf());
    }

    Ok(report)
}

/// Classify a single path by its extension. Pure predicate, no I/O.
fn classify(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    Language::from_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_with_max(max_files: usize) -> DiscoveryConfig {
        DiscoveryConfig {
            max_files,
            ..DiscoveryConfig::default()
        }
    }

    #[test]
    fn classifies_rust_and_python_files() {
        assert_eq!(classify(Path::new("src/main.rs")), Some(Language::Rust));
        assert_eq!(classify(Path::new("scripts/build.py")), Some(Language::Python));
        assert_eq!(classify(Path::new("README")), None);
    }

    #[test]
    fn discovers_files_partitioned_by_language() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.rs"), "fn main() {}").unwrap();
        fs::write(tmp.path().join("b.py"), "x = 1").unwrap();
        fs::create_dir(tmp.path().join("target")).unwrap();
        fs::write(tmp.path().join("target/ignored.rs"), "").unwrap();

        let report = discover(tmp.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(report.files_by_language.get(&Language::Rust).map(Vec::len), Some(1));
        assert_eq!(report.files_by_language.get(&Language::Python).map(Vec::len), Some(1));
        assert!(!report.truncated);
    }

    #[test]
    fn oversized_files_are_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("big.rs"), vec![b'x'; 128]).unwrap();
        let config = DiscoveryConfig {
            max_file_bytes: 16,
            ..DiscoveryConfig::default()
        };

        let report = discover(tmp.path(), &config).unwrap();
        assert_eq!(report.total_files(), 0);
        assert_eq!(report.skipped_too_large.len(), 1);
    }

    #[test]
    fn max_files_truncates_the_walk() {
        let tmp = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(tmp.path().join(format!("f{i}.rs")), "fn main() {}").unwrap();
        }

        let report = discover(tmp.path(), &config_with_max(2)).unwrap();
        assert!(report.truncated);
        assert!(report.total_files() <= 2);
    }

    #[test]
    fn missing_root_is_a_discovery_error() {
        let result = discover(Path::new("/no/such/path/at/all"), &DiscoveryConfig::default());
        assert!(result.is_err());
    }
}
