//! Stage 2: turn discovered files into [`AnalysisTarget`]s.
//!
//! Each language either has a real parser (currently just Rust, via `syn`)
//! or doesn't. Files in an unparsed language still become a target —
//! language-agnostic analyzers (file counts, naming, churn) can use the file
//! list even without an AST — but language-specific analyzers see
//! `TargetPayload::Unparsed` and report their metrics unavailable.

mod rust;

use crate::core::{AnalysisTarget, Language, TargetPayload};
use crate::discovery::DiscoveryReport;
use crate::errors::ArsError;
use std::path::PathBuf;

/// One file that failed to parse, kept so the caller can surface it without
/// aborting the whole run.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Targets produced from a discovery report, plus any per-file parse failures.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub targets: Vec<AnalysisTarget>,
    pub failures: Vec<ParseFailure>,
}

/// Parse every discovered file, grouping successfully parsed Rust files into
/// one [`AnalysisTarget`] and wrapping every other language's file list in
/// `TargetPayload::Unparsed`.
pub fn parse_all(root: &std::path::Path, discovery: &DiscoveryReport) -> ParseReport {
    let mut report = ParseReport::default();

    for (&language, files) in &discovery.files_by_language {
        match language {
            Language::Rust => {
                let (units, failures) = rust::parse_files(files);
                report.failures.extend(failures);
                report.targets.push(AnalysisTarget::new(
                    language,
                    root.to_path_buf(),
                    units.iter().map(|u| u.path.clone()).collect(),
                    TargetPayload::Rust(units),
                ));
            }
            Language::Python | Language::JavaScript | Language::TypeScript | Language::Go => {
                tracing::debug!(
                    language = language.display_name(),
                    count = files.len(),
                    "no parser available, carrying file list as unparsed target"
                );
                report.targets.push(AnalysisTarget::new(
                    language,
                    root.to_path_buf(),
                    files.clone(),
                    TargetPayload::Unparsed,
                ));
            }
        }
    }

    report
}

/// Whether `language` has a real parser in this build, vs. being carried as
/// an unparsed file list for language-agnostic metrics only.
pub fn has_parser(language: Language) -> bool {
    matches!(language, Language::Rust)
}

/// Construct the error analyzers use when asked to analyze a target whose
/// language has no parser.
pub fn unavailable_error(language: Language, path: &std::path::Path) -> ArsError {
    ArsError::ParserUnavailable {
        language: language.display_name().to_string(),
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_has_a_parser_other_languages_do_not() {
        assert!(has_parser(Language::Rust));
        assert!(!has_parser(Language::Python));
        assert!(!has_parser(Language::Go));
    }
}
