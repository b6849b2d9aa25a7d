//! `AnalysisTarget`: the language-agnostic unit handed from parsers to analyzers.

use crate::core::types::Language;
use std::path::PathBuf;

/// A single successfully parsed Rust source file.
///
/// `ast` is the full `syn::File` so analyzers can walk function bodies,
/// item visibility and doc attributes without re-parsing.
#[derive(Debug, Clone)]
pub struct RustUnit {
    pub path: PathBuf,
    pub source: String,
    pub ast: syn::File,
}

/// Language-specific payload carried by an `AnalysisTarget`.
///
/// This is the tagged-variant replacement for dynamic dispatch on an
/// imported package type: analyzers that understand one language match on
/// their variant and return `unavailable` for the rest. Language-agnostic
/// analyzers (file counts, churn) ignore the payload entirely.
#[derive(Debug, Clone)]
pub enum TargetPayload {
    /// Fully parsed Rust units, one per successfully parsed file.
    Rust(Vec<RustUnit>),
    /// A language discovery found files for, but this crate ships no parser
    /// for (Python/JavaScript/TypeScript/Go in the reference build). The
    /// file list is still useful to language-agnostic metrics.
    Unparsed,
}

/// A language-tagged bundle of parsed sources handed to analyzers.
///
/// Immutable after construction. Analyzers receive it by read-only
/// reference and must not attempt to mutate it.
#[derive(Debug, Clone)]
pub struct AnalysisTarget {
    pub language: Language,
    pub root: PathBuf,
    /// Files that were successfully parsed (a subset of what discovery found
    /// for this language when some files failed to parse).
    pub files: Vec<PathBuf>,
    pub payload: TargetPayload,
}

impl AnalysisTarget {
    pub fn new(language: Language, root: PathBuf, files: Vec<PathBuf>, payload: TargetPayload) -> Self {
        Self {
            language,
            root,
            files,
            payload,
        }
    }

    /// Rust units, if this target's payload is `TargetPayload::Rust`.
    pub fn rust_units(&self) -> Option<&[RustUnit]> {
        match &self.payload {
            TargetPayload::Rust(units) => Some(units),
            TargetPayload::Unparsed => None,
        }
    }
}
