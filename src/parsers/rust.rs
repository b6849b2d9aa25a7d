//! Rust parsing via `syn`. The only language this crate ships a real AST for.

use super::ParseFailure;
use crate::core::target::RustUnit;
use std::path::Path;

/// Parse every file in `paths`, returning the units that succeeded and a
/// failure record for each that didn't. A bad file never aborts the batch.
pub fn parse_files(paths: &[std::path::PathBuf]) -> (Vec<RustUnit>, Vec<ParseFailure>) {
    let mut units = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        match parse_one(path) {
            Ok(unit) => units.push(unit),
            Err(message) => failures.push(ParseFailure {
                path: path.clone(),
                message,
            }),
        }
    }

    (units, failures)
}

fn parse_one(path: &Path) -> Result<RustUnit, String> {
    let source = std::fs::read_to_string(path).map_err(|e| format!("failed to read file: {e}"))?;
    let ast = syn::parse_file(&source).map_err(|e| format!("syntax error: {e}"))?;
    Ok(RustUnit {
        path: path.to_path_buf(),
        source,
        ast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_valid_rust_source() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lib.rs");
        fs::write(&path, "pub fn add(a: i32, b: i32) -> i32 { a + b }").unwrap();

        let (units, failures) = parse_files(&[path]);
        assert_eq!(units.len(), 1);
        assert!(failures.is_empty());
        assert_eq!(units[0].ast.items.len(), 1);
    }

    #[test]
    fn syntax_errors_are_reported_per_file_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("good.rs");
        let bad = tmp.path().join("bad.rs");
        fs::write(&good, "fn ok() {}").unwrap();
        fs::write(&bad, "fn broken( {").unwrap();

        let (units, failures) = parse_files(&[good, bad]);
        assert_eq!(units.len(), 1);
        assert_eq!(failures.len(), 1);
    }
}
