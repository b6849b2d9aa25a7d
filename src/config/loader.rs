//! Resolves `.arsrc.yml` by walking up from the current directory, the way
//! `.gitignore` and friends are discovered.

use super::core::Config;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = ".arsrc.yml";
const MAX_TRAVERSAL_DEPTH: usize = 64;

fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse, validate and normalize a config document. Exposed separately from
/// file I/O so `--config <path>` and discovery share one code path.
pub fn parse_and_validate_config(contents: &str) -> Result<Config, String> {
    let mut config: Config =
        serde_yaml::from_str(contents).map_err(|e| format!("failed to parse {CONFIG_FILENAME}: {e}"))?;
    config.validate()?;
    config.normalize();
    Ok(config)
}

fn try_load_config_from_path(path: &Path) -> Option<Config> {
    let contents = match read_config_file(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config file");
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, falling back to defaults");
            None
        }
    }
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load configuration for a scan rooted at `start`.
///
/// Resolution order: `explicit_path` (from `--config`) if given, otherwise an
/// ancestor search for `.arsrc.yml` starting at `start`, otherwise built-in
/// defaults. An explicit path that fails to parse is a fatal [`crate::errors::ArsError::Config`];
/// a discovered file that fails to parse is only logged and skipped.
pub fn load_config(start: &Path, explicit_path: Option<&Path>) -> Result<Config, crate::errors::ArsError> {
    if let Some(path) = explicit_path {
        let contents = read_config_file(path).map_err(|e| {
            crate::errors::ArsError::config_with_path(format!("failed to read config: {e}"), path)
        })?;
        return parse_and_validate_config(&contents)
            .map_err(|e| crate::errors::ArsError::config_with_path(e, path));
    }

    let config = directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!("no {CONFIG_FILENAME} found, using defaults");
            Config::default()
        });
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_all_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config.version, 1);
        assert!((config.scoring.weights.c7_agent_eval - 0.40).abs() < 1e-9);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let yaml = "scoring:\n  threshold: 7.5\n";
        let config = parse_and_validate_config(yaml).unwrap();
        assert_eq!(config.scoring.threshold, Some(7.5));
        assert!(!config.agent.enabled);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let yaml = "scoring: [unclosed\n";
        assert!(parse_and_validate_config(yaml).is_err());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let yaml = "bogus_field: true\n";
        assert!(parse_and_validate_config(yaml).is_err());
    }

    #[test]
    fn ancestor_search_stops_at_first_match() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "scoring:\n  threshold: 5.0\n").unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.scoring.threshold, Some(5.0));
    }

    #[test]
    fn missing_explicit_path_is_fatal() {
        let result = load_config(Path::new("."), Some(Path::new("/no/such/.arsrc.yml")));
        assert!(result.is_err());
    }
}
