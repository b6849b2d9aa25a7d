//! Content-hash cache for C7 probe responses.
//!
//! Keyed by `blake3(file content) + blake3(prompt template + rubric version)`
//! so a probe only re-runs when either the file or the rubric actually
//! changed, not on every invocation. Entries are postcard-encoded, matching
//! the compact binary-serialization convention used for the scan cache
//! elsewhere in the pipeline.

use crate::agent::rubric::{Metric, RUBRIC_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub response: String,
    pub score: u8,
}

pub struct ResponseCache {
    dir: PathBuf,
}

fn cache_key(file_content: &[u8], metric: Metric) -> String {
    let content_hash = blake3::hash(file_content);
    let template_hash = blake3::hash(format!("{}-v{RUBRIC_VERSION}", metric.key()).as_bytes());
    format!("{}_{}", content_hash.to_hex(), template_hash.to_hex())
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, file_content: &[u8], metric: Metric) -> PathBuf {
        self.dir.join(cache_key(file_content, metric)).with_extension("postcard")
    }

    pub fn get(&self, file_content: &[u8], metric: Metric) -> Option<CachedResponse> {
        let path = self.entry_path(file_content, metric);
        let bytes = std::fs::read(path).ok()?;
        postcard::from_bytes(&bytes).ok()
    }

    pub fn put(&self, file_content: &[u8], metric: Metric, entry: &CachedResponse) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(file_content, metric);
        let bytes = postcard::to_allocvec(entry).map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }
}

/// Convenience for callers that only have a file path on disk.
pub fn read_file_for_caching(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_a_cached_response() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path());
        let content = b"fn main() {}";
        let entry = CachedResponse {
            response: "this is main".to_string(),
            score: 7,
        };

        assert!(cache.get(content, Metric::Comprehension).is_none());
        cache.put(content, Metric::Comprehension, &entry).unwrap();

        let cached = cache.get(content, Metric::Comprehension).unwrap();
        assert_eq!(cached.score, 7);
        assert_eq!(cached.response, "this is main");
    }

    #[test]
    fn different_content_misses_the_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path());
        cache
            .put(
                b"fn a() {}",
                Metric::Comprehension,
                &CachedResponse {
                    response: "a".to_string(),
                    score: 5,
                },
            )
            .unwrap();

        assert!(cache.get(b"fn b() {}", Metric::Comprehension).is_none());
    }

    #[test]
    fn different_metric_misses_the_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path());
        let content = b"fn main() {}";
        cache
            .put(
                content,
                Metric::Comprehension,
                &CachedResponse {
                    response: "x".to_string(),
                    score: 5,
                },
            )
            .unwrap();

        assert!(cache.get(content, Metric::Documentation).is_none());
    }
}
