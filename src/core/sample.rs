//! `C7Sample`: one agent probe, retained only in debug mode.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One (prompt, response, score) triple produced while evaluating a C7
/// metric. Discarded after scoring unless `--debug-c7` is set, in which
/// case the full set is attached to the C7 `AnalysisResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct C7Sample {
    pub metric: String,
    pub file_path: PathBuf,
    pub description: String,
    pub prompt: String,
    pub response: String,
    pub score: u8,
    #[serde(rename = "duration")]
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
