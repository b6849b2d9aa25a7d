//! The crate's error taxonomy.
//!
//! Every fallible stage returns `ArsResult<T>`. The pipeline orchestrator
//! treats [`ArsError::Discovery`] and [`ArsError::Config`] as fatal — they
//! abort the run — while [`ArsError::ParserUnavailable`], [`ArsError::Analyzer`],
//! [`ArsError::AgentUnavailable`] and [`ArsError::AgentTimeout`] are absorbed
//! per-target into an `unavailable` metric rather than failing the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArsError {
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("discovery error: {message}")]
    Discovery { message: String, path: Option<PathBuf> },

    #[error("no parser available for {language} ({path})")]
    ParserUnavailable { language: String, path: PathBuf },

    #[error("analyzer {category} failed: {message}")]
    Analyzer { category: String, message: String },

    #[error("agent binary unavailable: {message}")]
    AgentUnavailable { message: String },

    #[error("agent probe timed out after {timeout_secs}s: {context}")]
    AgentTimeout { context: String, timeout_secs: u64 },

    #[error("render error ({format}): {message}")]
    Render { format: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArsError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
            path: None,
        }
    }

    pub fn discovery_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Discovery {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn analyzer(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analyzer {
            category: category.into(),
            message: message.into(),
        }
    }

    /// Whether this error should abort the whole run rather than be absorbed
    /// into an `unavailable` metric for the affected target.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Discovery { .. } | Self::Render { .. })
    }
}

pub type ArsResult<T> = Result<T, ArsError>;
