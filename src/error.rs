use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BspyError {
    #[error("Platform {0} is not recognized!")]
    UnsupportedBackend(String),

    #[error("Failed to load model from {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Partition mismatch: expected {expected} control indices, got {actual}")]
    PartitionMismatch { expected: usize, actual: usize },

    #[error("Invalid index partition: {0}")]
    InvalidPartition(String),

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("Included file {} not found (included from {})", .path.display(), .included_from.display())]
    IncludeNotFound { path: PathBuf, included_from: PathBuf },

    #[error("Include cycle detected: {}", format_chain(.chain))]
    IncludeCycle { chain: Vec<PathBuf> },

    #[error("Platform {0} is not implemented yet")]
    NotImplemented(&'static str),

    #[error("Transform error: {0}")]
    Transform(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl BspyError {
    pub(crate) fn shape(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        BspyError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, BspyError>;
