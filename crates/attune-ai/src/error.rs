use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("embedding task did not complete: {0}")]
    Interrupted(String),

    #[error(transparent)]
    Inference(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("embedding has dimension {actual}, classifier expects {expected}")]
    Dimension { expected: usize, actual: usize },

    #[error("classifier produced a non-finite score")]
    NonFinite,
}

/// Failure to load or validate a classifier artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read classifier artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse classifier artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid classifier artifact: {0}")]
    Invalid(String),
}
