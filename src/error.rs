use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the save file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a task operation was refused.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Bad or missing client input.
    #[error("{0}")]
    Validation(String),

    /// No task carries the given id.
    #[error("task {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TaskError::Validation(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        TaskError::NotFound(id.into())
    }
}
