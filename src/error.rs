use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a persistence backend.
///
/// The store never surfaces these to callers; the persistence adapter
/// logs them and falls back to defaults or drops the write.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type PersistResult<T> = Result<T, PersistError>;
