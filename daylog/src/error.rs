use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Ошибки файлового приёмника. Наружу из фасада не выходят.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid file policy: {0}")]
    InvalidPolicy(String),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl LogError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
