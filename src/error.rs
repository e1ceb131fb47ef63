use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("root '{0}' is not a directory")]
    RootNotADirectory(PathBuf),
    #[error("no files found")]
    NoFilesFound,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}
impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.into(),
            source,
        }
    }
}
