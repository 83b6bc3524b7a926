//! Prompt history persistence.

use std::path::Path;

use reedline::{FileBackedHistory, ReedlineError};

/// Open (or start) the history file at `path`, creating its directory.
pub fn file_history(path: &Path, max_entries: usize) -> Result<FileBackedHistory, HistoryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    FileBackedHistory::with_file(max_entries, path.to_path_buf()).map_err(HistoryError::Reedline)
}

/// Error types for history setup
#[derive(Debug)]
pub enum HistoryError {
    Reedline(ReedlineError),
    IoError(std::io::Error),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Reedline(e) => write!(f, "History error: {}", e),
            HistoryError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(e: std::io::Error) -> Self {
        HistoryError::IoError(e)
    }
}
