//! A single file-backed scratch buffer.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use super::BufferError;

/// Prefix given to unnamed buffer files so they stay hidden.
pub const TEMP_PREFIX: &str = ".";

/// Suffix given to unnamed buffer files so they are easy to spot and ignore.
pub const TEMP_SUFFIX: &str = ".bufshell";

/// One on-disk file backing a buffer.
///
/// The handle is owned exclusively by this value. Reads always go back to
/// the file on disk, because an external editor may have rewritten it since
/// the handle was opened.
#[derive(Debug)]
pub struct BufferFile {
    path: PathBuf,
    handle: Option<File>,
}

impl BufferFile {
    /// Open `path` (creating it if needed) or, without a path, create a new
    /// hidden temporary file inside `temp_dir`.
    pub fn create(path: Option<&Path>, temp_dir: &Path) -> Result<Self, BufferError> {
        match path {
            Some(path) => Self::open_named(path),
            None => Self::create_unnamed(temp_dir),
        }
    }

    fn open_named(path: &Path) -> Result<Self, BufferError> {
        let handle = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| BufferError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let path = fs::canonicalize(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path,
            handle: Some(handle),
        })
    }

    fn create_unnamed(temp_dir: &Path) -> Result<Self, BufferError> {
        let open_error = |source| BufferError::Open {
            path: temp_dir.to_path_buf(),
            source,
        };

        let (handle, path) = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(temp_dir)
            .map_err(open_error)?
            .keep()
            .map_err(|e| open_error(e.error))?;

        let path = fs::canonicalize(&path).map_err(|source| BufferError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            handle: Some(handle),
        })
    }

    /// Canonical absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Release the file handle. Safe to call more than once.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            tracing::debug!(path = %self.path.display(), "closed buffer file");
        }
    }

    /// Close the handle and unlink the file from disk.
    pub fn destroy(&mut self) -> Result<(), BufferError> {
        self.close();
        fs::remove_file(&self.path).map_err(|source| BufferError::Destroy {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "destroyed buffer file");
        Ok(())
    }

    /// Read the whole file as it is on disk right now.
    pub fn read_contents(&self) -> Result<String, BufferError> {
        fs::read_to_string(&self.path).map_err(|source| BufferError::Read {
            path: self.path.clone(),
            source,
        })
    }
}
