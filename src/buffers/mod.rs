//! Buffer lifecycle management.
//!
//! Buffers live in an ordered list and are addressed by their 1-based
//! position. Numbers are positional, not identities: removing buffer 2 makes
//! the old buffer 3 the new buffer 2.

mod file;

pub use file::{BufferFile, TEMP_PREFIX, TEMP_SUFFIX};

use std::path::{Path, PathBuf};

use crate::editor::{Editor, EditorError};

/// Error types for buffer operations
#[derive(Debug)]
pub enum BufferError {
    Open { path: PathBuf, source: std::io::Error },
    Destroy { path: PathBuf, source: std::io::Error },
    Read { path: PathBuf, source: std::io::Error },
    InvalidNumber(String),
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::Open { path, source } => {
                write!(f, "Could not open buffer {}: {}", path.display(), source)
            }
            BufferError::Destroy { path, source } => {
                write!(f, "Could not delete {}: {}", path.display(), source)
            }
            BufferError::Read { path, source } => {
                write!(f, "Could not read {}: {}", path.display(), source)
            }
            BufferError::InvalidNumber(number) => write!(f, "Invalid buffer number: {}", number),
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Open { source, .. }
            | BufferError::Destroy { source, .. }
            | BufferError::Read { source, .. } => Some(source),
            BufferError::InvalidNumber(_) => None,
        }
    }
}

/// Result of adding a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new buffer was appended with this number.
    Added(usize),
    /// The path already backs this buffer; nothing was added.
    AlreadyOpen(usize),
}

/// Result of an edit request.
#[derive(Debug)]
pub struct EditOutcome {
    /// Paths handed to the editor, in request order.
    pub opened: Vec<PathBuf>,
    /// Numbers that did not name a buffer.
    pub rejected: Vec<BufferError>,
    /// Editor result, or `None` when no valid buffer was requested.
    pub editor: Option<Result<(), EditorError>>,
}

/// Ordered collection of open buffers.
pub struct BufferManager {
    buffers: Vec<BufferFile>,
    temp_dir: PathBuf,
}

impl BufferManager {
    /// Create an empty manager that puts unnamed buffers in the current
    /// working directory.
    pub fn new() -> Self {
        let temp_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(temp_dir)
    }

    /// Create an empty manager that puts unnamed buffers in `temp_dir`.
    pub fn in_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            buffers: Vec::new(),
            temp_dir: temp_dir.into(),
        }
    }

    /// Directory used for unnamed buffers.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Add a buffer for `path`, or a fresh temporary buffer without one.
    ///
    /// A path that already backs a buffer is not added twice; the handle
    /// opened for the check is closed again.
    pub fn add(&mut self, path: Option<&Path>) -> Result<AddOutcome, BufferError> {
        let mut buffer = BufferFile::create(path, &self.temp_dir)?;

        if let Some(index) = self.position_of(buffer.path()) {
            buffer.close();
            tracing::debug!(path = %buffer.path().display(), number = index + 1, "buffer already open");
            return Ok(AddOutcome::AlreadyOpen(index + 1));
        }

        tracing::debug!(path = %buffer.path().display(), number = self.buffers.len() + 1, "added buffer");
        self.buffers.push(buffer);
        Ok(AddOutcome::Added(self.buffers.len()))
    }

    /// Close buffer `number` and drop it from the list.
    pub fn remove(&mut self, number: usize) -> Result<PathBuf, BufferError> {
        let index = self.index_of(number)?;
        let mut buffer = self.buffers.remove(index);
        buffer.close();
        tracing::debug!(path = %buffer.path().display(), number, "removed buffer");
        Ok(buffer.path().to_path_buf())
    }

    /// Close buffer `number`, delete its file, and drop it from the list.
    ///
    /// The entry is removed even when the file could not be deleted.
    pub fn destroy(&mut self, number: usize) -> Result<PathBuf, BufferError> {
        let index = self.index_of(number)?;
        let mut buffer = self.buffers.remove(index);
        match buffer.destroy() {
            Ok(()) => Ok(buffer.path().to_path_buf()),
            Err(e) => {
                tracing::warn!(error = %e, number, "buffer removed but file not deleted");
                Err(e)
            }
        }
    }

    /// Canonical path of buffer `number`.
    pub fn path_of(&self, number: usize) -> Result<&Path, BufferError> {
        let index = self.index_of(number)?;
        Ok(self.buffers[index].path())
    }

    /// Path and current on-disk content of buffer `number`.
    pub fn read(&self, number: usize) -> Result<(PathBuf, String), BufferError> {
        let index = self.index_of(number)?;
        let buffer = &self.buffers[index];
        let content = buffer.read_contents()?;
        Ok((buffer.path().to_path_buf(), content))
    }

    /// Numbered listing in display order.
    pub fn list(&self) -> Vec<(usize, &Path)> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(index, buffer)| (index + 1, buffer.path()))
            .collect()
    }

    /// Open every valid buffer in `numbers` in one editor session.
    ///
    /// Blocks until the editor exits. Invalid numbers are collected in the
    /// outcome and do not prevent the valid ones from being opened.
    pub fn edit(&self, numbers: &[usize], editor: &dyn Editor) -> EditOutcome {
        let mut opened = Vec::new();
        let mut rejected = Vec::new();

        for &number in numbers {
            match self.path_of(number) {
                Ok(path) => opened.push(path.to_path_buf()),
                Err(e) => rejected.push(e),
            }
        }

        let editor = if opened.is_empty() {
            None
        } else {
            tracing::debug!(count = opened.len(), "launching editor");
            Some(editor.edit(&opened))
        };

        EditOutcome {
            opened,
            rejected,
            editor,
        }
    }

    /// Close every buffer and start over with an empty list.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.close();
        }
        self.buffers.clear();
        tracing::debug!("buffer list reset");
    }

    fn index_of(&self, number: usize) -> Result<usize, BufferError> {
        if number == 0 || number > self.buffers.len() {
            return Err(BufferError::InvalidNumber(number.to_string()));
        }
        Ok(number - 1)
    }

    fn position_of(&self, path: &Path) -> Option<usize> {
        self.buffers.iter().position(|b| b.path() == path)
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BufferManager {
    fn drop(&mut self) {
        for buffer in &mut self.buffers {
            buffer.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{RecordingEditor, Workspace};
    use std::fs;

    fn numbers(manager: &BufferManager) -> Vec<usize> {
        manager.list().into_iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn numbers_stay_contiguous_through_adds_and_removes() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());

        for _ in 0..5 {
            manager.add(None).unwrap();
        }
        assert_eq!(numbers(&manager), vec![1, 2, 3, 4, 5]);

        manager.remove(2).unwrap();
        assert_eq!(numbers(&manager), vec![1, 2, 3, 4]);

        manager.remove(4).unwrap();
        manager.remove(1).unwrap();
        assert_eq!(numbers(&manager), vec![1, 2]);

        manager.add(None).unwrap();
        assert_eq!(numbers(&manager), vec![1, 2, 3]);
    }

    #[test]
    fn removing_shifts_later_buffers_down() {
        let ws = Workspace::new();
        let a = ws.path().join("a.py");
        let b = ws.path().join("b.py");
        let mut manager = BufferManager::in_dir(ws.path());

        assert_eq!(manager.add(Some(&a)).unwrap(), AddOutcome::Added(1));
        assert_eq!(manager.add(Some(&b)).unwrap(), AddOutcome::Added(2));

        manager.remove(1).unwrap();
        let listing = manager.list();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].0, 1);
        assert_eq!(listing[0].1, fs::canonicalize(&b).unwrap());
    }

    #[test]
    fn duplicate_path_is_not_added_twice() {
        let ws = Workspace::new();
        let target = ws.path().join("dup.txt");
        let mut manager = BufferManager::in_dir(ws.path());

        manager.add(None).unwrap();
        assert_eq!(manager.add(Some(&target)).unwrap(), AddOutcome::Added(2));
        assert_eq!(manager.add(Some(&target)).unwrap(), AddOutcome::AlreadyOpen(2));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn duplicate_detection_uses_canonical_paths() {
        let ws = Workspace::new();
        fs::create_dir(ws.path().join("sub")).unwrap();
        let direct = ws.path().join("file.txt");
        let roundabout = ws.path().join("sub").join("..").join("file.txt");
        let mut manager = BufferManager::in_dir(ws.path());

        manager.add(Some(&direct)).unwrap();
        assert_eq!(manager.add(Some(&roundabout)).unwrap(), AddOutcome::AlreadyOpen(1));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn failed_open_leaves_list_unchanged() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();

        let bad = ws.path().join("missing").join("x.txt");
        assert!(matches!(manager.add(Some(&bad)), Err(BufferError::Open { .. })));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn out_of_range_numbers_are_rejected_without_effect() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();
        manager.add(None).unwrap();

        assert!(matches!(manager.remove(0), Err(BufferError::InvalidNumber(_))));
        assert!(matches!(manager.remove(3), Err(BufferError::InvalidNumber(_))));
        assert!(matches!(manager.destroy(7), Err(BufferError::InvalidNumber(_))));
        assert!(matches!(manager.path_of(0), Err(BufferError::InvalidNumber(_))));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn remove_keeps_file_on_disk() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();

        let path = manager.remove(1).unwrap();
        assert!(path.exists());
        assert!(manager.is_empty());
    }

    #[test]
    fn destroy_deletes_file_and_readd_starts_fresh() {
        let ws = Workspace::new();
        let target = ws.write("scratch.txt", "old = 1\n");
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(Some(&target)).unwrap();

        let path = manager.destroy(1).unwrap();
        assert!(!path.exists());
        assert!(manager.is_empty());

        manager.add(Some(&target)).unwrap();
        let (_, content) = manager.read(1).unwrap();
        assert_eq!(content, "");
    }

    #[test]
    fn destroy_removes_entry_even_if_file_already_gone() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();
        manager.add(None).unwrap();

        let path = manager.path_of(1).unwrap().to_path_buf();
        fs::remove_file(&path).unwrap();

        assert!(matches!(manager.destroy(1), Err(BufferError::Destroy { .. })));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn read_returns_current_disk_content() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();

        let path = manager.path_of(1).unwrap().to_path_buf();
        fs::write(&path, "x = 5\n").unwrap();
        assert_eq!(manager.read(1).unwrap().1, "x = 5\n");

        fs::write(&path, "x = 6\n").unwrap();
        assert_eq!(manager.read(1).unwrap().1, "x = 6\n");
    }

    #[test]
    fn edit_opens_valid_buffers_in_one_call() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();
        manager.add(None).unwrap();
        let editor = RecordingEditor::default();

        let outcome = manager.edit(&[2, 9, 1], &editor);

        assert_eq!(outcome.rejected.len(), 1);
        assert!(matches!(outcome.editor, Some(Ok(()))));
        let calls = editor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![
                manager.path_of(2).unwrap().to_path_buf(),
                manager.path_of(1).unwrap().to_path_buf(),
            ]
        );
    }

    #[test]
    fn edit_with_only_invalid_numbers_skips_editor() {
        let ws = Workspace::new();
        let manager = BufferManager::in_dir(ws.path());
        let editor = RecordingEditor::default();

        let outcome = manager.edit(&[1], &editor);

        assert!(outcome.editor.is_none());
        assert_eq!(outcome.rejected.len(), 1);
        assert!(editor.calls().is_empty());
    }

    #[test]
    fn reset_closes_without_deleting() {
        let ws = Workspace::new();
        let mut manager = BufferManager::in_dir(ws.path());
        manager.add(None).unwrap();
        manager.add(None).unwrap();
        let paths: Vec<PathBuf> = manager.list().into_iter().map(|(_, p)| p.to_path_buf()).collect();

        manager.reset();

        assert!(manager.is_empty());
        assert!(paths.iter().all(|p| p.exists()));
    }
}
