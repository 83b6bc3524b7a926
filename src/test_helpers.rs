#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::rc::Rc;

#[cfg(test)]
use tempfile::TempDir;

#[cfg(test)]
use crate::editor::{Editor, EditorError};

/// Scratch directory removed when dropped.
#[cfg(test)]
pub struct Workspace {
    dir: TempDir,
}

#[cfg(test)]
impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` inside the workspace and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write workspace file");
        path
    }
}

/// Editor stand-in that records every invocation instead of spawning.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingEditor {
    calls: Rc<RefCell<Vec<Vec<PathBuf>>>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingEditor {
    /// An editor that records the call, then reports that it could not start.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<PathBuf>> {
        self.calls.borrow().clone()
    }
}

#[cfg(test)]
impl Editor for RecordingEditor {
    fn edit(&self, paths: &[PathBuf]) -> Result<(), EditorError> {
        self.calls.borrow_mut().push(paths.to_vec());
        if self.fail {
            return Err(EditorError::Spawn {
                program: "recording-editor".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }
        Ok(())
    }
}
