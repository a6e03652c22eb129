//! Where generated files go.
//!
//! Rendering never touches the filesystem itself; it hands finished files
//! to an [`OutputSink`]. The generator stages a whole run in a
//! [`MemorySink`] and only commits it to the real sink once nothing failed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::info;

use crate::error::GenError;

/// Receives finished files.
pub trait OutputSink {
    /// Store `contents` as the file at `path`, replacing any previous contents.
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), GenError>;
}

/// Writes files to disk, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), GenError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;
        }
        std::fs::write(path, contents).map_err(|e| GenError::io(path, e))?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Keeps files in memory, in the order they were first written.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    files: IndexMap<PathBuf, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every held file to `sink`, in order.
    pub fn commit(self, sink: &mut dyn OutputSink) -> Result<(), GenError> {
        for (path, contents) in &self.files {
            sink.write(path, contents)?;
        }
        Ok(())
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), GenError> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
