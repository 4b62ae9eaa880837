//! Writing resolved targets into the project.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StencilError};
use crate::install::target::FileTarget;

/// File-system capability used for every project read and write.
pub trait ProjectWriter: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<String>;

    /// True for existing files and directories.
    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Writes to the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl ProjectWriter for FsWriter {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }
}

/// An in-memory project tree.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    fail_on: Option<PathBuf>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), content.to_string());
        self
    }

    /// Seed a directory.
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into());
        self
    }

    /// Make writes to `path` fail.
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_on = Some(path.into());
        self
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl ProjectWriter for MemoryWriter {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let dirs = self.dirs.lock().unwrap_or_else(|e| e.into_inner());
        files.contains_key(path)
            || dirs.iter().any(|d| d.starts_with(path))
            || files.keys().any(|f| f.starts_with(path))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf());
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "write refused",
            ));
        }
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

/// What to do with a target that conflicts with an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Overwrite,
    Skip,
}

/// Outcome of a write pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl WriteReport {
    /// Number of files that were written.
    pub fn written(&self) -> usize {
        self.created.len() + self.updated.len()
    }
}

/// Write `targets` in order.
///
/// Conflicting targets are written only with an `Overwrite` decision.
/// There is no rollback: when file N fails, files before it stay written.
pub fn write(
    targets: &[FileTarget],
    decisions: &HashMap<PathBuf, Decision>,
    writer: &dyn ProjectWriter,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for target in targets {
        let path = &target.destination;
        if target.unchanged {
            tracing::debug!("Unchanged: {}", path.display());
            report.unchanged.push(path.clone());
            continue;
        }
        if target.conflict && decisions.get(path) != Some(&Decision::Overwrite) {
            tracing::debug!("Skipping conflicting file {}", path.display());
            report.skipped.push(path.clone());
            continue;
        }

        if let Some(parent) = path.parent() {
            writer
                .create_dir_all(parent)
                .map_err(|source| StencilError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        writer
            .write(path, &target.content)
            .map_err(|source| StencilError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Wrote {}", path.display());
        if target.exists {
            report.updated.push(path.clone());
        } else {
            report.created.push(path.clone());
        }
    }

    Ok(report)
}
