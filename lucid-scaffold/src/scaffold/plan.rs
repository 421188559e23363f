//! Staged file writes
//!
//! Every artifact of a run is rendered into a [`WritePlan`] first. The plan is
//! validated as a whole before the first byte hits the disk, then committed in
//! insertion order. Commit does not roll back: a failure halfway leaves the
//! earlier files written.

use std::fs;
use std::path::{Path, PathBuf};

use super::generator::{ArtifactKind, GeneratedFile};
use crate::error::{Result, ScaffoldError};

/// Ordered set of pending writes under a project root
#[derive(Debug, Clone)]
pub struct WritePlan {
    root: PathBuf,
    files: Vec<GeneratedFile>,
}

impl WritePlan {
    /// Empty plan for the project at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
        }
    }

    /// Queue a file; its path is relative to the project root
    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Queued files, in commit order
    #[must_use]
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// Absolute target of a queued file
    #[must_use]
    pub fn target(&self, file: &GeneratedFile) -> PathBuf {
        self.root.join(&file.path)
    }

    /// Check every target before anything is written
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Unwritable`] for the first target that is a
    /// directory, an existing read-only file, or whose nearest existing
    /// ancestor is not a writable directory.
    pub fn validate(&self) -> Result<()> {
        for file in &self.files {
            let target = self.target(file);
            if let Some(reason) = unwritable_reason(&target) {
                tracing::warn!(artifact = %file.artifact, path = %target.display(), %reason, "write plan rejected");
                return Err(ScaffoldError::Unwritable {
                    artifact: file.artifact,
                    path: target,
                    reason,
                });
            }
        }
        tracing::debug!(files = self.files.len(), "write plan validated");
        Ok(())
    }

    /// Write every queued file in order, creating parent directories
    ///
    /// Returns the absolute paths written.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Write`] naming the first artifact that could not
    /// be written. Files written before it are left in place.
    pub fn commit(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());

        for file in &self.files {
            let target = self.target(file);
            write_file(file.artifact, &target, &file.content)?;
            tracing::info!(artifact = %file.artifact, path = %target.display(), "wrote file");
            written.push(target);
        }

        Ok(written)
    }
}

fn write_file(artifact: ArtifactKind, target: &Path, content: &str) -> Result<()> {
    let to_error = |source: std::io::Error| ScaffoldError::Write {
        artifact,
        path: target.to_path_buf(),
        source,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(target, content).map_err(to_error)
}

/// Why `target` cannot be written, or `None` if it looks writable
fn unwritable_reason(target: &Path) -> Option<String> {
    if let Ok(metadata) = fs::metadata(target) {
        if metadata.is_dir() {
            return Some("target is a directory".to_string());
        }
        if metadata.permissions().readonly() {
            return Some("existing file is read-only".to_string());
        }
        return None;
    }

    let ancestor = target.ancestors().skip(1).find(|path| path.exists())?;
    match fs::metadata(ancestor) {
        Ok(metadata) if !metadata.is_dir() => {
            Some(format!("{} is not a directory", ancestor.display()))
        }
        Ok(metadata) if metadata.permissions().readonly() => {
            Some(format!("{} is not writable", ancestor.display()))
        }
        Ok(_) => None,
        Err(err) => Some(format!("cannot inspect {}: {err}", ancestor.display())),
    }
}
