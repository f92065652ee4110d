//! The configured external paint program

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use super::spawn_detached;
use crate::error::LaunchError;

/// An editor executable that existed when the config was read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    path: PathBuf,
}

impl ExternalEditor {
    /// `None` when `path` is missing or not executable; the caller should use
    /// the OS default opener instead
    pub fn locate(path: &Path) -> Option<Self> {
        if is_executable(path) {
            Some(Self {
                path: path.to_path_buf(),
            })
        } else {
            warn!(editor = %path.display(), "editor_path is not an executable file, using OS default opener");
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start the editor with `file` as its only argument
    pub fn launch(&self, file: &Path) -> Result<(), LaunchError> {
        info!(editor = %self.path.display(), file = %file.display(), "launching editor");

        let mut command = Command::new(&self.path);
        command.arg(file);
        spawn_detached(command, &self.path.to_string_lossy())
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_editor() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExternalEditor::locate(&dir.path().join("krita")).is_none());
    }

    #[test]
    fn test_directory_is_not_an_editor() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExternalEditor::locate(dir.path()).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_requires_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor");
        fs::write(&path, b"#!/bin/sh\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(ExternalEditor::locate(&path).is_none());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(ExternalEditor::locate(&path).unwrap().path(), path);
    }
}
