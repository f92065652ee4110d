/// Launch module
///
/// This module starts the program that shows the image:
/// - The configured external editor (editor.rs)
/// - The OS default file-open action (opener.rs)
///
/// Launches are fire-and-forget. The child is reaped on a background thread so
/// it doesn't linger as a zombie, but its exit status is never looked at.

pub mod editor;
pub mod opener;

pub use editor::ExternalEditor;
pub use opener::{platform_opener, CommandOpener, DefaultOpener};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::warn;

use crate::error::LaunchError;

/// What ended up showing the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchedWith {
    Editor(PathBuf),
    DefaultOpener,
}

/// Open `file` in the editor if there is one, falling back to the OS opener
/// when there isn't or when the editor fails to start.
///
/// Only an opener failure is returned; editor failures are logged.
pub fn open_file(
    editor: Option<&ExternalEditor>,
    opener: &dyn DefaultOpener,
    file: &Path,
) -> Result<LaunchedWith, LaunchError> {
    if let Some(editor) = editor {
        match editor.launch(file) {
            Ok(()) => return Ok(LaunchedWith::Editor(editor.path().to_path_buf())),
            Err(e) => warn!("{e}; falling back to OS default opener"),
        }
    }

    opener.open(file)?;
    Ok(LaunchedWith::DefaultOpener)
}

/// Spawn without waiting for the child
pub(crate) fn spawn_detached(mut command: Command, program: &str) -> Result<(), LaunchError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const DETACHED_PROCESS: u32 = 0x0000_0008;
        command.creation_flags(DETACHED_PROCESS);
    }

    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let reaper = thread::Builder::new()
        .name("paint-tool-reaper".to_string())
        .spawn(move || {
            let _ = child.wait();
        });
    if let Err(e) = reaper {
        warn!("could not start reaper thread: {e}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl DefaultOpener for RecordingOpener {
        fn open(&self, path: &Path) -> Result<(), LaunchError> {
            self.opened.borrow_mut().push(path.to_path_buf());
            if self.fail {
                return Err(LaunchError::Spawn {
                    program: "recording".to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no opener"),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_no_editor_uses_opener() {
        let opener = RecordingOpener::default();
        let launched = open_file(None, &opener, Path::new("/exports/a.png")).unwrap();

        assert_eq!(launched, LaunchedWith::DefaultOpener);
        assert_eq!(*opener.opened.borrow(), vec![PathBuf::from("/exports/a.png")]);
    }

    #[test]
    #[cfg(unix)]
    fn test_unrunnable_editor_falls_back() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor");
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        // Located while present, gone by the time it is spawned
        let editor = ExternalEditor::locate(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let opener = RecordingOpener::default();
        let launched = open_file(Some(&editor), &opener, Path::new("a.png")).unwrap();

        assert_eq!(launched, LaunchedWith::DefaultOpener);
        assert_eq!(opener.opened.borrow().len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_working_editor_skips_opener() {
        let Some(editor) = ExternalEditor::locate(Path::new("/bin/true")) else {
            return;
        };
        let opener = RecordingOpener::default();

        let launched = open_file(Some(&editor), &opener, Path::new("a.png")).unwrap();

        assert_eq!(launched, LaunchedWith::Editor(PathBuf::from("/bin/true")));
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn test_opener_failure_is_returned() {
        let opener = RecordingOpener {
            fail: true,
            ..Default::default()
        };
        assert!(open_file(None, &opener, Path::new("a.png")).is_err());
    }
}
