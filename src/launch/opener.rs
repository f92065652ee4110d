//! OS default "open this file" action
//!
//! Picked once at startup for the current platform and handed to the click
//! handler as a `DefaultOpener`.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::info;

use super::spawn_detached;
use crate::error::LaunchError;

/// Opens a file with whatever application the OS associates with it
pub trait DefaultOpener {
    fn open(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Opener that shells out to the platform's launcher command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOpener {
    program: &'static str,
    leading_args: &'static [&'static str],
}

impl CommandOpener {
    /// `explorer.exe <path>` hands the file to ShellExecute without going
    /// through cmd.exe, so `&`, `^` and `%VAR%` in the path stay literal
    pub const WINDOWS: Self = Self {
        program: "explorer.exe",
        leading_args: &[],
    };

    pub const MACOS: Self = Self {
        program: "open",
        leading_args: &[],
    };

    pub const FREEDESKTOP: Self = Self {
        program: "xdg-open",
        leading_args: &[],
    };

    #[cfg(windows)]
    pub fn platform() -> Self {
        Self::WINDOWS
    }

    #[cfg(target_os = "macos")]
    pub fn platform() -> Self {
        Self::MACOS
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    pub fn platform() -> Self {
        Self::FREEDESKTOP
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Arguments passed to the launcher; the path is always the last, single argument
    pub fn args<'a>(&self, path: &'a Path) -> Vec<&'a OsStr> {
        self.leading_args
            .iter()
            .map(OsStr::new)
            .chain(std::iter::once(path.as_os_str()))
            .collect()
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(self.program);
        command.args(self.args(path));
        command
    }
}

impl DefaultOpener for CommandOpener {
    fn open(&self, path: &Path) -> Result<(), LaunchError> {
        info!(program = self.program, path = %path.display(), "opening with OS default");

        spawn_detached(self.command(path), self.program)
    }
}

/// The opener for the platform this binary was built for
pub fn platform_opener() -> Box<dyn DefaultOpener + Send + Sync> {
    Box::new(CommandOpener::platform())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(all(unix, not(target_os = "macos")))]
    fn test_linux_uses_xdg_open() {
        assert_eq!(CommandOpener::platform().program(), "xdg-open");
    }

    #[test]
    #[cfg(windows)]
    fn test_windows_platform_opener() {
        assert_eq!(CommandOpener::platform(), CommandOpener::WINDOWS);
    }

    #[test]
    fn test_windows_path_with_shell_metacharacters_is_one_argument() {
        let path = Path::new(r"C:\out\a&b %TEMP% ^c.png");
        let opener = CommandOpener::WINDOWS;

        assert_eq!(opener.program(), "explorer.exe");
        assert_eq!(opener.args(path), vec![path.as_os_str()]);

        let command = opener.command(path);
        assert_eq!(command.get_program(), "explorer.exe");
        assert_eq!(command.get_args().collect::<Vec<_>>(), vec![path.as_os_str()]);
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let opener = CommandOpener {
            program: "paint-tool-no-such-opener",
            leading_args: &[],
        };
        let result = opener.open(Path::new("image.png"));
        assert!(matches!(result, Err(LaunchError::Spawn { .. })));
    }
}
