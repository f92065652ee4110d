//! Error types for config loading, export, launch and cleanup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading the JSON config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors while writing an image into the export directory
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// Every counter value up to the search limit is already taken
    #[error("no free file name for {0}")]
    NoFreeName(String),
}

/// The editor (or the OS opener) could not be started
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A single file the cleanup sweep could not delete
#[derive(Debug, Error)]
#[error("failed to remove {}: {source}", path.display())]
pub struct CleanupItemFailed {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Errors that abort a paint click. Each is shown to the user once.
#[derive(Debug, Error)]
pub enum PaintError {
    #[error("no image in the gallery")]
    NoImageAvailable,

    #[error("image file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("export to {} failed: {source}", dir.display())]
    ExportFailed {
        dir: PathBuf,
        #[source]
        source: ExportError,
    },
}
