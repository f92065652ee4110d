//! The paint button handler
//!
//! `PaintTool` is built once at startup from an immutable [`Config`]. Each
//! click is handled independently: pick the image, export it if needed, then
//! hand the file to the editor or the OS opener.

use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::error::{ExportError, PaintError};
use crate::export::{cleanup_exports, CleanupReport, Exporter, NameContext};
use crate::host::Notifier;
use crate::launch::{open_file, platform_opener, DefaultOpener, ExternalEditor, LaunchedWith};
use crate::state::config::Config;
use crate::state::gallery::{GalleryImage, GallerySelection, Tab};

/// Result of a successful click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    /// File handed to the editor or opener
    pub path: PathBuf,
    /// Whether `path` was written by this click
    pub exported: bool,
    /// `None` if both the editor and the OS opener failed to start
    pub launched: Option<LaunchedWith>,
}

pub struct PaintTool {
    config: Config,
    exporter: Exporter,
    editor: Option<ExternalEditor>,
    opener: Box<dyn DefaultOpener + Send + Sync>,
}

impl PaintTool {
    /// Build with the OS opener for this platform
    pub fn new(config: Config) -> Self {
        Self::with_opener(config, platform_opener())
    }

    pub fn with_opener(config: Config, opener: Box<dyn DefaultOpener + Send + Sync>) -> Self {
        let exporter = Exporter::from_config(&config);
        let editor = config.editor_path().and_then(ExternalEditor::locate);

        info!(
            export_dir = %exporter.dir().display(),
            editor = ?editor.as_ref().map(|e| e.path()),
            format = ?config.export_format,
            "paint tool ready"
        );

        Self {
            config,
            exporter,
            editor,
            opener,
        }
    }

    /// Host startup hook: load the config from its fixed location, build the
    /// tool and run the one-off export cleanup
    pub fn start() -> Self {
        let tool = Self::new(Config::load());
        tool.run_startup_cleanup();
        tool
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Startup cleanup of old exports; `None` when disabled in the config
    pub fn run_startup_cleanup(&self) -> Option<CleanupReport> {
        let max_age = self.config.cleanup_max_age()?;
        Some(cleanup_exports(self.exporter.dir(), max_age))
    }

    /// Click entry point for the host. Errors end up as one notification.
    pub fn on_paint_click(&self, selection: &GallerySelection, tab: Tab, notifier: &dyn Notifier) {
        match self.open_selected(selection, tab) {
            Ok(Opened { launched: None, path, .. }) => {
                notifier.warn(&format!("Could not open {} with any program", path.display()));
            }
            Ok(_) => {}
            Err(e) => {
                error!(%tab, "paint click failed: {e}");
                notifier.error(&e.to_string());
            }
        }
    }

    /// Resolve, export and launch using the current local time for `{datetime}`
    pub fn open_selected(&self, selection: &GallerySelection, tab: Tab) -> Result<Opened, PaintError> {
        self.open_selected_at(selection, tab, Local::now().naive_local())
    }

    /// [`PaintTool::open_selected`] with an explicit timestamp
    pub fn open_selected_at(
        &self,
        selection: &GallerySelection,
        tab: Tab,
        at: NaiveDateTime,
    ) -> Result<Opened, PaintError> {
        let selected = selection.resolve()?;
        let ctx = NameContext::new(at, tab, selected.index);

        let (path, exported) = match selected.image {
            GalleryImage::Memory(img) => (self.export(|| self.exporter.export_image(img, &ctx))?, true),
            GalleryImage::File(src) => {
                if !src.is_file() {
                    return Err(PaintError::MissingSource(src.clone()));
                }
                if self.config.always_export_copy {
                    (self.export(|| self.exporter.copy_file(src, &ctx))?, true)
                } else {
                    (src.clone(), false)
                }
            }
        };

        let launched = match open_file(self.editor.as_ref(), self.opener.as_ref(), &path) {
            Ok(launched) => Some(launched),
            Err(e) => {
                warn!(path = %path.display(), "could not open file: {e}");
                None
            }
        };

        Ok(Opened {
            path,
            exported,
            launched,
        })
    }

    fn export<F>(&self, write: F) -> Result<PathBuf, PaintError>
    where
        F: FnOnce() -> Result<PathBuf, ExportError>,
    {
        write().map_err(|source| PaintError::ExportFailed {
            dir: self.exporter.dir().to_path_buf(),
            source,
        })
    }
}
