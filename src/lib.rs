//! Paint button for image-generation web UIs
//!
//! Adds a button under the txt2img, img2img and extras galleries that opens the
//! selected image (or the first one) in an external paint program. Images that
//! only exist in memory are exported first. Old exports are removed once at
//! startup.
//!
//! A host typically calls [`logging::init`] and [`PaintTool::start`] once, feeds
//! every created component through a [`host::ButtonInjector`], and routes paint
//! button clicks to [`PaintTool::on_paint_click`].

pub mod error;
pub mod export;
pub mod host;
pub mod launch;
pub mod logging;
pub mod state;
pub mod tool;

pub use error::{CleanupItemFailed, ConfigError, ExportError, LaunchError, PaintError};
pub use state::config::{Config, ExportFormat};
pub use state::gallery::{GalleryImage, GallerySelection, Tab};
pub use tool::{Opened, PaintTool};
