//! Gallery model as seen by the extension
//!
//! The host UI owns the gallery; these types are a read-only snapshot of it
//! taken when the paint button is clicked.

use image::DynamicImage;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::PaintError;

/// Generation tab a gallery belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Txt2Img,
    Img2Img,
    Extras,
}

impl Tab {
    /// Every tab that gets a paint button
    pub const ALL: [Tab; 3] = [Tab::Txt2Img, Tab::Img2Img, Tab::Extras];

    /// Name used by the host in element ids and in `{tab}`
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Txt2Img => "txt2img",
            Tab::Img2Img => "img2img",
            Tab::Extras => "extras",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for tab names the extension doesn't handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt2img" => Ok(Tab::Txt2Img),
            "img2img" => Ok(Tab::Img2Img),
            "extras" => Ok(Tab::Extras),
            other => Err(UnknownTab(other.to_string())),
        }
    }
}

/// A single gallery entry
#[derive(Debug, Clone)]
pub enum GalleryImage {
    /// Already persisted by the host
    File(PathBuf),
    /// Only exists in memory; must be exported before it can be opened
    Memory(DynamicImage),
}

impl GalleryImage {
    /// Build from a host file reference, dropping any `?query` suffix the
    /// gallery appends for cache busting
    pub fn from_reference(reference: &str) -> Self {
        GalleryImage::File(PathBuf::from(strip_query(reference)))
    }

    /// Path on disk, if the image has one
    pub fn backing_path(&self) -> Option<&Path> {
        match self {
            GalleryImage::File(path) => Some(path),
            GalleryImage::Memory(_) => None,
        }
    }
}

fn strip_query(reference: &str) -> &str {
    reference.split_once('?').map_or(reference, |(path, _)| path)
}

/// Gallery contents plus the highlighted index, if any
#[derive(Debug, Clone, Default)]
pub struct GallerySelection {
    pub images: Vec<GalleryImage>,
    pub selected: Option<usize>,
}

/// The image a click acts on
#[derive(Debug, Clone, Copy)]
pub struct SelectedImage<'a> {
    pub index: usize,
    pub image: &'a GalleryImage,
}

impl GallerySelection {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            selected: None,
        }
    }

    pub fn with_selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Pick the highlighted image, or the first one when nothing (or an
    /// out-of-range index) is highlighted
    pub fn resolve(&self) -> Result<SelectedImage<'_>, PaintError> {
        if self.images.is_empty() {
            return Err(PaintError::NoImageAvailable);
        }

        let index = self
            .selected
            .filter(|&i| i < self.images.len())
            .unwrap_or(0);

        Ok(SelectedImage {
            index,
            image: &self.images[index],
        })
    }
}
