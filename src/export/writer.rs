//! Writes gallery images into the export directory
//!
//! Files are created with `create_new`, so two exports resolving to the same
//! name never overwrite each other: the second one moves on to the next
//! counter value.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageResult};
use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::naming::{NameContext, NamingTemplate};
use crate::error::ExportError;
use crate::state::config::{Config, ExportFormat};

/// Export settings resolved from [`Config`]
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    format: ExportFormat,
    jpeg_quality: u8,
    naming: String,
}

impl Exporter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dir: config.export_dir(),
            format: config.export_format,
            jpeg_quality: config.jpeg_quality(),
            naming: config.naming_template().to_string(),
        }
    }

    /// Directory exports are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encode an in-memory image in the configured format
    pub fn export_image(&self, img: &DynamicImage, ctx: &NameContext) -> Result<PathBuf, ExportError> {
        let (path, file) = self.create_unique(ctx, self.format.extension())?;

        let mut out = BufWriter::new(file);
        let written = encode(img, self.format, self.jpeg_quality, &mut out)
            .map_err(ExportError::from)
            .and_then(|()| out.flush().map_err(ExportError::from));

        if let Err(e) = written {
            drop(out);
            discard_partial(&path);
            return Err(e);
        }

        info!(
            path = %path.display(),
            format = ?self.format,
            width = img.width(),
            height = img.height(),
            "exported image"
        );
        Ok(path)
    }

    /// Copy a file-backed image byte for byte.
    ///
    /// The copy keeps the source extension; sources without one get the
    /// configured format's extension.
    pub fn copy_file(&self, src: &Path, ctx: &NameContext) -> Result<PathBuf, ExportError> {
        let mut source = File::open(src)?;

        let extension = src
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .unwrap_or(self.format.extension());

        let (path, file) = self.create_unique(ctx, extension)?;

        let mut out = BufWriter::new(file);
        let copied = io::copy(&mut source, &mut out).and_then(|bytes| out.flush().map(|()| bytes));

        match copied {
            Ok(bytes) => {
                info!(from = %src.display(), to = %path.display(), bytes, "copied image");
                Ok(path)
            }
            Err(e) => {
                drop(out);
                discard_partial(&path);
                Err(e.into())
            }
        }
    }

    /// Claim the first free candidate name in the export directory
    fn create_unique(&self, ctx: &NameContext, extension: &str) -> Result<(PathBuf, File), ExportError> {
        fs::create_dir_all(&self.dir)?;

        let template = NamingTemplate::new(&self.naming);
        for name in template.candidates(ctx, extension) {
            let path = self.dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(%name, "export name taken, trying next");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ExportError::NoFreeName(template.render(ctx, 0)))
    }
}

fn encode<W: Write>(img: &DynamicImage, format: ExportFormat, quality: u8, out: W) -> ImageResult<()> {
    match format {
        ExportFormat::Png => {
            let encoder = PngEncoder::new_with_quality(out, CompressionType::Best, FilterType::Adaptive);
            png_compatible(img).write_with_encoder(encoder)
        }
        ExportFormat::Jpg => {
            let encoder = JpegEncoder::new_with_quality(out, quality);
            jpeg_compatible(img).write_with_encoder(encoder)
        }
    }
}

/// PNG has no float samples; widen to 16-bit instead
fn png_compatible(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(img.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16())),
        _ => Cow::Borrowed(img),
    }
}

/// JPEG takes 8-bit gray or RGB only; alpha is dropped
fn jpeg_compatible(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(img),
        _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
    }
}

fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), "could not remove partial export: {e}");
    }
}
