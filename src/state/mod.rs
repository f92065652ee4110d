/// State module
///
/// This module holds the data the extension reads:
/// - Configuration loaded at startup (config.rs)
/// - Gallery snapshot and tab identifiers (gallery.rs)

pub mod config;
pub mod gallery;
