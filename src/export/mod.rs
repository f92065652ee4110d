/// Export module
///
/// This module handles everything written to the export directory:
/// - Resolving the naming template to a unique file name (naming.rs)
/// - Encoding in-memory images and copying file-backed ones (writer.rs)
/// - Deleting old exports at startup (cleanup.rs)

pub mod cleanup;
pub mod naming;
pub mod writer;

pub use cleanup::{cleanup_exports, CleanupReport};
pub use naming::{NameContext, NamingTemplate};
pub use writer::Exporter;
