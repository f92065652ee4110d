//! Tracing subscriber setup for hosts that don't install their own.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "paint_tool=info";

/// Install a global fmt subscriber.
///
/// The host may already have one installed; in that case this is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
