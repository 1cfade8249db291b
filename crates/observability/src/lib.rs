//! Tracing/logging setup shared by every binary that embeds the catalog.
//!
//! Library crates only emit `tracing` events; the embedding binary calls
//! [`init`] (or [`init_with`]) once at startup to route them.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide JSON logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize process-wide logging in the given format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
