//! Process-wide logging setup shared by the service binary and tools.

/// Initialize process-wide tracing with the format chosen by `TRENDSHELF_LOG_JSON`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber construction (filter + fmt layer).
pub mod tracing;

pub use self::tracing::LogFormat;
