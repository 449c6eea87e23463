//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable lines for local runs.
    Plain,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var("TRENDSHELF_LOG_JSON").ok().as_deref())
    }

    /// `0`, `false`, `no` and `off` select plain output; anything else keeps JSON.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Self::Plain,
            _ => Self::Json,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns `false` when one was already set.
pub fn init(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };
    installed.is_ok()
}
