//! Configuration loading and representation.
//!
//! All settings come from `TRENDSHELF_*` environment variables with defaults
//! suitable for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use trendshelf_ai::{HfModelLoader, HfSettings, LexiconModelLoader, ModelHandles};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which model backend scores uploads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModelBackend {
    Lexicon,
    HuggingFace,
    Disabled,
}

impl FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexicon" => Ok(Self::Lexicon),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            _ => Err("expected one of: lexicon, huggingface, disabled".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub model_backend: ModelBackend,
    pub hf: HfSettings,
    /// When set, every forecast request draws from an RNG seeded with this value.
    pub forecast_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            model_backend: ModelBackend::Lexicon,
            hf: HfSettings::default(),
            forecast_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("TRENDSHELF_BIND_ADDR") {
            cfg.bind_addr = v
                .trim()
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::invalid("TRENDSHELF_BIND_ADDR", &v, e.to_string()))?;
        }

        if let Some(v) = get("TRENDSHELF_MODEL_BACKEND") {
            cfg.model_backend = v
                .parse()
                .map_err(|e: String| ConfigError::invalid("TRENDSHELF_MODEL_BACKEND", &v, e))?;
        }

        if let Some(v) = get("TRENDSHELF_HF_BASE_URL") {
            cfg.hf.base_url = v.trim().to_string();
        }
        cfg.hf.token = get("TRENDSHELF_HF_TOKEN").map(|t| t.trim().to_string());

        if let Some(v) = get("TRENDSHELF_MODEL_TIMEOUT_MS") {
            let ms: u64 = v
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::invalid("TRENDSHELF_MODEL_TIMEOUT_MS", &v, e.to_string()))?;
            if ms == 0 {
                return Err(ConfigError::invalid("TRENDSHELF_MODEL_TIMEOUT_MS", &v, "must be positive"));
            }
            cfg.hf.timeout = Duration::from_millis(ms);
        }

        if let Some(v) = get("TRENDSHELF_FORECAST_SEED") {
            cfg.forecast_seed = Some(
                v.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::invalid("TRENDSHELF_FORECAST_SEED", &v, e.to_string()))?,
            );
        }

        if cfg.model_backend == ModelBackend::HuggingFace && cfg.hf.token.is_none() {
            warn!("TRENDSHELF_HF_TOKEN not set; remote inference will be anonymous and rate-limited");
        }

        Ok(cfg)
    }

    /// Model handles for the configured backend. Nothing is loaded until first use.
    pub fn model_handles(&self) -> ModelHandles {
        match self.model_backend {
            ModelBackend::Lexicon => ModelHandles::new(LexiconModelLoader),
            ModelBackend::HuggingFace => ModelHandles::new(HfModelLoader::new(self.hf.clone())),
            ModelBackend::Disabled => ModelHandles::disabled("disabled by TRENDSHELF_MODEL_BACKEND"),
        }
    }
}
