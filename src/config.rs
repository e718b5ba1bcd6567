//! Configuration loading from `.env` files.

use std::env;

use anyhow::{Context, Result};

/// Default timeout for capability-resolution HTTP calls, in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Runtime settings derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Endpoint that resolves an LNURL to its advertised capabilities,
    /// e.g. `https://dufflepud.example.com/zapper/info`.
    pub zapper_info_url: String,
    /// Timeout applied to capability-resolution HTTP calls.
    pub http_timeout_secs: u64,
}

impl Settings {
    /// Load settings from the specified `.env` file.
    pub fn from_env(path: &str) -> Result<Self> {
        dotenvy::from_filename(path).context("reading env file")?;
        let zapper_info_url = env::var("ZAPPER_INFO_URL").context("ZAPPER_INFO_URL")?;
        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        Ok(Self {
            zapper_info_url,
            http_timeout_secs,
        })
    }
}
