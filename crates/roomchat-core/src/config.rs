//! Widget configuration.

use serde::Deserialize;
use std::num::NonZeroUsize;

/// Values the host page injects at startup. Read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    endpoint_url: String,
    history_cap: NonZeroUsize,
    asset_prefix: String,
}

#[derive(Deserialize)]
struct RawConfig {
    endpoint_url: String,
    history_cap: usize,
    #[serde(default)]
    asset_prefix: String,
}

impl Config {
    /// Validate and build a configuration.
    ///
    /// A history cap of zero is rejected rather than producing a window
    /// that can never show anything.
    pub fn new(
        endpoint_url: impl Into<String>,
        history_cap: usize,
        asset_prefix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint_url = endpoint_url.into();
        if endpoint_url.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        let history_cap = NonZeroUsize::new(history_cap).ok_or(ConfigError::ZeroHistoryCap)?;
        Ok(Self {
            endpoint_url,
            history_cap,
            asset_prefix: asset_prefix.into(),
        })
    }

    /// Parse a TOML document with `endpoint_url`, `history_cap` and
    /// `asset_prefix` keys.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(s)?;
        Self::new(raw.endpoint_url, raw.history_cap, raw.asset_prefix)
    }

    /// Connection target.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Maximum number of visible messages.
    pub fn history_cap(&self) -> NonZeroUsize {
        self.history_cap
    }

    /// Host prefix identifying hosted-image URLs.
    pub fn asset_prefix(&self) -> &str {
        &self.asset_prefix
    }
}

/// Invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("endpoint url is empty")]
    MissingEndpoint,
    #[error("history cap must be at least 1")]
    ZeroHistoryCap,
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}
