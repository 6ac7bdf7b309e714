//! Daemon configuration with TOML file support.

use std::path::Path;

use anyhow::Context;
use fairplay_requests::RequestConfig;
use fairplay_utils::LogFormat;
use serde::{Deserialize, Serialize};

/// Configuration for `fairplay-daemon run`.
///
/// ```toml
/// log_format = "json"
/// log_level = "info,fairplay_requests=debug"
/// secret_key_hex = "..."
///
/// [requests]
/// min_resolution_delay_ms = 5000
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// VRF secret key. A fresh key is generated per run when absent.
    #[serde(default)]
    pub secret_key_hex: Option<String>,

    #[serde(default)]
    pub requests: RequestConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("parsing daemon config")?;
        config.requests.validate()?;
        Ok(config)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            secret_key_hex: None,
            requests: RequestConfig::default(),
        }
    }
}
