//! Request service configuration with TOML file support.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::RequestError;

/// Timing and retention settings for the request service.
///
/// Can be loaded from a TOML file via [`RequestConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// How often the monitor polls pending requests.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// No request resolves before this much time has passed since submission.
    #[serde(default = "default_min_resolution_delay_ms")]
    pub min_resolution_delay_ms: u64,

    /// Requests still pending after this long fail with a timeout.
    #[serde(default = "default_max_resolution_delay_ms")]
    pub max_resolution_delay_ms: u64,

    /// How long finished requests stay queryable.
    #[serde(default = "default_audit_retention_secs")]
    pub audit_retention_secs: u64,

    /// Buffer size of the lifecycle event channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Proving slower than this is logged as a warning.
    #[serde(default = "default_prove_budget_us")]
    pub prove_budget_us: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_min_resolution_delay_ms() -> u64 {
    5_000
}

fn default_max_resolution_delay_ms() -> u64 {
    30_000
}

fn default_audit_retention_secs() -> u64 {
    3_600
}

fn default_event_channel_capacity() -> usize {
    256
}

fn default_prove_budget_us() -> u64 {
    2_000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RequestConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RequestError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, RequestError> {
        let config: Self = toml::from_str(s).map_err(|e| RequestError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, RequestError> {
        toml::to_string_pretty(self).map_err(|e| RequestError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.poll_interval_ms == 0 {
            return Err(RequestError::Config("poll_interval_ms must be positive".into()));
        }
        if self.min_resolution_delay_ms >= self.max_resolution_delay_ms {
            return Err(RequestError::Config(format!(
                "min_resolution_delay_ms ({}) must be below max_resolution_delay_ms ({})",
                self.min_resolution_delay_ms, self.max_resolution_delay_ms
            )));
        }
        if self.event_channel_capacity == 0 {
            return Err(RequestError::Config("event_channel_capacity must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn prove_budget(&self) -> Duration {
        Duration::from_micros(self.prove_budget_us)
    }

    pub fn audit_retention_ms(&self) -> u64 {
        self.audit_retention_secs.saturating_mul(1000)
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            min_resolution_delay_ms: default_min_resolution_delay_ms(),
            max_resolution_delay_ms: default_max_resolution_delay_ms(),
            audit_retention_secs: default_audit_retention_secs(),
            event_channel_capacity: default_event_channel_capacity(),
            prove_budget_us: default_prove_budget_us(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = RequestConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = RequestConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = RequestConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.poll_interval_ms, 1_000);
        assert_eq!(config.min_resolution_delay_ms, 5_000);
        assert_eq!(config.max_resolution_delay_ms, 30_000);
        assert_eq!(config.audit_retention_secs, 3_600);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            poll_interval_ms = 250
            max_resolution_delay_ms = 10000
        "#;
        let config = RequestConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_resolution_delay_ms, 10_000);
        assert_eq!(config.min_resolution_delay_ms, 5_000); // default
    }

    #[test]
    fn floor_must_be_below_ceiling() {
        let toml = r#"
            min_resolution_delay_ms = 30000
            max_resolution_delay_ms = 30000
        "#;
        assert!(matches!(
            RequestConfig::from_toml_str(toml),
            Err(RequestError::Config(_))
        ));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        assert!(RequestConfig::from_toml_str("poll_interval_ms = 0").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_resolution_delay_ms = 100").unwrap();
        writeln!(file, "max_resolution_delay_ms = 900").unwrap();
        let config = RequestConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.min_resolution_delay_ms, 100);
        assert_eq!(config.max_resolution_delay_ms, 900);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = RequestConfig::from_toml_file("/nonexistent/fairplay.toml");
        assert!(matches!(result, Err(RequestError::Config(_))));
    }
}
