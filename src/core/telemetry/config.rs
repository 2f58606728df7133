//! Telemetry configuration.

use serde::{Deserialize, Serialize};

/// Default delivery timeout for one telemetry POST.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the telemetry side-channel.
///
/// Forwarding is off unless a collector endpoint is configured, and the
/// startup environment snapshot is off unless explicitly requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Collector URL receiving JSON POSTs. `None` disables forwarding.
    pub endpoint: Option<String>,

    /// Source tag stamped on every event.
    pub source: String,

    /// Per-request delivery timeout in seconds.
    pub timeout_secs: u64,

    /// Include environment variable names and curated values in the
    /// startup event.
    pub include_environment: bool,

    /// Extra variable names added to the curated startup list.
    #[serde(default)]
    pub extra_env_vars: Vec<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            source: "sysinfo-mcp-server".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            include_environment: false,
            extra_env_vars: Vec::new(),
        }
    }
}

impl TelemetryConfig {
    /// Load telemetry config from `MCP_TELEMETRY_*` variables.
    ///
    /// `default_source` is used when `MCP_TELEMETRY_SOURCE` is unset,
    /// normally the server name.
    pub fn from_env(default_source: &str) -> Self {
        let endpoint = std::env::var("MCP_TELEMETRY_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let source =
            std::env::var("MCP_TELEMETRY_SOURCE").unwrap_or_else(|_| default_source.to_string());

        let timeout_secs = std::env::var("MCP_TELEMETRY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let include_environment = std::env::var("MCP_TELEMETRY_INCLUDE_ENV")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let extra_env_vars = std::env::var("MCP_TELEMETRY_ENV_VARS")
            .map(|v| parse_name_list(&v))
            .unwrap_or_default();

        Self {
            endpoint,
            source,
            timeout_secs,
            include_environment,
            extra_env_vars,
        }
    }

    /// Whether a collector endpoint is configured.
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Split a comma separated list of variable names.
fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::tests::ENV_TEST_LOCK;

    #[test]
    fn test_disabled_by_default() {
        let config = TelemetryConfig::default();
        assert!(!config.is_enabled());
        assert!(!config.include_environment);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_parse_name_list() {
        assert_eq!(parse_name_list(" A, B ,,C "), vec!["A", "B", "C"]);
        assert!(parse_name_list("").is_empty());
    }

    #[test]
    fn test_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("MCP_TELEMETRY_URL", "http://collector.local/events");
            std::env::set_var("MCP_TELEMETRY_TIMEOUT_SECS", "0");
            std::env::set_var("MCP_TELEMETRY_INCLUDE_ENV", "TRUE");
        }
        let config = TelemetryConfig::from_env("my-server");
        unsafe {
            std::env::remove_var("MCP_TELEMETRY_URL");
            std::env::remove_var("MCP_TELEMETRY_TIMEOUT_SECS");
            std::env::remove_var("MCP_TELEMETRY_INCLUDE_ENV");
        }

        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://collector.local/events")
        );
        assert_eq!(config.source, "my-server");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.include_environment);
    }
}
