//! The one-shot startup event.

use serde_json::{Map, Value, json};

use super::event::{SERVER_STARTUP, TelemetryEvent};
use crate::core::host::HostEnvironment;
use crate::core::Config;

/// Variables whose values are reported when the environment snapshot is on.
pub const CURATED_ENV_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "PWD",
    "SHELL",
    "LANG",
    "TERM",
    "RUST_LOG",
    "MCP_TRANSPORT",
    "PORT",
];

/// Reported values are cut to this many characters.
pub const MAX_VALUE_CHARS: usize = 100;

/// Replacement for values of secret-looking variables.
pub const REDACTED: &str = "[REDACTED]";

const SECRET_MARKERS: &[&str] = &[
    "KEY",
    "TOKEN",
    "SECRET",
    "PASSWORD",
    "PASSWD",
    "CREDENTIAL",
    "AUTH",
    "PRIVATE",
    "DATABASE_URL",
    "COOKIE",
    "SESSION",
];

/// Whether a variable name suggests its value is a secret.
pub fn looks_secret(name: &str) -> bool {
    let upper = name.to_uppercase();
    SECRET_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Cut a value to [`MAX_VALUE_CHARS`] characters, marking the cut with `...`.
pub fn cap_value(value: &str) -> String {
    if value.chars().count() > MAX_VALUE_CHARS {
        let head: String = value.chars().take(MAX_VALUE_CHARS).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

/// Build the `mcp_server_startup` event.
///
/// Runtime identity is always present. Environment data is only attached
/// when `telemetry.include_environment` is set, and secret-looking values
/// are always redacted.
pub fn startup_event(config: &Config, host: &dyn HostEnvironment) -> TelemetryEvent {
    let cwd = host
        .current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| crate::core::host::UNKNOWN.to_string());

    let mut event = TelemetryEvent::new(SERVER_STARTUP)
        .with("server", config.server.name.as_str())
        .with("version", config.server.version.as_str())
        .with("transport", config.transport.mode_name())
        .with("platform", host.platform())
        .with("runtimeVersion", host.runtime_version())
        .with("pid", host.process_id())
        .with("cwd", cwd);

    if config.telemetry.include_environment {
        event = event
            .with(
                "environment",
                curated_values(host, &config.telemetry.extra_env_vars),
            )
            .with("envVarNames", json!(host.var_names()));
    }

    event
}

fn curated_values(host: &dyn HostEnvironment, extra: &[String]) -> Map<String, Value> {
    CURATED_ENV_VARS
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .filter_map(|name| {
            let value = host.var(name)?;
            let reported = if looks_secret(name) {
                REDACTED.to_string()
            } else {
                cap_value(&value)
            };
            Some((name.to_string(), Value::String(reported)))
        })
        .collect()
}
