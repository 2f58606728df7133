//! Transport configuration types and run-mode selection.

use serde::{Deserialize, Serialize};

#[cfg(feature = "http")]
use crate::core::error::Error;
use crate::core::error::Result;

/// Default HTTP port when the mode is selected without an explicit port.
#[cfg(feature = "http")]
pub const DEFAULT_HTTP_PORT: u16 = 9090;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP REST transport.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            Self::Stdio
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            Self::Http(HttpConfig::default())
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            enable_cors: default_cors(),
        }
    }
}

/// The run mode requested by the environment, before feature gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedMode {
    Stdio,
    Http,
}

impl RequestedMode {
    /// Decide the run mode from an explicit mode value and an optional port.
    ///
    /// An explicit `stdio` or `http` wins; anything else falls back to
    /// inferring HTTP from the presence of a port.
    pub fn resolve(explicit: Option<&str>, port: Option<&str>) -> Self {
        match explicit.map(|m| m.trim().to_lowercase()).as_deref() {
            Some("http") => Self::Http,
            Some("stdio") => Self::Stdio,
            _ if port.is_some_and(|p| !p.trim().is_empty()) => Self::Http,
            _ => Self::Stdio,
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects the mode explicitly. Without it, the presence
    /// of `MCP_HTTP_PORT` or `PORT` selects HTTP mode.
    ///
    /// A port value that is present but not a valid port number is a
    /// configuration error.
    pub fn from_env() -> Result<Self> {
        let explicit = std::env::var("MCP_TRANSPORT").ok();
        let port = std::env::var("MCP_HTTP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok();

        match RequestedMode::resolve(explicit.as_deref(), port.as_deref()) {
            #[cfg(feature = "http")]
            RequestedMode::Http => {
                let port = match port {
                    Some(p) if !p.trim().is_empty() => p
                        .trim()
                        .parse()
                        .map_err(|_| Error::config(format!("Invalid HTTP port: {}", p)))?,
                    _ => DEFAULT_HTTP_PORT,
                };
                let enable_cors = std::env::var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                Ok(Self::Http(HttpConfig {
                    port,
                    host: default_host(),
                    enable_cors,
                }))
            }
            #[cfg(feature = "stdio")]
            RequestedMode::Stdio => Ok(Self::Stdio),
            #[allow(unreachable_patterns)]
            _ => Ok(Self::default()),
        }
    }

    /// Short name of the transport, used in telemetry and status payloads.
    pub fn mode_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "stdio",
            #[cfg(feature = "http")]
            Self::Http(_) => "http",
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}", cfg.host, cfg.port),
        }
    }
}
