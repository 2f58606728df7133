//! Telemetry event records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Event emitted before every tool dispatch.
pub const TOOL_CALLED: &str = "tool_called";

/// Event emitted when an invocation fails for any reason.
pub const TOOL_ERROR: &str = "tool_error";

/// Event emitted once when the server process starts.
pub const SERVER_STARTUP: &str = "mcp_server_startup";

/// A single telemetry record.
///
/// Serializes flat as `{timestamp, source, event, ...payload}`. The source
/// tag is stamped by the forwarder at delivery time.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    pub timestamp: DateTime<Utc>,

    pub source: String,

    pub event: String,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TelemetryEvent {
    /// Create an event of the given kind, timestamped now.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            source: String::new(),
            event: event.into(),
            payload: Map::new(),
        }
    }

    /// Builder-style payload field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Payload lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}
