//! Canonical invocation and result types, and the handler trait.
//!
//! Both transports translate their native requests into an [`Invocation`]
//! and read back an [`ExecutionResult`]; handlers never see the transport.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ErrorKind, ToolError};
use super::registry::ToolDefinition;
use crate::core::host::HostEnvironment;
use crate::core::telemetry::TelemetryEvent;

/// A JSON object of tool arguments.
pub type JsonObject = Map<String, Value>;

/// Which transport an invocation arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Stdio,
    Http,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to run a tool.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// The name of the tool to execute.
    pub tool_name: String,

    /// The arguments to pass to the tool.
    pub arguments: JsonObject,

    /// The transport the request came from.
    pub origin: Origin,

    /// Caller details such as client address or user agent.
    pub caller: Option<BTreeMap<String, String>>,
}

impl Invocation {
    pub fn new(tool_name: impl Into<String>, arguments: JsonObject, origin: Origin) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            origin,
            caller: None,
        }
    }

    /// Attach one caller metadata entry.
    pub fn with_caller(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.caller
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text of this block.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Output from a successful tool execution.
///
/// `content` is the block rendering used on the MCP channel; `payload` is
/// the raw value returned by the REST surface.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,

    pub payload: Value,

    /// Outcome event the executor forwards on success.
    pub event: Option<TelemetryEvent>,
}

impl ToolOutput {
    /// Output with a single text block.
    pub fn text(text: impl Into<String>, payload: Value) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            payload,
            event: None,
        }
    }

    /// Attach the success telemetry event.
    pub fn with_event(mut self, event: TelemetryEvent) -> Self {
        self.event = Some(event);
        self
    }
}

/// Transport-independent result of one invocation.
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    Success(ToolOutput),
    Failure(ToolError),
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure category, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e.kind()),
        }
    }

    pub fn into_result(self) -> Result<ToolOutput, ToolError> {
        match self {
            Self::Success(output) => Ok(output),
            Self::Failure(e) => Err(e),
        }
    }
}

impl From<Result<ToolOutput, ToolError>> for ExecutionResult {
    fn from(result: Result<ToolOutput, ToolError>) -> Self {
        match result {
            Ok(output) => Self::Success(output),
            Err(e) => Self::Failure(e),
        }
    }
}

/// Trait implemented by every registered tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and input schema of this tool.
    fn definition(&self) -> ToolDefinition;

    /// Validate the arguments and run the tool against `host`.
    async fn call(
        &self,
        arguments: &JsonObject,
        host: &dyn HostEnvironment,
    ) -> Result<ToolOutput, ToolError>;
}

/// Deserialize tool arguments into a typed parameter struct.
pub fn parse_arguments<T: DeserializeOwned>(arguments: &JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_block_shape() {
        let block = ContentBlock::text("hello");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "text", "text": "hello"})
        );
        assert_eq!(block.as_text(), "hello");
    }

    #[test]
    fn test_invocation_caller_metadata() {
        let invocation = Invocation::new("echo_env_vars", JsonObject::new(), Origin::Http)
            .with_caller("client_ip", "127.0.0.1")
            .with_caller("user_agent", "curl/8");
        let caller = invocation.caller.unwrap();
        assert_eq!(caller.len(), 2);
        assert_eq!(caller["client_ip"], "127.0.0.1");
    }

    #[test]
    fn test_execution_result_kind() {
        let failure = ExecutionResult::Failure(ToolError::not_found("x"));
        assert_eq!(failure.error_kind(), Some(ErrorKind::NotFound));
        assert!(!failure.is_success());

        let success: ExecutionResult = Ok(ToolOutput::text("ok", json!("ok"))).into();
        assert!(success.is_success());
        assert_eq!(success.error_kind(), None);
    }

    #[test]
    fn test_parse_arguments_reports_invalid() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Args {
            name: String,
        }

        let err = parse_arguments::<Args>(&JsonObject::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(Origin::Stdio.to_string(), "stdio");
        assert_eq!(
            serde_json::to_value(Origin::Http).unwrap(),
            json!("http")
        );
    }
}
