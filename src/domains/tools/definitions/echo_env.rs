//! Environment variable echo tool definition.
//!
//! Returns the raw value of one named variable, or `NOT SET`. Values are
//! returned as-is, without filtering.

use rmcp::handler::server::tool::cached_schema_for_type;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::host::HostEnvironment;
use crate::core::telemetry::TelemetryEvent;
use crate::domains::tools::handlers::{JsonObject, ToolHandler, ToolOutput, parse_arguments};
use crate::domains::tools::{ToolDefinition, ToolError};

/// Placeholder reported for absent (or empty) variables.
pub const NOT_SET: &str = "NOT SET";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the echo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoEnvVarsParams {
    /// Environment variable name to echo
    pub var_name: String,
}

impl EchoEnvVarsParams {
    /// Check the name is something the environment can hold.
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.var_name.trim().is_empty() {
            return Err(ToolError::invalid_arguments("'var_name' must not be empty"));
        }
        if self.var_name.contains('=') || self.var_name.contains('\0') {
            return Err(ToolError::invalid_arguments(format!(
                "'var_name' is not a valid environment variable name: {:?}",
                self.var_name
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Environment variable echo tool.
pub struct EchoEnvVarsTool;

impl EchoEnvVarsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "echo_env_vars";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Echo environment variables for debugging";

    /// Telemetry event emitted on success.
    pub const SUCCESS_EVENT: &'static str = "env_var_accessed";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(var_name = %params.var_name))]
    pub fn execute(
        params: &EchoEnvVarsParams,
        host: &dyn HostEnvironment,
    ) -> Result<ToolOutput, ToolError> {
        if let Err(e) = params.validate() {
            warn!("Rejected echo request: {}", e);
            return Err(e);
        }

        info!("Echo env var tool called for: {}", params.var_name);

        let value = host.var(&params.var_name).filter(|v| !v.is_empty());
        let is_set = value.is_some();
        let value = value.unwrap_or_else(|| NOT_SET.to_string());

        let event = TelemetryEvent::new(Self::SUCCESS_EVENT)
            .with("var_name", params.var_name.as_str())
            .with("is_set", is_set);

        Ok(ToolOutput::text(
            format!("Environment Variable {}: {}", params.var_name, value),
            Value::String(format!("{}: {}", params.var_name, value)),
        )
        .with_event(event))
    }
}

#[async_trait::async_trait]
impl ToolHandler for EchoEnvVarsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            cached_schema_for_type::<EchoEnvVarsParams>(),
        )
    }

    async fn call(
        &self,
        arguments: &JsonObject,
        host: &dyn HostEnvironment,
    ) -> Result<ToolOutput, ToolError> {
        let params: EchoEnvVarsParams = parse_arguments(arguments)?;
        Self::execute(&params, host)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::StaticHost;
    use crate::domains::tools::ErrorKind;
    use serde_json::json;

    fn params(name: &str) -> EchoEnvVarsParams {
        EchoEnvVarsParams {
            var_name: name.to_string(),
        }
    }

    #[test]
    fn test_echo_set_variable_verbatim() {
        let raw = "  spaced <value> & \"quotes\"  ";
        let host = StaticHost::new().with_var("MY_VAR", raw);

        let output = EchoEnvVarsTool::execute(&params("MY_VAR"), &host).unwrap();
        assert_eq!(
            output.content[0].as_text(),
            format!("Environment Variable MY_VAR: {}", raw)
        );
        assert_eq!(output.payload, json!(format!("MY_VAR: {}", raw)));
    }

    #[test]
    fn test_echo_missing_variable() {
        let output =
            EchoEnvVarsTool::execute(&params("DOES_NOT_EXIST_XYZ"), &StaticHost::new()).unwrap();
        assert_eq!(
            output.content[0].as_text(),
            "Environment Variable DOES_NOT_EXIST_XYZ: NOT SET"
        );
        assert_eq!(output.payload, json!("DOES_NOT_EXIST_XYZ: NOT SET"));
    }

    #[test]
    fn test_empty_value_reported_as_not_set() {
        let host = StaticHost::new().with_var("EMPTY", "");
        let output = EchoEnvVarsTool::execute(&params("EMPTY"), &host).unwrap();
        assert_eq!(output.payload, json!("EMPTY: NOT SET"));
    }

    #[test]
    fn test_event_omits_value() {
        let host = StaticHost::new().with_var("TOKEN_X", "abc123");
        let output = EchoEnvVarsTool::execute(&params("TOKEN_X"), &host).unwrap();
        let event = output.event.unwrap();

        assert_eq!(event.event, "env_var_accessed");
        assert_eq!(event.get("is_set"), Some(&json!(true)));
        assert!(!serde_json::to_string(&event).unwrap().contains("abc123"));
    }

    #[test]
    fn test_validation() {
        assert!(params("HOME").validate().is_ok());
        assert!(params("").validate().is_err());
        assert!(params("   ").validate().is_err());
        assert!(params("A=B").validate().is_err());
        assert!(params("A\0B").validate().is_err());
    }

    #[tokio::test]
    async fn test_missing_var_name_is_invalid_argument() {
        let err = EchoEnvVarsTool
            .call(&JsonObject::new(), &StaticHost::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_non_string_var_name_is_invalid_argument() {
        let mut args = JsonObject::new();
        args.insert("var_name".to_string(), json!(42));
        let err = EchoEnvVarsTool
            .call(&args, &StaticHost::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_schema_requires_var_name() {
        let def = EchoEnvVarsTool.definition();
        assert_eq!(def.name, "echo_env_vars");
        assert_eq!(def.input_schema.get("required"), Some(&json!(["var_name"])));
        assert!(def.input_schema["properties"]["var_name"].is_object());
    }
}
