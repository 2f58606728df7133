//! System information tool definition.
//!
//! Reports a fixed set of process and host facts. The `PATH` variable is
//! only reported as `SET` / `NOT SET`.

use rmcp::handler::server::tool::cached_schema_for_type;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::core::host::HostEnvironment;
use crate::core::telemetry::TelemetryEvent;
use crate::domains::tools::handlers::{JsonObject, ToolHandler, ToolOutput, parse_arguments};
use crate::domains::tools::{ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the system information tool (none accepted).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetSystemInfoParams {}

/// The rendered system facts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub platform: String,
    pub runtime_version: String,
    pub pid: u32,
    /// Seconds since the server started.
    pub uptime: f64,
    pub cwd: String,
    pub user: String,
    pub home: String,
    /// `SET` or `NOT SET`, never the value itself.
    pub path: &'static str,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// System information tool.
pub struct GetSystemInfoTool;

impl GetSystemInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_system_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get basic system information";

    /// Telemetry event emitted on success.
    pub const SUCCESS_EVENT: &'static str = "system_info_retrieved";

    /// Collect the system facts from `host`.
    pub fn collect(host: &dyn HostEnvironment) -> Result<SystemInfo, ToolError> {
        let cwd = host
            .current_dir()
            .map_err(|e| ToolError::internal(format!("Failed to read working directory: {}", e)))?;

        let path = match host.var("PATH") {
            Some(value) if !value.is_empty() => "SET",
            _ => "NOT SET",
        };

        Ok(SystemInfo {
            platform: host.platform(),
            runtime_version: host.runtime_version(),
            pid: host.process_id(),
            uptime: host.uptime().as_secs_f64(),
            cwd: cwd.display().to_string(),
            user: host.user(),
            home: host.home(),
            path,
        })
    }

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub fn execute(
        _params: &GetSystemInfoParams,
        host: &dyn HostEnvironment,
    ) -> Result<ToolOutput, ToolError> {
        info!("System info tool called");

        let info = Self::collect(host)?;
        let payload = serde_json::to_value(&info)
            .map_err(|e| ToolError::internal(format!("Failed to encode system info: {}", e)))?;
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|e| ToolError::internal(format!("Failed to render system info: {}", e)))?;

        let event = TelemetryEvent::new(Self::SUCCESS_EVENT)
            .with("platform", info.platform.as_str())
            .with("runtimeVersion", info.runtime_version.as_str())
            .with("pid", info.pid);

        Ok(ToolOutput::text(format!("System Information:\n{}", rendered), payload).with_event(event))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetSystemInfoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            cached_schema_for_type::<GetSystemInfoParams>(),
        )
    }

    async fn call(
        &self,
        arguments: &JsonObject,
        host: &dyn HostEnvironment,
    ) -> Result<ToolOutput, ToolError> {
        let params: GetSystemInfoParams = parse_arguments(arguments)?;
        Self::execute(&params, host)
    }
}

// ============================================================================
// Tests
// ============================================================================
