//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] is the process-wide runtime state: configuration, the
//! immutable tool registry and the executor shared by both transports. It is
//! built once in `main` and handed by value to whichever transport runs.
//!
//! The MCP channel maps `tools/list` onto the registry and `tools/call` onto
//! the executor. The HTTP transport uses the same executor through
//! [`McpServer::execute`].

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::*,
    service::RequestContext,
};
use tracing::{info, instrument};

use super::config::Config;
use super::error;
use super::host::{HostEnvironment, ProcessHost};
use super::telemetry::{TelemetryForwarder, TelemetrySink, startup_event};
use crate::domains::tools::{
    ContentBlock, ErrorKind, ExecutionResult, Invocation, Origin, ToolDefinition, ToolError,
    ToolExecutor, ToolRegistry,
};

/// The main MCP server handler and runtime state.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Executor shared by every transport.
    executor: Arc<ToolExecutor>,

    /// Host accessors, also used for the startup event.
    host: Arc<dyn HostEnvironment>,

    /// Sink receiving every telemetry event.
    telemetry: Arc<dyn TelemetrySink>,
}

impl McpServer {
    /// Create a server against the live process, forwarding telemetry as
    /// configured.
    pub fn new(config: Config) -> error::Result<Self> {
        let telemetry = Arc::new(TelemetryForwarder::new(&config.telemetry));
        Self::with_parts(config, Arc::new(ProcessHost::new()), telemetry)
    }

    /// Create a server from explicit collaborators.
    pub fn with_parts(
        config: Config,
        host: Arc<dyn HostEnvironment>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> error::Result<Self> {
        let registry = Arc::new(ToolRegistry::builtin()?);
        let executor = Arc::new(ToolExecutor::new(registry, host.clone(), telemetry.clone()));

        Ok(Self {
            config: Arc::new(config),
            executor,
            host,
            telemetry,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// All tool definitions, in registration order.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.executor.registry().list()
    }

    /// Run one invocation through the shared executor.
    pub async fn execute(&self, invocation: Invocation) -> ExecutionResult {
        self.executor.execute(invocation).await
    }

    /// Emit the one-shot startup event without waiting for delivery.
    pub fn announce_startup(&self) {
        self.telemetry
            .emit(startup_event(&self.config, self.host.as_ref()));
    }
}

/// Map a canonical failure onto the MCP error envelope.
///
/// Only `NotFound` keeps a distinct code; everything else is an internal
/// error.
pub fn to_mcp_error(error: &ToolError) -> McpError {
    match error.kind() {
        ErrorKind::NotFound => McpError::new(ErrorCode::METHOD_NOT_FOUND, error.to_string(), None),
        ErrorKind::InvalidArgument | ErrorKind::InternalError => {
            McpError::internal_error(error.to_string(), None)
        }
    }
}

/// Map a canonical result onto an MCP tool result.
pub fn to_call_tool_result(result: ExecutionResult) -> Result<CallToolResult, McpError> {
    match result {
        ExecutionResult::Success(output) => Ok(CallToolResult::success(
            output
                .content
                .iter()
                .map(|block| match block {
                    ContentBlock::Text { text } => Content::text(text.clone()),
                })
                .collect(),
        )),
        ExecutionResult::Failure(e) => Err(to_mcp_error(&e)),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "This server exposes system information tools: get_system_info and echo_env_vars."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.list_tools().iter().map(ToolDefinition::to_tool).collect(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let invocation = Invocation::new(
            request.name.to_string(),
            request.arguments.unwrap_or_default(),
            Origin::Stdio,
        );
        to_call_tool_result(self.execute(invocation).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::StaticHost;
    use crate::core::telemetry::RecordingSink;
    use serde_json::json;

    fn server() -> (McpServer, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let server = McpServer::with_parts(
            Config::default(),
            Arc::new(StaticHost::new().with_var("PATH", "/bin")),
            sink.clone(),
        )
        .unwrap();
        (server, sink)
    }

    #[test]
    fn test_server_identity() {
        let (server, _) = server();
        assert_eq!(server.name(), "sysinfo-mcp-server");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
        assert!(server.get_info().capabilities.tools.is_some());
    }

    #[test]
    fn test_list_tools_exactly_two() {
        let (server, _) = server();
        let names: Vec<_> = server.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_system_info", "echo_env_vars"]);
    }

    #[test]
    fn test_not_found_maps_to_method_not_found() {
        let err = to_mcp_error(&ToolError::not_found("nope"));
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Unknown tool: nope");
    }

    #[test]
    fn test_other_failures_map_to_internal_error() {
        assert_eq!(
            to_mcp_error(&ToolError::invalid_arguments("bad")).code,
            ErrorCode::INTERNAL_ERROR
        );
        assert_eq!(
            to_mcp_error(&ToolError::internal("broken")).code,
            ErrorCode::INTERNAL_ERROR
        );
    }

    #[tokio::test]
    async fn test_call_result_wraps_text_blocks() {
        let (server, _) = server();
        let mut args = serde_json::Map::new();
        args.insert("var_name".to_string(), json!("DOES_NOT_EXIST_XYZ"));

        let result = to_call_tool_result(
            server
                .execute(Invocation::new("echo_env_vars", args, Origin::Stdio))
                .await,
        )
        .unwrap();

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(
            value["content"][0]["text"],
            "Environment Variable DOES_NOT_EXIST_XYZ: NOT SET"
        );
    }

    #[test]
    fn test_announce_startup() {
        let (server, sink) = server();
        server.announce_startup();
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "mcp_server_startup");
        assert_eq!(events[0].get("server"), Some(&json!("sysinfo-mcp-server")));
    }
}
