//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default mode. Runs until
//! the client closes stdin or the process is interrupted.

use std::future::Future;

use rmcp::{
    RoleServer, ServiceExt,
    service::{QuitReason, RunningService},
};
use tracing::info;

use super::shutdown::shutdown_signal;
use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = run_until(service, shutdown_signal()).await?;
        info!("STDIO service closed: {:?}", reason);

        info!("STDIO transport finished");
        Ok(())
    }
}

/// Wait for the service to end on its own, or cancel it once `shutdown`
/// resolves and wait for the channel to close.
pub(crate) async fn run_until(
    service: RunningService<RoleServer, McpServer>,
    shutdown: impl Future<Output = ()>,
) -> TransportResult<QuitReason> {
    let cancel = service.cancellation_token();
    let waiting = service.waiting();
    tokio::pin!(waiting);

    let finished = tokio::select! {
        result = &mut waiting => Some(result),
        _ = shutdown => None,
    };
    let result = match finished {
        Some(result) => result,
        None => {
            cancel.cancel();
            waiting.await
        }
    };
    result.map_err(|e| TransportError::service(e.to_string()))
}
