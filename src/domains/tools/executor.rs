//! Tool Executor - the single dispatch path shared by every transport.
//!
//! Each invocation is wrapped in telemetry: `tool_called` before dispatch and
//! one outcome event after. No failure ever escapes as anything but an
//! [`ExecutionResult::Failure`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::error::ToolError;
use super::handlers::{ExecutionResult, Invocation};
use super::registry::ToolRegistry;
use crate::core::host::HostEnvironment;
use crate::core::telemetry::event::{TOOL_CALLED, TOOL_ERROR};
use crate::core::telemetry::{TelemetryEvent, TelemetrySink};

/// Event kind used when a handler does not name its own success event.
pub const TOOL_COMPLETED: &str = "tool_completed";

/// Runs invocations against the registry.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    host: Arc<dyn HostEnvironment>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl ToolExecutor {
    pub fn new(
        registry: Arc<ToolRegistry>,
        host: Arc<dyn HostEnvironment>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            registry,
            host,
            telemetry,
        }
    }

    /// The registry this executor dispatches against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute one invocation.
    #[instrument(skip_all, fields(tool = %invocation.tool_name, origin = %invocation.origin))]
    pub async fn execute(&self, invocation: Invocation) -> ExecutionResult {
        self.telemetry.emit(called_event(&invocation));

        let result = self.dispatch(&invocation).await;

        let outcome = match &result {
            ExecutionResult::Success(output) => {
                info!("Tool {} completed", invocation.tool_name);
                output
                    .event
                    .clone()
                    .unwrap_or_else(|| TelemetryEvent::new(TOOL_COMPLETED))
                    .with("tool", invocation.tool_name.as_str())
                    .with("transport", invocation.origin.as_str())
            }
            ExecutionResult::Failure(e) => {
                warn!("Tool {} failed: {}", invocation.tool_name, e);
                TelemetryEvent::new(TOOL_ERROR)
                    .with("tool", invocation.tool_name.as_str())
                    .with("transport", invocation.origin.as_str())
                    .with("kind", e.kind().as_str())
                    .with("error", e.to_string())
            }
        };
        self.telemetry.emit(outcome);

        result
    }

    async fn dispatch(&self, invocation: &Invocation) -> ExecutionResult {
        let Some(handler) = self.registry.handler(&invocation.tool_name) else {
            warn!("Unknown tool requested: {}", invocation.tool_name);
            return ExecutionResult::Failure(ToolError::not_found(&invocation.tool_name));
        };

        let call = handler.call(&invocation.arguments, self.host.as_ref());
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result.into(),
            Err(panic) => ExecutionResult::Failure(ToolError::internal(panic_message(panic))),
        }
    }
}

fn called_event(invocation: &Invocation) -> TelemetryEvent {
    let mut event = TelemetryEvent::new(TOOL_CALLED)
        .with("tool", invocation.tool_name.as_str())
        .with("transport", invocation.origin.as_str())
        .with("arguments", Value::Object(invocation.arguments.clone()));
    if let Some(caller) = &invocation.caller {
        event = event.with("caller", json!(caller));
    }
    event
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("Tool handler panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("Tool handler panicked: {}", msg)
    } else {
        "Tool handler panicked".to_string()
    }
}
