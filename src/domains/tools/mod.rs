//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients or over
//! the REST surface.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central tool registry and metadata
//! - `executor.rs` - Dispatch, failure normalization and telemetry
//! - `handlers.rs` - Canonical invocation/result types and the handler trait
//! - `error.rs` - Tool-specific error types
//!
//! Transports only ever talk to the [`ToolExecutor`].

pub mod definitions;
mod error;
mod executor;
pub mod handlers;
mod registry;

pub use error::{ErrorKind, ToolError};
pub use executor::ToolExecutor;
pub use handlers::{ContentBlock, ExecutionResult, Invocation, Origin, ToolHandler, ToolOutput};
pub use registry::{ToolDefinition, ToolRegistry};
