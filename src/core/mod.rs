//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, host access, telemetry, server
//! runtime state and transport layer abstractions.

pub mod config;
pub mod error;
pub mod host;
pub mod server;
pub mod telemetry;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use host::{HostEnvironment, ProcessHost};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
