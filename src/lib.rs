//! System information MCP server library.
//!
//! This crate exposes a small fixed set of diagnostic tools over two
//! transports: MCP over stdio and a REST surface over HTTP. Every call goes
//! through one executor that normalizes failures and reports telemetry.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, host access, telemetry, the
//!   server runtime state and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool definitions, registry and executor
//!
//! # Example
//!
//! ```rust,no_run
//! use sysinfo_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
