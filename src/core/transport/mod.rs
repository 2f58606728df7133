//! Transport layer for the MCP server.
//!
//! This module provides two transport implementations:
//! - **STDIO**: MCP over standard input/output (default) - feature: `stdio`
//! - **HTTP**: REST surface over the same executor - feature: `http`
//!
//! Each transport only translates between its wire format and the canonical
//! invocation/result types; dispatch lives in the tools domain.
//!
//! # Feature Flags
//!
//! - `stdio` (default): STDIO transport - minimal dependencies
//! - `http` (default): HTTP transport - adds axum, tower, tower-http

mod config;
mod error;
mod service;
mod shutdown;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::{RequestedMode, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::{DEFAULT_HTTP_PORT, HttpConfig};
