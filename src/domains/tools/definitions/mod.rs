//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod echo_env;
pub mod system_info;

pub use echo_env::{EchoEnvVarsParams, EchoEnvVarsTool};
pub use system_info::{GetSystemInfoParams, GetSystemInfoTool, SystemInfo};
