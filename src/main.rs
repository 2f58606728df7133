//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, announces startup and runs the
//! configured transport until it shuts down.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use sysinfo_mcp_server::core::telemetry::TelemetryForwarder;
use sysinfo_mcp_server::core::{Config, HostEnvironment, McpServer, ProcessHost, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.logging.level);

    let host = Arc::new(ProcessHost::new());
    log_banner(&config, host.as_ref());

    let telemetry = Arc::new(TelemetryForwarder::new(&config.telemetry));
    if telemetry.is_enabled() {
        info!("Telemetry forwarding enabled");
    }

    // Create the MCP server
    let server = McpServer::with_parts(config.clone(), host, telemetry)?;
    server.announce_startup();

    info!("Server initialized");

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Log the startup banner.
fn log_banner(config: &Config, host: &dyn HostEnvironment) {
    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Platform: {}, PID: {}, runtime: {}",
        host.platform(),
        host.process_id(),
        host.runtime_version()
    );
    match host.current_dir() {
        Ok(cwd) => info!("Working directory: {}", cwd.display()),
        Err(e) => info!("Working directory unavailable: {}", e),
    }
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so the stdio transport keeps stdout to itself.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
