//! Telemetry side-channel.
//!
//! Events are emitted around every tool invocation and once at startup.
//! Delivery is fire-and-forget: a slow or missing collector never changes
//! what a caller receives.

mod config;
pub mod event;
mod forwarder;
pub mod startup;

pub use config::TelemetryConfig;
pub use event::TelemetryEvent;
pub use forwarder::{DeliveryOutcome, RecordingSink, TelemetryForwarder, TelemetrySink};
pub use startup::startup_event;
