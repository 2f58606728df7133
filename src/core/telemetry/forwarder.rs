//! Best-effort delivery of telemetry events to a remote collector.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::{TelemetryConfig, TelemetryEvent};

/// Anything that accepts telemetry events.
///
/// `emit` must return immediately and must never fail; delivery problems
/// stay inside the sink.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The collector answered with a 2xx status.
    Delivered,
    /// No collector is configured.
    Disabled,
    /// Timeout, network error or non-2xx answer. The event was dropped.
    Dropped,
}

/// Forwards events to the configured collector with one HTTP POST each.
///
/// No retry, no queue: a failed event is logged and discarded.
#[derive(Clone)]
pub struct TelemetryForwarder {
    client: Option<reqwest::Client>,
    endpoint: Option<Arc<str>>,
    source: Arc<str>,
}

impl TelemetryForwarder {
    /// Build a forwarder from configuration.
    pub fn new(config: &TelemetryConfig) -> Self {
        let client = match config.endpoint {
            Some(_) => match reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
            {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("Telemetry disabled: failed to build HTTP client: {}", e);
                    None
                }
            },
            None => None,
        };

        Self {
            endpoint: client
                .as_ref()
                .and(config.endpoint.as_deref())
                .map(Arc::from),
            client,
            source: Arc::from(config.source.as_str()),
        }
    }

    /// A forwarder that drops everything.
    pub fn disabled() -> Self {
        Self::new(&TelemetryConfig::default())
    }

    /// Whether events leave the process at all.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some() && self.endpoint.is_some()
    }

    /// Deliver one event and wait for the collector (bounded by the timeout).
    ///
    /// Never returns an error; the outcome is reported for observability.
    #[instrument(skip_all, fields(event = %event.event))]
    pub async fn deliver(&self, mut event: TelemetryEvent) -> DeliveryOutcome {
        let (Some(client), Some(endpoint)) = (&self.client, &self.endpoint) else {
            debug!("Telemetry disabled, dropping event");
            return DeliveryOutcome::Disabled;
        };

        event.source = self.source.to_string();

        match client.post(&**endpoint).json(&event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Telemetry event delivered");
                DeliveryOutcome::Delivered
            }
            Ok(response) => {
                warn!(
                    "Telemetry collector rejected event: HTTP {}",
                    response.status()
                );
                DeliveryOutcome::Dropped
            }
            Err(e) if e.is_timeout() => {
                warn!("Telemetry delivery timed out: {}", e);
                DeliveryOutcome::Dropped
            }
            Err(e) => {
                warn!("Telemetry delivery failed: {}", e);
                DeliveryOutcome::Dropped
            }
        }
    }
}

impl TelemetrySink for TelemetryForwarder {
    /// Spawn delivery on the current runtime and return immediately.
    fn emit(&self, event: TelemetryEvent) {
        if !self.is_enabled() {
            debug!(event = %event.event, "Telemetry disabled, dropping event");
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let forwarder = self.clone();
                handle.spawn(async move {
                    forwarder.deliver(event).await;
                });
            }
            Err(_) => warn!(
                event = %event.event,
                "No async runtime available, dropping telemetry event"
            ),
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Kinds of the recorded events, oldest first.
    pub fn kinds(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event).collect()
    }
}

impl TelemetrySink for RecordingSink {
    fn emit(&self, event: TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
