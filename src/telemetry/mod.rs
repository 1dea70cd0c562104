//! Injected log sinks.
//!
//! The client never logs through a process-wide singleton. A [`LogSink`] is
//! handed to the builder and receives a [`ClientEvent`] at each request
//! boundary and for every non-fatal validation finding.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`TracingSink`] | Default: forwards events to `tracing` |
//! | [`NoopSink`] | Discards everything |
//! | [`MemorySink`] | Keeps events in memory, for tests |
//! | [`CompositeSink`] | Fans events out to several sinks |

use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    RequestStarted {
        method: &'static str,
        path: String,
    },
    RequestCompleted {
        method: &'static str,
        path: String,
        status: u16,
        elapsed_ms: u64,
    },
    /// Transport failure or classified non-success status.
    RequestFailed {
        method: &'static str,
        path: String,
        status: Option<u16>,
        message: String,
    },
    /// A rule that was reported instead of enforced.
    ValidationWarning { path: String, message: String },
}

pub trait LogSink: Send + Sync {
    fn record(&self, event: &ClientEvent);
}

/// Forwards events to `tracing` under the `notify_client` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, event: &ClientEvent) {
        match event {
            ClientEvent::RequestStarted { method, path } => {
                debug!(target: "notify_client", method, path = %path, "request started");
            }
            ClientEvent::RequestCompleted {
                method,
                path,
                status,
                elapsed_ms,
            } => {
                info!(target: "notify_client", method, path = %path, status, elapsed_ms, "request completed");
            }
            ClientEvent::RequestFailed {
                method,
                path,
                status,
                message,
            } => {
                warn!(target: "notify_client", method, path = %path, status = ?status, error = %message, "request failed");
            }
            ClientEvent::ValidationWarning { path, message } => {
                warn!(target: "notify_client", field = %path, "{}", message);
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn record(&self, _event: &ClientEvent) {}
}

/// In-memory sink for testing.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ClientEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ClientEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl LogSink for MemorySink {
    fn record(&self, event: &ClientEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Composite sink for multiple destinations.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl LogSink for CompositeSink {
    fn record(&self, event: &ClientEvent) {
        for s in &self.sinks {
            s.record(event);
        }
    }
}

pub fn tracing_sink() -> Arc<dyn LogSink> {
    Arc::new(TracingSink)
}

pub fn noop_sink() -> Arc<dyn LogSink> {
    Arc::new(NoopSink)
}
