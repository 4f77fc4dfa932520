//! Audit sinks
//!
//! Every event is logged locally through `tracing`. When a remote log
//! service is configured, events are also queued on a bounded channel and
//! POSTed by a background task. A full queue or a failed delivery drops the
//! event.

mod forwarder;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, info, warn};

use crate::config::LogSinkConfig;
use crate::domain::{AuditEvent, AuditLevel, AuditSink, DomainError};

pub use forwarder::AuditForwarder;

fn log_locally(event: &AuditEvent) {
    match event.level {
        AuditLevel::Info => info!(target: "audit", context = %event.context, "{}", event.message),
        AuditLevel::Error => error!(target: "audit", context = %event.context, "{}", event.message),
    }
}

/// Sink that only writes to the local log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        log_locally(&event);
    }
}

/// Sink that logs locally and queues the event for remote delivery
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    sender: mpsc::Sender<AuditEvent>,
}

impl ChannelAuditSink {
    /// Create a sink and the receiving end of its queue
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl AuditSink for ChannelAuditSink {
    fn emit(&self, event: AuditEvent) {
        log_locally(&event);

        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(message = %event.message, "Audit queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(message = %event.message, "Audit forwarder stopped, dropping event");
            }
        }
    }
}

/// Build the audit sink described by the `log_sink` config section
///
/// Spawns the forwarder task when a URL is configured, so it must be called
/// from within a tokio runtime.
pub fn start_audit_sink(config: &LogSinkConfig) -> Result<Arc<dyn AuditSink>, DomainError> {
    let Some(url) = config.url.as_deref() else {
        info!("No log sink configured, audit events stay local");
        return Ok(Arc::new(TracingAuditSink));
    };

    let forwarder = AuditForwarder::new(
        url,
        &config.service,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let (sink, receiver) = ChannelAuditSink::channel(config.queue_capacity);

    info!(url = %url, service = %config.service, "Forwarding audit events");
    tokio::spawn(forwarder.run(receiver));

    Ok(Arc::new(sink))
}
