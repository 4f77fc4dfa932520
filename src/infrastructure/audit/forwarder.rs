//! Delivery of audit events to the remote log service

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::{AuditEvent, DomainError};

/// Body accepted by the log service
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    service: &'a str,
    #[serde(flatten)]
    event: &'a AuditEvent,
}

/// POSTs audit events to the log service, one request per event
#[derive(Debug, Clone)]
pub struct AuditForwarder {
    http_client: Client,
    url: String,
    service: String,
}

impl AuditForwarder {
    pub fn new(
        url: impl Into<String>,
        service: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            service: service.into(),
        })
    }

    /// Deliver a single event. Failures are logged and swallowed.
    pub async fn forward(&self, event: &AuditEvent) {
        let entry = LogEntry {
            service: &self.service,
            event,
        };

        match self.http_client.post(&self.url).json(&entry).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(status = response.status().as_u16(), "Audit event delivered");
            }
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    message = %event.message,
                    "Log service rejected audit event"
                );
            }
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    "Request timed out".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    format!("Request failed: {}", e)
                };

                warn!(
                    error = %error_msg,
                    message = %event.message,
                    "Audit event delivery failed"
                );
            }
        }
    }

    /// Drain the queue until every sender is dropped
    pub async fn run(self, mut receiver: mpsc::Receiver<AuditEvent>) {
        while let Some(event) = receiver.recv().await {
            self.forward(&event).await;
        }

        debug!("Audit queue closed, forwarder stopping");
    }
}
