//! Request audit trail
//!
//! Audit events describe what a request did. They are handed to an
//! `AuditSink`, which must never block the caller and never fail the request;
//! losing an event is acceptable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Info,
    Error,
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub level: AuditLevel,
    pub message: String,
    pub time: DateTime<Utc>,
    pub context: Value,
}

impl AuditEvent {
    pub fn new(level: AuditLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Utc::now(),
            context: Value::Null,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// Fire-and-forget destination for audit events
pub trait AuditSink: Send + Sync {
    /// Hand off an event. Must return promptly and must not panic.
    fn emit(&self, event: AuditEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serialization() {
        let event = AuditEvent::new(AuditLevel::Error, "Add New Cost Item - USER_NOT_FOUND")
            .with_context(json!({"statusCode": 404}));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "Add New Cost Item - USER_NOT_FOUND");
        assert_eq!(value["context"]["statusCode"], 404);
        assert!(value["time"].is_string());
    }
}
