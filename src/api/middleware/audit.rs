//! Audit trail middleware
//!
//! Emits one `AuditEvent` per request once the response is ready. The event
//! message is `"{action} - {error id or status code}"`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Method, Request, Uri},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use super::logging::RequestId;
use crate::api::types::ErrorCode;
use crate::domain::{AuditEvent, AuditLevel, AuditSink};

pub async fn audit_middleware(
    State(audit): State<Arc<dyn AuditSink>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request.extensions().get::<RequestId>().map(|id| id.0.clone());

    let response = next.run(request).await;

    let status = response.status();
    let outcome = response
        .extensions()
        .get::<ErrorCode>()
        .map(|code| code.to_string())
        .unwrap_or_else(|| status.as_u16().to_string());
    let level = if status.as_u16() >= 400 {
        AuditLevel::Error
    } else {
        AuditLevel::Info
    };

    let event = AuditEvent::new(level, format!("{} - {}", describe_action(&method, &uri), outcome))
        .with_context(json!({
            "method": method.as_str(),
            "url": uri.to_string(),
            "statusCode": status.as_u16(),
            "durationMs": start.elapsed().as_millis() as u64,
            "requestId": request_id,
        }));
    audit.emit(event);

    response
}

/// Human-readable description of what a request asked for
pub fn describe_action(method: &Method, uri: &Uri) -> String {
    let path = uri.path().to_lowercase();

    if method == Method::GET && path.contains("/report") {
        let params = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map(|Query(params)| params)
            .unwrap_or_default();

        format!(
            "Generate Report for User {} ({}/{})",
            query_value(&params, "id"),
            query_value(&params, "month"),
            query_value(&params, "year")
        )
    } else if method == Method::POST && path.contains("/add") {
        "Add New Cost Item".to_string()
    } else {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        format!("{} {}", method, target)
    }
}

fn query_value<'a>(params: &'a HashMap<String, String>, name: &str) -> &'a str {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .unwrap_or("unknown")
}
