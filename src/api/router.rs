use std::any::Any;

use axum::{
    extract::OriginalUri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use super::costs;
use super::health;
use super::middleware::{audit_middleware, logging_middleware};
use super::state::AppState;
use super::types::ApiError;

/// Create the full router with application state
///
/// Layer order, outermost first: tracing, request logging, audit, panic
/// recovery. Panics therefore still produce an audited `server_error`.
pub fn create_router_with_state(state: AppState) -> Router {
    let audit = state.audit.clone();

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Cost API
        .nest("/api", costs::create_costs_router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(audit, audit_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Fallback for unmatched routes and methods
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::route_not_found(format!("Route {} not found", uri.path()))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Handler panicked");
    ApiError::uncaught("Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::state::CostServiceTrait;
    use crate::config::BackdatingPolicy;
    use crate::domain::{
        AuditEvent, AuditLevel, AuditSink, CostItem, DomainError, FixedClock, UserId,
    };
    use crate::infrastructure::cost::InMemoryCostRepository;
    use crate::infrastructure::report::InMemoryReportRepository;
    use crate::infrastructure::services::{AddCostRequest, CostService, ReportService, UserTotal};
    use crate::infrastructure::user::InMemoryUserDirectory;

    #[derive(Default)]
    struct RecordingAuditSink {
        events: Mutex<Vec<AuditEvent>>,
    }

    impl RecordingAuditSink {
        fn last(&self) -> AuditEvent {
            self.events.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl AuditSink for RecordingAuditSink {
        fn emit(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct PanickingCostService;

    #[async_trait::async_trait]
    impl CostServiceTrait for PanickingCostService {
        async fn add(&self, _request: AddCostRequest) -> Result<CostItem, DomainError> {
            panic!("cost store exploded")
        }

        async fn total(&self, _user_id: &str) -> Result<UserTotal, DomainError> {
            Err(DomainError::storage("connection refused"))
        }

        async fn ping(&self) -> Result<(), DomainError> {
            Err(DomainError::storage("connection refused"))
        }
    }

    fn test_state(audit: Arc<RecordingAuditSink>) -> AppState {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap(),
        ));
        let costs = Arc::new(InMemoryCostRepository::new());
        let reports = Arc::new(InMemoryReportRepository::new());
        let users = Arc::new(InMemoryUserDirectory::with_users([
            UserId::new(1).unwrap(),
            UserId::new(123123).unwrap(),
        ]));

        AppState {
            cost_service: Arc::new(CostService::new(
                costs.clone(),
                users,
                clock.clone(),
                BackdatingPolicy::Allow,
            )),
            report_service: Arc::new(ReportService::new(costs, reports, clock)),
            audit,
        }
    }

    fn test_app() -> (Router, Arc<RecordingAuditSink>) {
        let audit = Arc::new(RecordingAuditSink::default());
        (create_router_with_state(test_state(audit.clone())), audit)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_add_cost() {
        let (app, audit) = test_app();

        let (status, body) = send(
            &app,
            post_json(
                "/api/add",
                json!({"userid": 1, "description": "Lunch", "category": "food", "sum": 50}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userid"], 1);
        assert_eq!(body["description"], "Lunch");
        assert_eq!(body["category"], "food");
        assert_eq!(body["sum"], 50.0);
        assert!(body["id"].is_string());
        assert!(body["createdAt"].is_string());

        let event = audit.last();
        assert_eq!(event.level, AuditLevel::Info);
        assert_eq!(event.message, "Add New Cost Item - 201");
        assert_eq!(event.context["statusCode"], 201);
    }

    #[tokio::test]
    async fn test_add_cost_missing_fields() {
        let (app, audit) = test_app();

        let (status, body) = send(
            &app,
            post_json("/api/add", json!({"userid": 1, "category": "food"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Missing required fields: description, sum");

        let event = audit.last();
        assert_eq!(event.level, AuditLevel::Error);
        assert_eq!(event.message, "Add New Cost Item - VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_add_cost_field_errors() {
        let (app, _) = test_app();

        let cases = [
            (json!({"userid": 1, "description": "x", "category": "toys", "sum": 5}), "INVALID_CATEGORY"),
            (json!({"userid": "abc", "description": "x", "category": "food", "sum": 5}), "INVALID_USERID"),
            (json!({"userid": 1, "description": "x", "category": "food", "sum": -5}), "INVALID_SUM"),
            (json!({"userid": 1, "description": "x", "category": "food", "sum": 5,
                    "year": 2023, "month": 13, "day": 1}), "INVALID_MONTH"),
            (json!({"userid": 1, "description": "x", "category": "food", "sum": 5,
                    "year": 2023, "month": 2, "day": 31}), "INVALID_DATE"),
        ];

        for (payload, expected) in cases {
            let (status, body) = send(&app, post_json("/api/add", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["id"], expected);
        }
    }

    #[tokio::test]
    async fn test_add_cost_unknown_user() {
        let (app, audit) = test_app();

        let (status, body) = send(
            &app,
            post_json(
                "/api/add",
                json!({"userid": 999, "description": "Lunch", "category": "food", "sum": 5}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["id"], "USER_NOT_FOUND");
        assert_eq!(audit.last().message, "Add New Cost Item - USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (app, _) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"userid\": "))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_report_for_past_month() {
        let (app, audit) = test_app();

        for (description, category, day) in [("Lunch", "food", 5), ("Gym", "sports", 20)] {
            let (status, _) = send(
                &app,
                post_json(
                    "/api/add",
                    json!({"userid": 1, "description": description, "category": category,
                           "sum": 10, "year": 2023, "month": 1, "day": day}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, get("/api/report?id=1&year=2023&month=1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userid"], 1);
        assert_eq!(body["year"], 2023);
        assert_eq!(body["month"], 1);
        assert_eq!(
            body["costs"],
            json!([
                {"food": [{"sum": 10.0, "description": "Lunch", "day": 5}]},
                {"health": []},
                {"housing": []},
                {"sports": [{"sum": 10.0, "description": "Gym", "day": 20}]},
                {"education": []}
            ])
        );
        assert_eq!(
            audit.last().message,
            "Generate Report for User 1 (1/2023) - 200"
        );
    }

    #[tokio::test]
    async fn test_report_missing_params() {
        let (app, audit) = test_app();

        let (status, body) = send(&app, get("/api/report?id=1&year=2023")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "VALIDATION_ERROR");
        assert_eq!(
            audit.last().message,
            "Generate Report for User 1 (unknown/2023) - VALIDATION_ERROR"
        );
    }

    #[tokio::test]
    async fn test_report_invalid_year() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get("/api/report?id=1&year=1999&month=1")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "INVALID_YEAR");
    }

    #[tokio::test]
    async fn test_report_malformed_query_uses_error_body() {
        let (app, audit) = test_app();

        let response = app
            .clone()
            .oneshot(get("/api/report?id=1&id=2&year=2023&month=1"))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let (status, body) = send(&app, get("/api/report?id=1&id=2&year=2023&month=1")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "VALIDATION_ERROR");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query string"));
        assert!(audit.last().message.ends_with(" - VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_total_undecodable_user_id() {
        let (app, audit) = test_app();

        let (status, body) = send(&app, get("/api/total/%FF")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "INVALID_USERID");
        assert_eq!(body["message"], "User ID must be a positive integer");
        assert_eq!(audit.last().level, AuditLevel::Error);
        assert!(audit.last().message.ends_with(" - INVALID_USERID"));
    }

    #[tokio::test]
    async fn test_user_total() {
        let (app, _) = test_app();

        for sum in [10.5, 4.5] {
            send(
                &app,
                post_json(
                    "/api/add",
                    json!({"userid": 123123, "description": "Item", "category": "housing", "sum": sum}),
                ),
            )
            .await;
        }

        let (status, body) = send(&app, get("/api/total/123123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"userid": 123123, "total": 15.0}));

        let (status, body) = send(&app, get("/api/total/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["id"], "INVALID_USERID");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, audit) = test_app();

        let (status, body) = send(&app, get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["id"], "not_found");
        assert_eq!(audit.last().message, "GET /api/nope - not_found");

        let (status, body) = send(&app, get("/api/add")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["id"], "not_found");
        assert_eq!(body["message"], "Route /api/add not found");
    }

    #[tokio::test]
    async fn test_panic_becomes_server_error() {
        let audit = Arc::new(RecordingAuditSink::default());
        let mut state = test_state(audit.clone());
        state.cost_service = Arc::new(PanickingCostService);
        let app = create_router_with_state(state);

        let (status, body) = send(
            &app,
            post_json(
                "/api/add",
                json!({"userid": 1, "description": "Lunch", "category": "food", "sum": 5}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["id"], "server_error");
        assert_eq!(audit.last().message, "Add New Cost Item - server_error");
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let audit = Arc::new(RecordingAuditSink::default());
        let mut state = test_state(audit);
        state.cost_service = Arc::new(PanickingCostService);
        let app = create_router_with_state(state);

        let (status, body) = send(&app, get("/api/total/1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["id"], "SERVER_ERROR");
        assert_eq!(body["message"], "Unable to calculate total");

        let (status, body) = send(&app, get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, get("/live")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cost_store"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let (app, audit) = test_app();

        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
        assert_eq!(audit.last().context["requestId"], "req-42");
    }
}
