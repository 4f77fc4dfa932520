//! Cost endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::router::route_not_found;
use super::state::AppState;
use super::types::{ApiError, Json, Path, Query};
use crate::domain::{DomainError, ValidationError};
use crate::infrastructure::services::{AddCostRequest, ReportQuery};

/// Routes mounted under `/api`
pub fn create_costs_router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_cost).fallback(route_not_found))
        .route("/report", get(monthly_report).fallback(route_not_found))
        .route("/total/{userid}", get(user_total).fallback(route_not_found))
}

/// POST /api/add
pub async fn add_cost(
    State(state): State<AppState>,
    Json(request): Json<AddCostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .cost_service
        .add(request)
        .await
        .map_err(|e| ApiError::from(e).with_server_message("Unable to add cost item"))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/report?id=&year=&month=
pub async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .report_service
        .monthly_report(&query)
        .await
        .map_err(|e| ApiError::from(e).with_server_message("Unable to generate report"))?;

    Ok(Json(report))
}

/// GET /api/total/{userid}
pub async fn user_total(
    State(state): State<AppState>,
    user_id: Result<Path<String>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    // An undecodable segment is still a bad user id.
    let Path(user_id) =
        user_id.map_err(|_| ApiError::from(DomainError::from(ValidationError::InvalidUserId)))?;

    let total = state
        .cost_service
        .total(&user_id)
        .await
        .map_err(|e| ApiError::from(e).with_server_message("Unable to calculate total"))?;

    Ok(Json(total))
}
