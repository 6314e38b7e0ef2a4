//! # REST API for Monthly Statistics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::io::rest::error_response;
use crate::io::rest::mappers::statistics_mapper::StatisticsMapper;
use crate::AppState;

/// Create a router for statistics APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/:year/:month", get(get_monthly_statistics))
}

/// Program statistics for one month
pub async fn get_monthly_statistics(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> impl IntoResponse {
    info!("GET /api/statistics/{}/{}", year, month);

    match state.statistics_service.monthly_statistics(month, year).await {
        Ok(stats) => (StatusCode::OK, Json(StatisticsMapper::to_response(stats))).into_response(),
        Err(e) => {
            error!("Failed to compute statistics: {}", e);
            error_response(e)
        }
    }
}
