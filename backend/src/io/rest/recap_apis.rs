//! # REST API for Monthly Recaps
//!
//! Endpoints for generating, listing, comparing, exporting and deleting
//! monthly recaps.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use shared::{
    CompareRecapsRequest, DeleteRecapResponse, GenerateRangeRequest, GenerateRecapRequest,
    RecapListRequest, RecapResponse,
};
use tracing::{error, info};

use crate::domain::commands::recaps::{
    CompareRecapsQuery, GenerateRangeCommand, GenerateRecapCommand, ListRecapsQuery,
};
use crate::domain::errors::RecapError;
use crate::domain::models::period::Period;
use crate::domain::models::recap::GenerationOutcome;
use crate::io::rest::mappers::recap_mapper::RecapMapper;
use crate::io::rest::{actor_id, error_response};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub year: Option<i32>,
}

/// Create a router for recap related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recaps))
        .route("/generate", post(generate_recap))
        .route("/generate-range", post(generate_range))
        .route("/compare", get(compare_recaps))
        .route("/annual/:year", get(annual_summary))
        .route("/export", get(export_recaps))
        .route("/:year/:month", get(get_recap).delete(delete_recap))
}

/// Generate (or regenerate) one month's recap
pub async fn generate_recap(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRecapRequest>,
) -> impl IntoResponse {
    info!("POST /api/recaps/generate - request: {:?}", request);

    let command = GenerateRecapCommand {
        month: request.month,
        year: request.year,
        force_regenerate: request.force_regenerate,
        generated_by: actor_id(&headers),
    };

    match state.recap_service.generate(command).await {
        Ok(result) => {
            let status = if result.outcome == GenerationOutcome::Generated {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(RecapMapper::to_generate_response(result))).into_response()
        }
        Err(e) => {
            error!("Failed to generate recap: {}", e);
            error_response(e)
        }
    }
}

/// Generate every month of an inclusive range
pub async fn generate_range(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRangeRequest>,
) -> impl IntoResponse {
    info!("POST /api/recaps/generate-range - request: {:?}", request);

    let command = GenerateRangeCommand {
        start_month: request.start_month,
        start_year: request.start_year,
        end_month: request.end_month,
        end_year: request.end_year,
        generated_by: actor_id(&headers),
    };

    match state.recap_service.generate_range(command).await {
        Ok(result) => (StatusCode::OK, Json(RecapMapper::to_range_response(result))).into_response(),
        Err(e) => {
            error!("Failed to generate recap range: {}", e);
            error_response(e)
        }
    }
}

/// List recaps with pagination and optional year/month filters
pub async fn list_recaps(
    State(state): State<AppState>,
    Query(request): Query<RecapListRequest>,
) -> impl IntoResponse {
    info!("GET /api/recaps - request: {:?}", request);

    let query = ListRecapsQuery {
        page: request.page,
        per_page: request.per_page,
        year: request.year,
        month: request.month,
    };

    match state.recap_service.list(query).await {
        Ok(page) => (StatusCode::OK, Json(RecapMapper::to_list_response(page))).into_response(),
        Err(e) => {
            error!("Failed to list recaps: {}", e);
            error_response(e)
        }
    }
}

/// Get one month's recap
pub async fn get_recap(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> impl IntoResponse {
    info!("GET /api/recaps/{}/{}", year, month);

    match state.recap_service.get(month, year).await {
        Ok(Some(recap)) => {
            let response = RecapResponse {
                success: true,
                recap: RecapMapper::to_dto(recap),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        // The service already rejected invalid periods
        Ok(None) => match Period::new(month, year) {
            Ok(period) => error_response(RecapError::NotFound(period)),
            Err(e) => error_response(e),
        },
        Err(e) => {
            error!("Failed to get recap: {}", e);
            error_response(e)
        }
    }
}

/// Delete one month's recap
pub async fn delete_recap(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> impl IntoResponse {
    info!("DELETE /api/recaps/{}/{}", year, month);

    match state.recap_service.delete(month, year).await {
        Ok(result) => {
            let response = DeleteRecapResponse {
                success: true,
                message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete recap: {}", e);
            error_response(e)
        }
    }
}

/// Compare two months field by field
pub async fn compare_recaps(
    State(state): State<AppState>,
    Query(request): Query<CompareRecapsRequest>,
) -> impl IntoResponse {
    info!("GET /api/recaps/compare - request: {:?}", request);

    let query = CompareRecapsQuery {
        month1: request.month1,
        year1: request.year1,
        month2: request.month2,
        year2: request.year2,
    };

    match state.recap_service.compare(query).await {
        Ok(result) => (StatusCode::OK, Json(RecapMapper::to_compare_response(result))).into_response(),
        Err(e) => {
            error!("Failed to compare recaps: {}", e);
            error_response(e)
        }
    }
}

/// Roll up a year's recaps
pub async fn annual_summary(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    info!("GET /api/recaps/annual/{}", year);

    match state.recap_service.annual_summary(year).await {
        Ok(summary) => (StatusCode::OK, Json(RecapMapper::to_annual_response(summary))).into_response(),
        Err(e) => {
            error!("Failed to build annual summary: {}", e);
            error_response(e)
        }
    }
}

/// Export recaps as CSV
pub async fn export_recaps(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    info!("GET /api/recaps/export - year: {:?}", query.year);

    match state.export_service.export_recaps_csv(query.year).await {
        Ok(result) => (StatusCode::OK, Json(RecapMapper::to_export_response(result))).into_response(),
        Err(e) => {
            error!("Failed to export recaps: {}", e);
            error_response(e)
        }
    }
}
