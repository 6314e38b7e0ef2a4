//! # REST API Interface Layer
//!
//! JSON endpoints under `/api` for recaps, statistics and the ledger.
//!
//! Handlers only translate: DTOs from `shared` become domain commands, domain
//! results become DTOs, and `RecapError` becomes a status code plus an
//! `ApiError` body with a closed error code.
//!
//! The acting admin is identified by the `X-User-Id` header; requests
//! without it are recorded with no actor.

pub mod mappers;
pub mod recap_apis;
pub mod statistics_apis;
pub mod transaction_apis;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use shared::ApiError;
use tracing::warn;

use crate::domain::errors::RecapError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Status code for each domain failure
pub fn status_for(error: &RecapError) -> StatusCode {
    match error {
        RecapError::InvalidPeriod { .. }
        | RecapError::InvalidRange { .. }
        | RecapError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RecapError::NotFound(_) => StatusCode::NOT_FOUND,
        RecapError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a domain failure into a JSON error response
pub fn error_response(error: RecapError) -> Response {
    let body = ApiError::new(error.code(), error.user_message());
    (status_for(&error), Json(body)).into_response()
}

/// The acting user id from the `X-User-Id` header, if present and numeric
pub fn actor_id(headers: &HeaderMap) -> Option<i64> {
    let raw = headers.get(USER_ID_HEADER)?.to_str().ok()?;
    match raw.trim().parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!("Ignoring non-numeric {} header: {:?}", USER_ID_HEADER, raw);
            None
        }
    }
}
