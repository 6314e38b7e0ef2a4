//! # Muhajirin Recap Backend
//!
//! Back-office service for the Masjid Al-Muhajirin tutoring program (Bimbel).
//! It turns the program's financial ledger and roster into persisted monthly
//! recaps, and serves them over a JSON REST API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (recap engine, statistics, ledger, export)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{ExportService, LedgerService, RecapService, StatisticsService};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub recap_service: RecapService,
    pub statistics_service: StatisticsService,
    pub ledger_service: LedgerService,
    pub export_service: ExportService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            recap_service: RecapService::new(db.clone()),
            statistics_service: StatisticsService::new(db.clone()),
            ledger_service: LedgerService::new(db.clone()),
            export_service: ExportService::new(db),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::init(config).await?;

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;

    // CORS setup to allow the admin panel to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/recaps", io::rest::recap_apis::router())
        .nest("/statistics", io::rest::statistics_apis::router())
        .nest("/transactions", io::rest::transaction_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn setup_test() -> (DbConnection, Router) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let router = create_router(AppState::new(db.clone()), "http://localhost:8080").unwrap();
        (db, router)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
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
            .header("content-type", "application/json")
            .header("x-user-id", "1")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_generate_then_fetch_recap() {
        let (db, router) = setup_test().await;
        test_utils::insert_user(&db, "bendahara", "Bendahara Masjid").await;
        test_utils::insert_transaction(&db, "2025-01-10", "income", "spp", 1_000_000).await;
        test_utils::insert_transaction(&db, "2025-01-20", "expense", "mentor_payment", 400_000).await;

        let (status, body) = send(&router, post_json("/api/recaps/generate", json!({"month": 1, "year": 2025}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["regenerated"], false);
        assert_eq!(body["recap"]["closing_balance"], 600_000);
        assert_eq!(body["recap"]["generated_by_name"], "Bendahara Masjid");

        let (status, body) = send(
            &router,
            post_json("/api/recaps/generate", json!({"month": 1, "year": 2025, "force_regenerate": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["regenerated"], true);

        let (status, body) = send(&router, get("/api/recaps/2025/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recap"]["period_label"], "January 2025");
    }

    #[tokio::test]
    async fn test_error_codes_map_to_status() {
        let (_db, router) = setup_test().await;

        let (status, body) = send(&router, post_json("/api/recaps/generate", json!({"month": 13, "year": 2025}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "invalid_period");

        let (status, body) = send(&router, get("/api/recaps/2025/2")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, body) = send(
            &router,
            post_json(
                "/api/recaps/generate-range",
                json!({"start_month": 6, "start_year": 2025, "end_month": 1, "end_year": 2025}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_range");

        let (status, _) = send(&router, get("/api/recaps/compare?month1=1&year1=2025&month2=2&year2=2025")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_range_and_delete() {
        let (_db, router) = setup_test().await;

        let (status, body) = send(&router, get("/api/recaps")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_pages"], 0);
        assert_eq!(body["pagination"]["per_page"], 10);

        let (status, body) = send(
            &router,
            post_json(
                "/api/recaps/generate-range",
                json!({"start_month": 1, "start_year": 2025, "end_month": 3, "end_year": 2025}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success_count"], 3);
        assert_eq!(body["error_count"], 0);

        let (_, body) = send(&router, get("/api/recaps?per_page=2&page=2")).await;
        assert_eq!(body["pagination"]["total_records"], 3);
        assert_eq!(body["recaps"][0]["month"], 1);

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/recaps/2025/3")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, delete).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Recap for March 2025 deleted successfully");

        let (_, body) = send(&router, get("/api/recaps/annual/2025")).await;
        assert_eq!(body["months_generated"], json!([1, 2]));

        let (status, body) = send(&router, get("/api/recaps/export?year=2025")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recap_count"], 2);
    }

    #[tokio::test]
    async fn test_transactions_and_statistics_endpoints() {
        let (db, router) = setup_test().await;
        test_utils::insert_student(&db, "Aisyah", "SD", 150_000, "active", "2024-07-01").await;

        let (status, body) = send(
            &router,
            post_json(
                "/api/transactions",
                json!({
                    "date": "2025-01-08",
                    "transaction_type": "income",
                    "category": "spp",
                    "description": "SPP Januari",
                    "amount": 150000
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["transaction"]["category"], "spp");

        let (status, body) = send(
            &router,
            post_json(
                "/api/transactions",
                json!({"date": "2025-01-08", "transaction_type": "expense", "category": "", "amount": 10}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");

        let (_, body) = send(&router, get("/api/transactions?month=1&year=2025")).await;
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);

        let (status, body) = send(&router, get("/api/statistics/2025/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_active_students"], 1);
        assert_eq!(body["total_outstanding_students"], 1);
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_is_rejected() {
        let db = DbConnection::init_test().await.unwrap();
        assert!(create_router(AppState::new(db), "bad\norigin").is_err());
    }
}
