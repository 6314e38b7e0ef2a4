//! # REST API for the Financial Ledger
//!
//! Recording and browsing the transactions that recaps are computed from.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{CreateFinancialTransactionRequest, FinancialTransactionListResponse, FinancialTransactionResponse};
use tracing::{error, info};

use crate::io::rest::error_response;
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionPeriodQuery {
    pub month: u32,
    pub year: i32,
}

/// Create a router for ledger APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_transactions).post(create_transaction))
}

/// List a month's transactions, oldest first
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionPeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - month: {}, year: {}", query.month, query.year);

    match state.ledger_service.list_transactions(query.month, query.year).await {
        Ok(transactions) => {
            let response = FinancialTransactionListResponse {
                success: true,
                transactions: transactions.into_iter().map(TransactionMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            error_response(e)
        }
    }
}

/// Append a transaction to the ledger
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateFinancialTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = TransactionMapper::to_command(request);

    match state.ledger_service.record_transaction(command).await {
        Ok(transaction) => {
            let response = FinancialTransactionResponse {
                success: true,
                transaction: TransactionMapper::to_dto(transaction),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to record transaction: {}", e);
            error_response(e)
        }
    }
}
