use shared::ErrorCode;
use tracing::{error, warn};

use crate::domain::models::period::Period;

/// Failures surfaced by every recap, statistics and ledger operation
#[derive(Debug, thiserror::Error)]
pub enum RecapError {
    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },
    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: Period, end: Period },
    #[error("No recap has been generated for {0}")]
    NotFound(Period),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Data access failure")]
    DataAccess(#[from] anyhow::Error),
}

impl From<sqlx::Error> for RecapError {
    fn from(err: sqlx::Error) -> Self {
        RecapError::DataAccess(err.into())
    }
}

impl RecapError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RecapError::InvalidPeriod { .. } => ErrorCode::InvalidPeriod,
            RecapError::InvalidRange { .. } => ErrorCode::InvalidRange,
            RecapError::NotFound(_) => ErrorCode::NotFound,
            RecapError::InvalidInput(_) => ErrorCode::InvalidInput,
            RecapError::DataAccess(_) => ErrorCode::StorageFailure,
        }
    }

    /// Message safe to show to admins; storage details stay in the logs
    pub fn user_message(&self) -> String {
        match self {
            RecapError::DataAccess(_) => {
                "The recap data could not be read or saved. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Log the failure of a public operation with its context
    pub(crate) fn log(&self, operation: &str, context: &str) {
        match self {
            RecapError::DataAccess(source) => {
                error!("{} failed for {}: {:?}", operation, context, source)
            }
            other => warn!("{} rejected for {}: {}", operation, context, other),
        }
    }
}
