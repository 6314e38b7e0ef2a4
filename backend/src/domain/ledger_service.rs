//! Ledger service: the admin-facing way to append and browse financial
//! transactions. Recaps read these rows; nothing here touches `monthly_recap`.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::commands::ledger::RecordTransactionCommand;
use crate::domain::errors::RecapError;
use crate::domain::models::ledger::{Category, EntryType, FinancialTransaction, NewFinancialTransaction};
use crate::domain::models::period::Period;
use crate::storage::repositories::LedgerRepository;
use crate::storage::DbConnection;

pub const MAX_DESCRIPTION_LENGTH: usize = 255;

#[derive(Clone)]
pub struct LedgerService {
    ledger_repository: LedgerRepository,
}

impl LedgerService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            ledger_repository: LedgerRepository::new(db),
        }
    }

    /// Validate and append a transaction
    pub async fn record_transaction(&self, command: RecordTransactionCommand) -> Result<FinancialTransaction, RecapError> {
        info!(
            "Recording {} transaction of {} on {} ({})",
            command.transaction_type, command.amount, command.date, command.category
        );
        let context = command.date.clone();

        let result: Result<_, RecapError> = async {
            let transaction = validate(command)?;
            Ok(self.ledger_repository.store_transaction(&transaction).await?)
        }
        .await;

        result.map_err(|e| {
            e.log("Recording transaction", &context);
            e
        })
    }

    /// All transactions dated inside a month, oldest first
    pub async fn list_transactions(&self, month: u32, year: i32) -> Result<Vec<FinancialTransaction>, RecapError> {
        info!("Listing transactions for {}/{}", month, year);

        let result: Result<_, RecapError> = async {
            let period = Period::new(month, year)?;
            Ok(self
                .ledger_repository
                .list_between(period.first_day(), period.last_day())
                .await?)
        }
        .await;

        result.map_err(|e| {
            e.log("Listing transactions", &format!("{}/{}", month, year));
            e
        })
    }
}

fn validate(command: RecordTransactionCommand) -> Result<NewFinancialTransaction, RecapError> {
    let date = NaiveDate::parse_from_str(command.date.trim(), "%Y-%m-%d").map_err(|_| {
        RecapError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", command.date))
    })?;

    let entry_type = command
        .transaction_type
        .trim()
        .parse::<EntryType>()
        .map_err(RecapError::InvalidInput)?;

    if command.category.trim().is_empty() {
        return Err(RecapError::InvalidInput("Category cannot be empty".to_string()));
    }
    if command.amount < 0 {
        return Err(RecapError::InvalidInput("Amount cannot be negative".to_string()));
    }
    if command.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(RecapError::InvalidInput(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }

    Ok(NewFinancialTransaction {
        date,
        entry_type,
        category: Category::parse(&command.category),
        description: command.description.trim().to_string(),
        amount: command.amount,
    })
}
