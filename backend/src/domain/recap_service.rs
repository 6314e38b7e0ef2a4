//! Monthly recap engine.
//!
//! A recap is a persisted snapshot of one calendar month: opening balance,
//! income and expense totals split into the four reporting buckets, closing
//! balance and the active student/mentor headcounts.
//!
//! ## Business Rules
//!
//! - One recap per (month, year); generating an existing period returns it
//!   untouched unless regeneration is forced, which overwrites it in place
//! - Opening balance is the previous month's stored closing balance, or the
//!   ledger's net balance before the period when that recap was never generated
//! - Closing balance is always `opening + income - expense`
//! - Generation for a period runs in one transaction under a per-period lock

use anyhow::anyhow;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::domain::commands::recaps::{
    BatchGenerationResult, CompareRecapsQuery, CompareRecapsResult, DeleteRecapResult,
    GenerateRangeCommand, GenerateRecapCommand, GenerateRecapResult, ListRecapsQuery, PageInfo,
    RecapPage,
};
use crate::domain::errors::RecapError;
use crate::domain::models::comparison::RecapComparison;
use crate::domain::models::period::Period;
use crate::domain::models::recap::{GenerationOutcome, MonthlyRecap, PeriodTotals, RecapFigures};
use crate::domain::models::statistics::AnnualSummary;
use crate::storage::repositories::{LedgerRepository, RecapFilter, RecapRepository, RosterRepository};
use crate::storage::DbConnection;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One async mutex per period, created on first use. Entries nobody holds or
/// waits on are dropped on the next acquisition, so the map only tracks
/// periods with work in flight.
#[derive(Clone, Default)]
struct PeriodLocks {
    locks: Arc<Mutex<HashMap<Period, Arc<AsyncMutex<()>>>>>,
}

impl PeriodLocks {
    async fn acquire(&self, period: Period) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Clones only happen under this map lock, so a count of 1 means idle
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(period).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// Service that generates, queries and compares monthly recaps
#[derive(Clone)]
pub struct RecapService {
    db: DbConnection,
    recap_repository: RecapRepository,
    ledger_repository: LedgerRepository,
    roster_repository: RosterRepository,
    period_locks: PeriodLocks,
}

impl RecapService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            recap_repository: RecapRepository::new(db.clone()),
            ledger_repository: LedgerRepository::new(db.clone()),
            roster_repository: RosterRepository::new(db.clone()),
            period_locks: PeriodLocks::default(),
            db,
        }
    }

    /// Generate the recap of a period, or return the stored one when it exists
    /// and regeneration is not forced
    pub async fn generate(&self, command: GenerateRecapCommand) -> Result<GenerateRecapResult, RecapError> {
        info!(
            "Generating recap for {}/{} (force: {}, by: {:?})",
            command.month, command.year, command.force_regenerate, command.generated_by
        );

        let context = format!("{}/{}", command.month, command.year);
        let result = match Period::new(command.month, command.year) {
            Ok(period) => {
                self.generate_period(period, command.force_regenerate, command.generated_by)
                    .await
            }
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            e.log("Recap generation", &context);
            e
        })
    }

    async fn generate_period(
        &self,
        period: Period,
        force_regenerate: bool,
        generated_by: Option<i64>,
    ) -> Result<GenerateRecapResult, RecapError> {
        let _guard = self.period_locks.acquire(period).await;

        let mut tx = self.db.begin().await?;
        self.recap_repository.claim_period(&mut *tx, period).await?;

        let existing = self.recap_repository.find_by_period(&mut *tx, period).await?;
        if let Some(recap) = &existing {
            if !force_regenerate {
                tx.rollback().await?;
                debug!("Recap for {} already exists (id {})", period, recap.id);
                let outcome = GenerationOutcome::Existing;
                return Ok(GenerateRecapResult {
                    recap: recap.clone(),
                    outcome,
                    message: outcome.message(period),
                });
            }
        }

        let figures = self.compute_figures(&mut *tx, period).await?;
        let generated_at = Utc::now().to_rfc3339();

        let outcome = match &existing {
            Some(recap) => {
                self.recap_repository
                    .update(&mut *tx, recap.id, &figures, generated_by, &generated_at)
                    .await?;
                GenerationOutcome::Regenerated
            }
            None => {
                self.recap_repository
                    .insert(&mut *tx, period, &figures, generated_by, &generated_at)
                    .await?;
                GenerationOutcome::Generated
            }
        };

        let recap = self
            .recap_repository
            .find_by_period(&mut *tx, period)
            .await?
            .ok_or_else(|| anyhow!("Recap for {} missing right after it was written", period))?;

        tx.commit().await?;

        info!(
            "{} (id {}, closing balance {})",
            outcome.message(period),
            recap.id,
            recap.figures.closing_balance
        );

        Ok(GenerateRecapResult {
            recap,
            outcome,
            message: outcome.message(period),
        })
    }

    /// Compute every figure of a period inside the generation transaction
    async fn compute_figures(&self, conn: &mut SqliteConnection, period: Period) -> Result<RecapFigures, RecapError> {
        let previous_closing = match period.previous() {
            Some(previous) => self.recap_repository.closing_balance_of(&mut *conn, previous).await?,
            None => None,
        };
        let opening_balance = match previous_closing {
            Some(closing) => closing,
            None => {
                debug!("No recap before {}, deriving opening balance from the ledger", period);
                self.ledger_repository
                    .net_balance_before(&mut *conn, period.first_day())
                    .await?
            }
        };

        let category_totals = self
            .ledger_repository
            .category_totals(&mut *conn, period.first_day(), period.last_day())
            .await?;
        let totals = PeriodTotals::from_category_totals(period, &category_totals);

        let total_students = self
            .roster_repository
            .count_active_students(&mut *conn, period.last_day())
            .await?;
        let total_mentors = self
            .roster_repository
            .count_active_mentors(&mut *conn, period.last_day())
            .await?;

        Ok(RecapFigures::compute(opening_balance, totals, total_students, total_mentors))
    }

    /// Get the stored recap of a period, if any
    pub async fn get(&self, month: u32, year: i32) -> Result<Option<MonthlyRecap>, RecapError> {
        info!("Getting recap for {}/{}", month, year);
        let context = format!("{}/{}", month, year);

        let result: Result<_, RecapError> = async {
            let period = Period::new(month, year)?;
            Ok(self.recap_repository.find_by_period(self.db.pool(), period).await?)
        }
        .await;

        result.map_err(|e| {
            e.log("Recap lookup", &context);
            e
        })
    }

    /// List recaps newest period first, one page at a time
    pub async fn list(&self, query: ListRecapsQuery) -> Result<RecapPage, RecapError> {
        info!("Listing recaps: {:?}", query);

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let result: Result<_, RecapError> = async {
            if let Some(month) = query.month {
                if !(1..=12).contains(&month) {
                    return Err(RecapError::InvalidPeriod { month, year: query.year.unwrap_or(0) });
                }
            }

            let filter = RecapFilter { year: query.year, month: query.month };
            let total_records = self.recap_repository.count(filter).await?;
            let offset = u64::from(page - 1) * u64::from(per_page);
            let recaps = self.recap_repository.list(filter, per_page, offset).await?;

            Ok(RecapPage {
                recaps,
                page_info: PageInfo {
                    current_page: page,
                    per_page,
                    total_records,
                    total_pages: total_records.div_ceil(u64::from(per_page)),
                },
            })
        }
        .await;

        result.map_err(|e| {
            e.log("Recap listing", &format!("page {}", page));
            e
        })
    }

    /// Generate every month from start to end inclusive without forcing.
    /// A failing month is recorded and the rest still run.
    pub async fn generate_range(&self, command: GenerateRangeCommand) -> Result<BatchGenerationResult, RecapError> {
        info!(
            "Generating recaps from {}/{} to {}/{}",
            command.start_month, command.start_year, command.end_month, command.end_year
        );
        let context = format!(
            "{}/{} - {}/{}",
            command.start_month, command.start_year, command.end_month, command.end_year
        );

        let range = Period::new(command.start_month, command.start_year).and_then(|start| {
            let end = Period::new(command.end_month, command.end_year)?;
            if start > end {
                return Err(RecapError::InvalidRange { start, end });
            }
            Ok(start.through(end))
        });
        let periods = range.map_err(|e| {
            e.log("Range generation", &context);
            e
        })?;

        let mut result = BatchGenerationResult {
            total_periods: periods.len() as u32,
            ..Default::default()
        };

        for period in periods {
            let outcome = self
                .generate_period(period, false, command.generated_by)
                .await;
            match outcome {
                Ok(_) => result.success_count += 1,
                Err(e) => {
                    e.log("Recap generation", &period.to_string());
                    result.errors.push(format!("{}: {}", period, e.user_message()));
                }
            }
        }

        info!(
            "Range generation finished: {} of {} succeeded",
            result.success_count, result.total_periods
        );
        Ok(result)
    }

    /// Compare two stored recaps field by field
    pub async fn compare(&self, query: CompareRecapsQuery) -> Result<CompareRecapsResult, RecapError> {
        info!(
            "Comparing recaps {}/{} and {}/{}",
            query.month1, query.year1, query.month2, query.year2
        );
        let context = format!("{}/{} vs {}/{}", query.month1, query.year1, query.month2, query.year2);

        let result: Result<_, RecapError> = async {
            let first_period = Period::new(query.month1, query.year1)?;
            let second_period = Period::new(query.month2, query.year2)?;

            let first = self
                .recap_repository
                .find_by_period(self.db.pool(), first_period)
                .await?
                .ok_or(RecapError::NotFound(first_period))?;
            let second = self
                .recap_repository
                .find_by_period(self.db.pool(), second_period)
                .await?
                .ok_or(RecapError::NotFound(second_period))?;

            Ok(CompareRecapsResult {
                comparison: RecapComparison::new(first, second),
            })
        }
        .await;

        result.map_err(|e| {
            e.log("Recap comparison", &context);
            e
        })
    }

    /// Delete the recap of a period
    pub async fn delete(&self, month: u32, year: i32) -> Result<DeleteRecapResult, RecapError> {
        info!("Deleting recap for {}/{}", month, year);
        let context = format!("{}/{}", month, year);

        let result: Result<_, RecapError> = async {
            let period = Period::new(month, year)?;
            let _guard = self.period_locks.acquire(period).await;

            if !self.recap_repository.delete(period).await? {
                return Err(RecapError::NotFound(period));
            }

            Ok(DeleteRecapResult {
                period,
                success_message: format!("Recap for {} deleted successfully", period),
            })
        }
        .await;

        result.map_err(|e| {
            e.log("Recap deletion", &context);
            e
        })
    }

    /// Roll up every generated recap of a year
    pub async fn annual_summary(&self, year: i32) -> Result<AnnualSummary, RecapError> {
        info!("Building annual summary for {}", year);

        let result: Result<_, RecapError> = async {
            Period::new(1, year)?;
            let recaps = self.recap_repository.list_chronological(Some(year)).await?;
            Ok(summarize_year(year, &recaps))
        }
        .await;

        result.map_err(|e| {
            e.log("Annual summary", &year.to_string());
            e
        })
    }
}

/// Fold a year's recaps (oldest first) into an annual summary
fn summarize_year(year: i32, recaps: &[MonthlyRecap]) -> AnnualSummary {
    let months_generated: Vec<u32> = recaps.iter().map(|r| r.period.month()).collect();
    let months_missing = (1..=12)
        .filter(|month| !months_generated.contains(month))
        .collect();

    let mut summary = AnnualSummary {
        year,
        months_generated,
        months_missing,
        opening_balance: recaps.first().map(|r| r.figures.opening_balance).unwrap_or(0),
        closing_balance: recaps.last().map(|r| r.figures.closing_balance).unwrap_or(0),
        total_income: 0,
        total_expense: 0,
        spp_income: 0,
        registration_income: 0,
        mentor_payment_expense: 0,
        operational_expense: 0,
    };

    for recap in recaps {
        let figures = &recap.figures;
        summary.total_income += figures.total_income;
        summary.total_expense += figures.total_expense;
        summary.spp_income += figures.spp_income;
        summary.registration_income += figures.registration_income;
        summary.mentor_payment_expense += figures.mentor_payment_expense;
        summary.operational_expense += figures.operational_expense;
    }

    summary
}
