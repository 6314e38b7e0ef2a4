use anyhow::Result;
use sqlx::{Executor, FromRow, Sqlite};

use crate::domain::models::period::Period;
use crate::domain::models::recap::{MonthlyRecap, RecapFigures};
use crate::storage::connection::DbConnection;

const RECAP_SELECT: &str = r#"
    SELECT r.id, r.month, r.year, r.opening_balance, r.total_income, r.total_expense,
           r.closing_balance, r.spp_income, r.registration_income,
           r.mentor_payment_expense, r.operational_expense, r.total_students,
           r.total_mentors, r.generated_by, u.full_name AS generated_by_name,
           r.generated_at
    FROM monthly_recap r
    LEFT JOIN users u ON u.id = r.generated_by
"#;

/// Row type for recap queries
#[derive(FromRow)]
struct RecapRow {
    id: i64,
    month: i64,
    year: i64,
    opening_balance: i64,
    total_income: i64,
    total_expense: i64,
    closing_balance: i64,
    spp_income: i64,
    registration_income: i64,
    mentor_payment_expense: i64,
    operational_expense: i64,
    total_students: i64,
    total_mentors: i64,
    generated_by: Option<i64>,
    generated_by_name: Option<String>,
    generated_at: String,
}

impl RecapRow {
    fn into_recap(self) -> Result<MonthlyRecap> {
        let period = Period::new(self.month as u32, self.year as i32)?;
        Ok(MonthlyRecap {
            id: self.id,
            period,
            figures: RecapFigures {
                opening_balance: self.opening_balance,
                total_income: self.total_income,
                total_expense: self.total_expense,
                closing_balance: self.closing_balance,
                spp_income: self.spp_income,
                registration_income: self.registration_income,
                mentor_payment_expense: self.mentor_payment_expense,
                operational_expense: self.operational_expense,
                total_students: self.total_students,
                total_mentors: self.total_mentors,
            },
            generated_by: self.generated_by,
            generated_by_name: self.generated_by_name,
            generated_at: self.generated_at,
        })
    }
}

/// Optional filters for listing recaps
#[derive(Debug, Clone, Copy, Default)]
pub struct RecapFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Repository for the `monthly_recap` table, the only table the recap engine writes
#[derive(Clone)]
pub struct RecapRepository {
    db: DbConnection,
}

impl RecapRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Get the recap of a period, enriched with the generating user's name
    pub async fn find_by_period<'e, E>(&self, executor: E, period: Period) -> Result<Option<MonthlyRecap>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("{} WHERE r.month = ? AND r.year = ?", RECAP_SELECT);
        let row = sqlx::query_as::<_, RecapRow>(&query)
            .bind(period.month() as i64)
            .bind(period.year() as i64)
            .fetch_optional(executor)
            .await?;

        row.map(RecapRow::into_recap).transpose()
    }

    /// Closing balance stored for a period, if that period has a recap
    pub async fn closing_balance_of<'e, E>(&self, executor: E, period: Period) -> Result<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let closing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT closing_balance
            FROM monthly_recap
            WHERE month = ? AND year = ?
            "#,
        )
        .bind(period.month() as i64)
        .bind(period.year() as i64)
        .fetch_optional(executor)
        .await?;

        Ok(closing)
    }

    /// Take the write lock on the recap table inside the current transaction.
    ///
    /// SQLite has no `SELECT ... FOR UPDATE`; an UPDATE that touches the
    /// period's row (or no row at all) upgrades the transaction to a writer,
    /// so a concurrent generation blocks until this transaction ends.
    pub async fn claim_period<'e, E>(&self, executor: E, period: Period) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE monthly_recap
            SET generated_at = generated_at
            WHERE month = ? AND year = ?
            "#,
        )
        .bind(period.month() as i64)
        .bind(period.year() as i64)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Insert a new recap and return its id
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        period: Period,
        figures: &RecapFigures,
        generated_by: Option<i64>,
        generated_at: &str,
    ) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO monthly_recap (
                month, year, opening_balance, total_income, total_expense,
                closing_balance, spp_income, registration_income,
                mentor_payment_expense, operational_expense, total_students,
                total_mentors, generated_by, generated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(period.month() as i64)
        .bind(period.year() as i64)
        .bind(figures.opening_balance)
        .bind(figures.total_income)
        .bind(figures.total_expense)
        .bind(figures.closing_balance)
        .bind(figures.spp_income)
        .bind(figures.registration_income)
        .bind(figures.mentor_payment_expense)
        .bind(figures.operational_expense)
        .bind(figures.total_students)
        .bind(figures.total_mentors)
        .bind(generated_by)
        .bind(generated_at)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrite every computed value of an existing recap in place
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        figures: &RecapFigures,
        generated_by: Option<i64>,
        generated_at: &str,
    ) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE monthly_recap
            SET opening_balance = ?, total_income = ?, total_expense = ?,
                closing_balance = ?, spp_income = ?, registration_income = ?,
                mentor_payment_expense = ?, operational_expense = ?,
                total_students = ?, total_mentors = ?, generated_by = ?,
                generated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(figures.opening_balance)
        .bind(figures.total_income)
        .bind(figures.total_expense)
        .bind(figures.closing_balance)
        .bind(figures.spp_income)
        .bind(figures.registration_income)
        .bind(figures.mentor_payment_expense)
        .bind(figures.operational_expense)
        .bind(figures.total_students)
        .bind(figures.total_mentors)
        .bind(generated_by)
        .bind(generated_at)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Count recaps matching the filter
    pub async fn count(&self, filter: RecapFilter) -> Result<u64> {
        let year = filter.year.map(i64::from);
        let month = filter.month.map(i64::from);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM monthly_recap
            WHERE (? IS NULL OR year = ?) AND (? IS NULL OR month = ?)
            "#,
        )
        .bind(year)
        .bind(year)
        .bind(month)
        .bind(month)
        .fetch_one(self.db.pool())
        .await?;

        Ok(total.max(0) as u64)
    }

    /// List one page of recaps, newest period first
    pub async fn list(&self, filter: RecapFilter, limit: u32, offset: u64) -> Result<Vec<MonthlyRecap>> {
        let year = filter.year.map(i64::from);
        let month = filter.month.map(i64::from);

        let query = format!(
            "{} WHERE (? IS NULL OR r.year = ?) AND (? IS NULL OR r.month = ?) \
             ORDER BY r.year DESC, r.month DESC LIMIT ? OFFSET ?",
            RECAP_SELECT
        );
        let rows = sqlx::query_as::<_, RecapRow>(&query)
            .bind(year)
            .bind(year)
            .bind(month)
            .bind(month)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.db.pool())
            .await?;

        rows.into_iter().map(RecapRow::into_recap).collect()
    }

    /// All recaps of a year (or of every year), oldest period first
    pub async fn list_chronological(&self, year: Option<i32>) -> Result<Vec<MonthlyRecap>> {
        let year = year.map(i64::from);

        let query = format!(
            "{} WHERE (? IS NULL OR r.year = ?) ORDER BY r.year ASC, r.month ASC",
            RECAP_SELECT
        );
        let rows = sqlx::query_as::<_, RecapRow>(&query)
            .bind(year)
            .bind(year)
            .fetch_all(self.db.pool())
            .await?;

        rows.into_iter().map(RecapRow::into_recap).collect()
    }

    /// Delete the recap of a period.
    /// Returns true if a recap was found and deleted, false otherwise
    pub async fn delete(&self, period: Period) -> Result<bool> {
        let result = sqlx::query("DELETE FROM monthly_recap WHERE month = ? AND year = ?")
            .bind(period.month() as i64)
            .bind(period.year() as i64)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils;

    fn figures(opening: i64, income: i64, expense: i64) -> RecapFigures {
        RecapFigures {
            opening_balance: opening,
            total_income: income,
            total_expense: expense,
            closing_balance: opening + income - expense,
            ..Default::default()
        }
    }

    async fn setup_test() -> (DbConnection, RecapRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = RecapRepository::new(db.clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_insert_and_find_with_actor_name() {
        let (db, repo) = setup_test().await;
        let admin = test_utils::insert_user(&db, "bendahara", "Ustadz Hasan").await;
        let period = Period::new(1, 2025).unwrap();

        let id = repo
            .insert(db.pool(), period, &figures(0, 1_000_000, 400_000), Some(admin), "2025-02-01T08:00:00+07:00")
            .await
            .unwrap();

        let recap = repo.find_by_period(db.pool(), period).await.unwrap().unwrap();
        assert_eq!(recap.id, id);
        assert_eq!(recap.period, period);
        assert_eq!(recap.figures.closing_balance, 600_000);
        assert_eq!(recap.generated_by, Some(admin));
        assert_eq!(recap.generated_by_name.as_deref(), Some("Ustadz Hasan"));
    }

    #[tokio::test]
    async fn test_unknown_actor_yields_no_name() {
        let (db, repo) = setup_test().await;
        let period = Period::new(3, 2025).unwrap();

        repo.insert(db.pool(), period, &figures(0, 10, 0), Some(999), "2025-04-01T00:00:00+00:00")
            .await
            .unwrap();

        let recap = repo.find_by_period(db.pool(), period).await.unwrap().unwrap();
        assert_eq!(recap.generated_by, Some(999));
        assert_eq!(recap.generated_by_name, None);
    }

    #[tokio::test]
    async fn test_find_missing_period_returns_none() {
        let (db, repo) = setup_test().await;
        let period = Period::new(7, 2025).unwrap();

        assert!(repo.find_by_period(db.pool(), period).await.unwrap().is_none());
        assert!(repo.closing_balance_of(db.pool(), period).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let (db, repo) = setup_test().await;
        let period = Period::new(5, 2025).unwrap();
        let id = repo
            .insert(db.pool(), period, &figures(0, 100, 50), None, "2025-06-01T00:00:00+00:00")
            .await
            .unwrap();

        repo.update(db.pool(), id, &figures(10, 300, 50), Some(1), "2025-06-02T00:00:00+00:00")
            .await
            .unwrap();

        let recap = repo.find_by_period(db.pool(), period).await.unwrap().unwrap();
        assert_eq!(recap.id, id);
        assert_eq!(recap.figures.total_income, 300);
        assert_eq!(recap.figures.closing_balance, 260);
        assert_eq!(recap.generated_at, "2025-06-02T00:00:00+00:00");
        assert_eq!(repo.count(RecapFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_filters() {
        let (db, repo) = setup_test().await;
        for (month, year) in [(11, 2024), (12, 2024), (1, 2025), (2, 2025)] {
            let period = Period::new(month, year).unwrap();
            repo.insert(db.pool(), period, &figures(0, 1, 0), None, "2025-03-01T00:00:00+00:00")
                .await
                .unwrap();
        }

        let all = repo.list(RecapFilter::default(), 10, 0).await.unwrap();
        let order: Vec<(u32, i32)> = all.iter().map(|r| (r.period.month(), r.period.year())).collect();
        assert_eq!(order, vec![(2, 2025), (1, 2025), (12, 2024), (11, 2024)]);

        let only_2024 = RecapFilter { year: Some(2024), month: None };
        assert_eq!(repo.count(only_2024).await.unwrap(), 2);
        let page = repo.list(only_2024, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].period, Period::new(11, 2024).unwrap());

        let january = RecapFilter { year: None, month: Some(1) };
        assert_eq!(repo.count(january).await.unwrap(), 1);

        let chronological = repo.list_chronological(Some(2024)).await.unwrap();
        assert_eq!(chronological[0].period, Period::new(11, 2024).unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let (db, repo) = setup_test().await;
        let period = Period::new(8, 2025).unwrap();
        repo.insert(db.pool(), period, &figures(0, 1, 0), None, "2025-09-01T00:00:00+00:00")
            .await
            .unwrap();

        assert!(repo.delete(period).await.unwrap());
        assert!(!repo.delete(period).await.unwrap());
        assert!(repo.find_by_period(db.pool(), period).await.unwrap().is_none());
    }
}
