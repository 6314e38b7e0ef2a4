use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{Executor, FromRow, Sqlite};

use crate::domain::models::statistics::LevelBreakdown;
use crate::storage::connection::DbConnection;

#[derive(FromRow)]
struct LevelRow {
    level: String,
    student_count: i64,
    total_monthly_fee: i64,
}

/// Read-only access to the `students` and `mentors` tables
#[derive(Clone)]
pub struct RosterRepository {
    db: DbConnection,
}

impl RosterRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Active students enrolled on or before `as_of`
    pub async fn count_active_students<'e, E>(&self, executor: E, as_of: NaiveDate) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM students
            WHERE status = 'active' AND enrollment_date <= ?
            "#,
        )
        .bind(as_of.to_string())
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Active mentors who joined on or before `as_of`
    pub async fn count_active_mentors<'e, E>(&self, executor: E, as_of: NaiveDate) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM mentors
            WHERE status = 'active' AND join_date <= ?
            "#,
        )
        .bind(as_of.to_string())
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Active students and their monthly fees grouped by level
    pub async fn students_by_level(&self, as_of: NaiveDate) -> Result<Vec<LevelBreakdown>> {
        let rows = sqlx::query_as::<_, LevelRow>(
            r#"
            SELECT level,
                   COUNT(*) AS student_count,
                   COALESCE(SUM(monthly_fee), 0) AS total_monthly_fee
            FROM students
            WHERE status = 'active' AND enrollment_date <= ?
            GROUP BY level
            ORDER BY level
            "#,
        )
        .bind(as_of.to_string())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LevelBreakdown {
                level: row.level,
                student_count: row.student_count,
                total_monthly_fee: row.total_monthly_fee,
            })
            .collect())
    }
}
