use anyhow::Result;
use chrono::NaiveDate;
use sqlx::FromRow;

use crate::domain::models::period::Period;
use crate::domain::models::statistics::{AttendanceSummary, OutstandingByLevel};
use crate::storage::connection::DbConnection;

#[derive(FromRow)]
struct AttendanceRow {
    total_records: i64,
    present_records: i64,
}

#[derive(FromRow)]
struct SppRow {
    payment_count: i64,
    total_amount: i64,
    payer_count: i64,
}

#[derive(FromRow)]
struct OutstandingRow {
    level: String,
    student_count: i64,
    outstanding_amount: i64,
}

/// Raw SPP figures for a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SppTotals {
    pub payment_count: i64,
    pub total_amount: i64,
    pub payer_count: i64,
}

/// Which attendance table to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceSource {
    Students,
    Mentors,
}

impl AttendanceSource {
    fn table(&self) -> &'static str {
        match self {
            AttendanceSource::Students => "student_attendance",
            AttendanceSource::Mentors => "mentor_attendance",
        }
    }
}

/// Read-only aggregates over attendance and SPP payment tables
#[derive(Clone)]
pub struct StatisticsRepository {
    db: DbConnection,
}

impl StatisticsRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Attendance records dated within `[start, end]` and how many were present
    pub async fn attendance(&self, source: AttendanceSource, start: NaiveDate, end: NaiveDate) -> Result<AttendanceSummary> {
        let query = format!(
            r#"
            SELECT COUNT(*) AS total_records,
                   COALESCE(SUM(CASE WHEN status = 'present' THEN 1 ELSE 0 END), 0) AS present_records
            FROM {}
            WHERE date >= ? AND date <= ?
            "#,
            source.table()
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(start.to_string())
            .bind(end.to_string())
            .fetch_one(self.db.pool())
            .await?;

        Ok(AttendanceSummary::new(row.total_records, row.present_records))
    }

    /// SPP payments recorded for a period. Every payment counts toward the
    /// totals; payers are only the active students enrolled by period end.
    pub async fn spp_totals(&self, period: Period) -> Result<SppTotals> {
        let row = sqlx::query_as::<_, SppRow>(
            r#"
            SELECT COUNT(*) AS payment_count,
                   COALESCE(SUM(p.amount), 0) AS total_amount,
                   COUNT(DISTINCT s.id) AS payer_count
            FROM spp_payments p
            LEFT JOIN students s
              ON s.id = p.student_id AND s.status = 'active' AND s.enrollment_date <= ?
            WHERE p.month = ? AND p.year = ?
            "#,
        )
        .bind(period.last_day().to_string())
        .bind(period.month() as i64)
        .bind(period.year() as i64)
        .fetch_one(self.db.pool())
        .await?;

        Ok(SppTotals {
            payment_count: row.payment_count,
            total_amount: row.total_amount,
            payer_count: row.payer_count,
        })
    }

    /// Active students with no SPP payment for the period, grouped by level
    pub async fn outstanding_by_level(&self, period: Period) -> Result<Vec<OutstandingByLevel>> {
        let rows = sqlx::query_as::<_, OutstandingRow>(
            r#"
            SELECT s.level,
                   COUNT(*) AS student_count,
                   COALESCE(SUM(s.monthly_fee), 0) AS outstanding_amount
            FROM students s
            LEFT JOIN spp_payments p
              ON p.student_id = s.id AND p.month = ? AND p.year = ?
            WHERE s.status = 'active' AND s.enrollment_date <= ? AND p.id IS NULL
            GROUP BY s.level
            ORDER BY s.level
            "#,
        )
        .bind(period.month() as i64)
        .bind(period.year() as i64)
        .bind(period.last_day().to_string())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OutstandingByLevel {
                level: row.level,
                student_count: row.student_count,
                outstanding_amount: row.outstanding_amount,
            })
            .collect())
    }
}
