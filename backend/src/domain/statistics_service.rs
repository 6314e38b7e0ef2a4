//! Monthly program statistics.
//!
//! Unlike recaps, statistics are never persisted: every call recomputes them
//! from the student, mentor, attendance and SPP tables as of the end of the
//! requested month.

use tracing::info;

use crate::domain::errors::RecapError;
use crate::domain::models::period::Period;
use crate::domain::models::statistics::{rate, MonthlyStatistics, SppSummary};
use crate::storage::repositories::{AttendanceSource, RosterRepository, StatisticsRepository};
use crate::storage::DbConnection;

#[derive(Clone)]
pub struct StatisticsService {
    db: DbConnection,
    roster_repository: RosterRepository,
    statistics_repository: StatisticsRepository,
}

impl StatisticsService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            roster_repository: RosterRepository::new(db.clone()),
            statistics_repository: StatisticsRepository::new(db.clone()),
            db,
        }
    }

    /// Compute the statistics of a month
    pub async fn monthly_statistics(&self, month: u32, year: i32) -> Result<MonthlyStatistics, RecapError> {
        info!("Computing statistics for {}/{}", month, year);

        let result: Result<_, RecapError> = async {
            let period = Period::new(month, year)?;
            self.compute(period).await
        }
        .await;

        result.map_err(|e| {
            e.log("Statistics", &format!("{}/{}", month, year));
            e
        })
    }

    async fn compute(&self, period: Period) -> Result<MonthlyStatistics, RecapError> {
        let as_of = period.last_day();

        let students_by_level = self.roster_repository.students_by_level(as_of).await?;
        let total_active_students: i64 = students_by_level.iter().map(|l| l.student_count).sum();
        let total_monthly_fee: i64 = students_by_level.iter().map(|l| l.total_monthly_fee).sum();

        let active_mentors = self
            .roster_repository
            .count_active_mentors(self.db.pool(), as_of)
            .await?;

        let student_attendance = self
            .statistics_repository
            .attendance(AttendanceSource::Students, period.first_day(), as_of)
            .await?;
        let mentor_attendance = self
            .statistics_repository
            .attendance(AttendanceSource::Mentors, period.first_day(), as_of)
            .await?;

        let spp_totals = self.statistics_repository.spp_totals(period).await?;
        let spp = SppSummary {
            payment_count: spp_totals.payment_count,
            total_amount: spp_totals.total_amount,
            payer_count: spp_totals.payer_count,
            payment_rate: rate(spp_totals.payer_count, total_active_students),
        };

        let outstanding_by_level = self.statistics_repository.outstanding_by_level(period).await?;
        let total_outstanding_students: i64 = outstanding_by_level.iter().map(|l| l.student_count).sum();
        let total_outstanding_amount: i64 = outstanding_by_level.iter().map(|l| l.outstanding_amount).sum();

        Ok(MonthlyStatistics {
            period,
            students_by_level,
            total_active_students,
            total_monthly_fee,
            active_mentors,
            student_attendance,
            mentor_attendance,
            spp,
            outstanding_by_level,
            total_outstanding_students,
            total_outstanding_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils;

    #[tokio::test]
    async fn test_statistics_for_month() {
        let db = DbConnection::init_test().await.unwrap();
        let service = StatisticsService::new(db.clone());

        let aisyah = test_utils::insert_student(&db, "Aisyah", "SD", 150_000, "active", "2024-07-01").await;
        let hamzah = test_utils::insert_student(&db, "Hamzah", "SD", 150_000, "active", "2024-07-01").await;
        let bilal = test_utils::insert_student(&db, "Bilal", "SMP", 200_000, "active", "2024-08-01").await;
        test_utils::insert_student(&db, "Candra", "SMP", 200_000, "inactive", "2024-08-01").await;
        let fatimah = test_utils::insert_mentor(&db, "Ustadzah Fatimah", "active", "2024-01-10").await;

        test_utils::insert_spp_payment(&db, aisyah, 3, 2025, 150_000, "2025-03-04").await;
        test_utils::insert_spp_payment(&db, bilal, 3, 2025, 200_000, "2025-03-05").await;
        test_utils::insert_student_attendance(&db, hamzah, "2025-03-03", "present").await;
        test_utils::insert_student_attendance(&db, hamzah, "2025-03-10", "sick").await;
        test_utils::insert_mentor_attendance(&db, fatimah, "2025-03-03", "present").await;

        let stats = service.monthly_statistics(3, 2025).await.unwrap();

        assert_eq!(stats.period, Period::new(3, 2025).unwrap());
        assert_eq!(stats.students_by_level.len(), 2);
        assert_eq!(stats.total_active_students, 3);
        assert_eq!(stats.total_monthly_fee, 500_000);
        assert_eq!(stats.active_mentors, 1);
        assert_eq!(stats.student_attendance.attendance_rate, 50.0);
        assert_eq!(stats.mentor_attendance.attendance_rate, 100.0);
        assert_eq!(stats.spp.total_amount, 350_000);
        assert_eq!(stats.spp.payer_count, 2);
        assert_eq!(stats.spp.payment_rate, 66.67);
        assert_eq!(stats.total_outstanding_students, 1);
        assert_eq!(stats.total_outstanding_amount, 150_000);
    }

    #[tokio::test]
    async fn test_statistics_with_no_data_are_zero() {
        let db = DbConnection::init_test().await.unwrap();
        let service = StatisticsService::new(db);

        let stats = service.monthly_statistics(1, 2025).await.unwrap();

        assert!(stats.students_by_level.is_empty());
        assert_eq!(stats.total_active_students, 0);
        assert_eq!(stats.spp, SppSummary::default());
        assert_eq!(stats.student_attendance.attendance_rate, 0.0);
        assert_eq!(stats.total_outstanding_amount, 0);
    }

    #[tokio::test]
    async fn test_statistics_rejects_invalid_month() {
        let db = DbConnection::init_test().await.unwrap();
        let service = StatisticsService::new(db);

        let err = service.monthly_statistics(0, 2025).await.unwrap_err();
        assert!(matches!(err, RecapError::InvalidPeriod { month: 0, .. }));
    }
}
