use shared::{AttendanceSummary, LevelBreakdown, MonthlyStatisticsResponse, OutstandingByLevel, SppSummary};

use crate::domain::models::statistics::{
    AttendanceSummary as DomainAttendance, MonthlyStatistics, SppSummary as DomainSpp,
};

pub struct StatisticsMapper;

impl StatisticsMapper {
    pub fn to_response(stats: MonthlyStatistics) -> MonthlyStatisticsResponse {
        MonthlyStatisticsResponse {
            success: true,
            month: stats.period.month(),
            year: stats.period.year(),
            period_label: stats.period.to_string(),
            students_by_level: stats
                .students_by_level
                .into_iter()
                .map(|level| LevelBreakdown {
                    level: level.level,
                    student_count: level.student_count,
                    total_monthly_fee: level.total_monthly_fee,
                })
                .collect(),
            total_active_students: stats.total_active_students,
            total_monthly_fee: stats.total_monthly_fee,
            active_mentors: stats.active_mentors,
            student_attendance: Self::attendance_to_dto(stats.student_attendance),
            mentor_attendance: Self::attendance_to_dto(stats.mentor_attendance),
            spp: Self::spp_to_dto(stats.spp),
            outstanding_by_level: stats
                .outstanding_by_level
                .into_iter()
                .map(|level| OutstandingByLevel {
                    level: level.level,
                    student_count: level.student_count,
                    outstanding_amount: level.outstanding_amount,
                })
                .collect(),
            total_outstanding_students: stats.total_outstanding_students,
            total_outstanding_amount: stats.total_outstanding_amount,
        }
    }

    fn attendance_to_dto(summary: DomainAttendance) -> AttendanceSummary {
        AttendanceSummary {
            total_records: summary.total_records,
            present_records: summary.present_records,
            attendance_rate: summary.attendance_rate,
        }
    }

    fn spp_to_dto(spp: DomainSpp) -> SppSummary {
        SppSummary {
            payment_count: spp.payment_count,
            total_amount: spp.total_amount,
            payer_count: spp.payer_count,
            payment_rate: spp.payment_rate,
        }
    }
}
