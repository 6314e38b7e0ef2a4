use super::comparison::round2;
use super::period::Period;

#[derive(Debug, Clone, PartialEq)]
pub struct LevelBreakdown {
    pub level: String,
    pub student_count: i64,
    pub total_monthly_fee: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceSummary {
    pub total_records: i64,
    pub present_records: i64,
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    pub fn new(total_records: i64, present_records: i64) -> Self {
        Self {
            total_records,
            present_records,
            attendance_rate: rate(present_records, total_records),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SppSummary {
    pub payment_count: i64,
    pub total_amount: i64,
    pub payer_count: i64,
    pub payment_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutstandingByLevel {
    pub level: String,
    pub student_count: i64,
    pub outstanding_amount: i64,
}

/// Per-period report computed straight from the source tables
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStatistics {
    pub period: Period,
    pub students_by_level: Vec<LevelBreakdown>,
    pub total_active_students: i64,
    pub total_monthly_fee: i64,
    pub active_mentors: i64,
    pub student_attendance: AttendanceSummary,
    pub mentor_attendance: AttendanceSummary,
    pub spp: SppSummary,
    pub outstanding_by_level: Vec<OutstandingByLevel>,
    pub total_outstanding_students: i64,
    pub total_outstanding_amount: i64,
}

/// Roll-up of a year's generated recaps
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSummary {
    pub year: i32,
    pub months_generated: Vec<u32>,
    pub months_missing: Vec<u32>,
    pub opening_balance: i64,
    pub closing_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub spp_income: i64,
    pub registration_income: i64,
    pub mentor_payment_expense: i64,
    pub operational_expense: i64,
}

impl AnnualSummary {
    pub fn net_change(&self) -> i64 {
        self.total_income - self.total_expense
    }
}

/// `part / whole * 100` rounded to 2 decimals; 0 when there is nothing to divide by
pub fn rate(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rounds_and_guards_zero() {
        assert_eq!(rate(2, 3), 66.67);
        assert_eq!(rate(5, 5), 100.0);
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(3, 0), 0.0);
    }

    #[test]
    fn test_attendance_summary() {
        let summary = AttendanceSummary::new(8, 7);
        assert_eq!(summary.attendance_rate, 87.5);
        assert_eq!(AttendanceSummary::new(0, 0).attendance_rate, 0.0);
    }
}
