use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted monthly financial summary, as rendered by the admin UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecap {
    pub id: i64,
    /// Calendar month (1-12)
    pub month: u32,
    pub year: i32,
    /// Human-readable period, e.g. "January 2025"
    pub period_label: String,
    /// All monetary amounts are whole rupiah
    pub opening_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub closing_balance: i64,
    pub spp_income: i64,
    pub registration_income: i64,
    pub mentor_payment_expense: i64,
    pub operational_expense: i64,
    pub total_students: i64,
    pub total_mentors: i64,
    /// User id of the admin who generated the recap
    pub generated_by: Option<i64>,
    /// Display name of the generating admin (None if unknown or deleted)
    pub generated_by_name: Option<String>,
    /// RFC 3339 timestamp of the last generation
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRecapRequest {
    pub month: u32,
    pub year: i32,
    /// Overwrite an existing recap in place instead of returning it untouched
    #[serde(default)]
    pub force_regenerate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRecapResponse {
    pub success: bool,
    pub message: String,
    pub recap: MonthlyRecap,
    /// True only when an existing recap was overwritten
    pub regenerated: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecapListRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub total_records: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapListResponse {
    pub success: bool,
    pub recaps: Vec<MonthlyRecap>,
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapResponse {
    pub success: bool,
    pub recap: MonthlyRecap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecapResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRangeRequest {
    pub start_month: u32,
    pub start_year: i32,
    pub end_month: u32,
    pub end_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRangeResponse {
    pub success: bool,
    pub message: String,
    pub total_periods: u32,
    pub success_count: u32,
    pub error_count: u32,
    /// One entry per failed period: "<MonthName> <Year>: <message>"
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRecapsRequest {
    pub month1: u32,
    pub year1: i32,
    pub month2: u32,
    pub year2: i32,
}

/// Direction of change between two recap values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increase,
    Decrease,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDifference {
    /// Recap field name, e.g. "total_income"
    pub field: String,
    pub value1: i64,
    pub value2: i64,
    pub difference: i64,
    /// Rounded to 2 decimals; 0 when the first value is 0
    pub percentage_change: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRecapsResponse {
    pub success: bool,
    pub period1: MonthlyRecap,
    pub period2: MonthlyRecap,
    pub differences: Vec<FieldDifference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummaryResponse {
    pub success: bool,
    pub year: i32,
    pub months_generated: Vec<u32>,
    pub months_missing: Vec<u32>,
    pub opening_balance: i64,
    pub closing_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub net_change: i64,
    pub spp_income: i64,
    pub registration_income: i64,
    pub mentor_payment_expense: i64,
    pub operational_expense: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecapsResponse {
    pub success: bool,
    pub csv_content: String,
    pub filename: String,
    pub recap_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBreakdown {
    pub level: String,
    pub student_count: i64,
    pub total_monthly_fee: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total_records: i64,
    pub present_records: i64,
    /// Percentage rounded to 2 decimals
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SppSummary {
    pub payment_count: i64,
    pub total_amount: i64,
    pub payer_count: i64,
    /// payers / active students * 100, rounded to 2 decimals
    pub payment_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstandingByLevel {
    pub level: String,
    pub student_count: i64,
    pub outstanding_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatisticsResponse {
    pub success: bool,
    pub month: u32,
    pub year: i32,
    pub period_label: String,
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

/// Direction of a financial transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: i64,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub transaction_type: TransactionType,
    /// Category as stored, e.g. "spp", "mentor_payment"
    pub category: String,
    pub description: String,
    /// Whole rupiah, never negative
    pub amount: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFinancialTransactionRequest {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTransactionResponse {
    pub success: bool,
    pub transaction: FinancialTransaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTransactionListResponse {
    pub success: bool,
    pub transactions: Vec<FinancialTransaction>,
}

/// Closed set of user-facing failure codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPeriod,
    InvalidRange,
    InvalidInput,
    NotFound,
    StorageFailure,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = match self {
            ErrorCode::InvalidPeriod => "invalid_period",
            ErrorCode::InvalidRange => "invalid_range",
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::NotFound => "not_found",
            ErrorCode::StorageFailure => "storage_failure",
        };
        write!(f, "{}", code)
    }
}

/// Body of every failed API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
        }
    }
}
