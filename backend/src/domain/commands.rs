//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod recaps {
    use crate::domain::models::comparison::RecapComparison;
    use crate::domain::models::period::Period;
    use crate::domain::models::recap::{GenerationOutcome, MonthlyRecap};

    /// Input for generating (or regenerating) one period's recap.
    #[derive(Debug, Clone)]
    pub struct GenerateRecapCommand {
        pub month: u32,
        pub year: i32,
        pub force_regenerate: bool,
        pub generated_by: Option<i64>,
    }

    /// Result of a generate call.
    #[derive(Debug, Clone)]
    pub struct GenerateRecapResult {
        pub recap: MonthlyRecap,
        pub outcome: GenerationOutcome,
        pub message: String,
    }

    impl GenerateRecapResult {
        /// True only when an existing row was overwritten
        pub fn regenerated(&self) -> bool {
            self.outcome == GenerationOutcome::Regenerated
        }
    }

    /// Input for generating every month of an inclusive range.
    #[derive(Debug, Clone)]
    pub struct GenerateRangeCommand {
        pub start_month: u32,
        pub start_year: i32,
        pub end_month: u32,
        pub end_year: i32,
        pub generated_by: Option<i64>,
    }

    /// Result of a batch generation; one failing month never stops the rest.
    #[derive(Debug, Clone, Default)]
    pub struct BatchGenerationResult {
        pub total_periods: u32,
        pub success_count: u32,
        pub errors: Vec<String>,
    }

    impl BatchGenerationResult {
        pub fn error_count(&self) -> u32 {
            self.errors.len() as u32
        }
    }

    /// Query parameters for listing recaps.
    #[derive(Debug, Clone, Default)]
    pub struct ListRecapsQuery {
        pub page: Option<u32>,
        pub per_page: Option<u32>,
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    /// Pagination metadata, always present even for empty pages.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PageInfo {
        pub current_page: u32,
        pub per_page: u32,
        pub total_records: u64,
        pub total_pages: u64,
    }

    /// One page of recaps.
    #[derive(Debug, Clone)]
    pub struct RecapPage {
        pub recaps: Vec<MonthlyRecap>,
        pub page_info: PageInfo,
    }

    /// Input for comparing two periods.
    #[derive(Debug, Clone)]
    pub struct CompareRecapsQuery {
        pub month1: u32,
        pub year1: i32,
        pub month2: u32,
        pub year2: i32,
    }

    /// Result of a comparison.
    #[derive(Debug, Clone)]
    pub struct CompareRecapsResult {
        pub comparison: RecapComparison,
    }

    /// Result of deleting a recap.
    #[derive(Debug, Clone)]
    pub struct DeleteRecapResult {
        pub period: Period,
        pub success_message: String,
    }
}

pub mod ledger {
    /// Input for appending a transaction to the ledger.
    #[derive(Debug, Clone)]
    pub struct RecordTransactionCommand {
        pub date: String,
        pub transaction_type: String,
        pub category: String,
        pub description: String,
        pub amount: i64,
    }
}

pub mod export {
    /// CSV rendering of stored recaps.
    #[derive(Debug, Clone)]
    pub struct ExportRecapsResult {
        pub csv_content: String,
        pub filename: String,
        pub recap_count: usize,
    }
}
