use tracing::warn;

use super::ledger::{bucket_for, Bucket, CategoryTotal, EntryType};
use super::period::Period;

/// A persisted row of `monthly_recap`
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecap {
    pub id: i64,
    pub period: Period,
    pub figures: RecapFigures,
    pub generated_by: Option<i64>,
    /// Display name of the generating user, filled by the outer join on `users`
    pub generated_by_name: Option<String>,
    pub generated_at: String,
}

/// Every computed value of a recap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecapFigures {
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
}

/// Period totals accumulated from grouped transaction sums
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub total_income: i64,
    pub total_expense: i64,
    pub spp_income: i64,
    pub registration_income: i64,
    pub mentor_payment_expense: i64,
    pub operational_expense: i64,
}

impl PeriodTotals {
    pub fn from_category_totals(period: Period, totals: &[CategoryTotal]) -> Self {
        let mut result = Self::default();

        for row in totals {
            match row.entry_type {
                EntryType::Income => result.total_income += row.total,
                EntryType::Expense => result.total_expense += row.total,
            }

            if !row.category.is_recognized() {
                warn!(
                    "Unrecognized {} category '{}' in {} ({} rupiah)",
                    row.entry_type.as_str(),
                    row.category,
                    period,
                    row.total
                );
            }

            match bucket_for(row.entry_type, &row.category) {
                Some(Bucket::SppIncome) => result.spp_income += row.total,
                Some(Bucket::RegistrationIncome) => result.registration_income += row.total,
                Some(Bucket::MentorPaymentExpense) => result.mentor_payment_expense += row.total,
                Some(Bucket::OperationalExpense) => result.operational_expense += row.total,
                None => {}
            }
        }

        result
    }
}

impl RecapFigures {
    /// Combine the opening balance, period totals and headcounts.
    /// Closing balance is always `opening + income - expense`.
    pub fn compute(opening_balance: i64, totals: PeriodTotals, total_students: i64, total_mentors: i64) -> Self {
        Self {
            opening_balance,
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            closing_balance: opening_balance + totals.total_income - totals.total_expense,
            spp_income: totals.spp_income,
            registration_income: totals.registration_income,
            mentor_payment_expense: totals.mentor_payment_expense,
            operational_expense: totals.operational_expense,
            total_students,
            total_mentors,
        }
    }
}

/// How a call to generate resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A recap already existed and was returned untouched
    Existing,
    /// A new recap row was inserted
    Generated,
    /// An existing recap row was overwritten in place
    Regenerated,
}

impl GenerationOutcome {
    pub fn message(&self, period: Period) -> String {
        match self {
            GenerationOutcome::Existing => format!("Recap for {} already exists", period),
            GenerationOutcome::Generated => format!("Recap for {} generated successfully", period),
            GenerationOutcome::Regenerated => format!("Recap for {} updated successfully", period),
        }
    }
}
