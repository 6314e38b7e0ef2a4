use super::recap::{MonthlyRecap, RecapFigures};

/// Numeric recap fields that take part in a comparison, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecapField {
    TotalIncome,
    TotalExpense,
    ClosingBalance,
    SppIncome,
    RegistrationIncome,
    MentorPaymentExpense,
    OperationalExpense,
    TotalStudents,
    TotalMentors,
}

impl RecapField {
    pub const ALL: [RecapField; 9] = [
        RecapField::TotalIncome,
        RecapField::TotalExpense,
        RecapField::ClosingBalance,
        RecapField::SppIncome,
        RecapField::RegistrationIncome,
        RecapField::MentorPaymentExpense,
        RecapField::OperationalExpense,
        RecapField::TotalStudents,
        RecapField::TotalMentors,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RecapField::TotalIncome => "total_income",
            RecapField::TotalExpense => "total_expense",
            RecapField::ClosingBalance => "closing_balance",
            RecapField::SppIncome => "spp_income",
            RecapField::RegistrationIncome => "registration_income",
            RecapField::MentorPaymentExpense => "mentor_payment_expense",
            RecapField::OperationalExpense => "operational_expense",
            RecapField::TotalStudents => "total_students",
            RecapField::TotalMentors => "total_mentors",
        }
    }

    pub fn value(&self, figures: &RecapFigures) -> i64 {
        match self {
            RecapField::TotalIncome => figures.total_income,
            RecapField::TotalExpense => figures.total_expense,
            RecapField::ClosingBalance => figures.closing_balance,
            RecapField::SppIncome => figures.spp_income,
            RecapField::RegistrationIncome => figures.registration_income,
            RecapField::MentorPaymentExpense => figures.mentor_payment_expense,
            RecapField::OperationalExpense => figures.operational_expense,
            RecapField::TotalStudents => figures.total_students,
            RecapField::TotalMentors => figures.total_mentors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increase,
    Decrease,
    Stable,
}

impl Trend {
    fn of(difference: i64) -> Self {
        match difference {
            d if d > 0 => Trend::Increase,
            d if d < 0 => Trend::Decrease,
            _ => Trend::Stable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldComparison {
    pub field: RecapField,
    pub value1: i64,
    pub value2: i64,
    pub difference: i64,
    pub percentage_change: f64,
    pub trend: Trend,
}

impl FieldComparison {
    pub fn between(field: RecapField, value1: i64, value2: i64) -> Self {
        let difference = value2 - value1;
        Self {
            field,
            value1,
            value2,
            difference,
            percentage_change: percentage_change(difference, value1),
            trend: Trend::of(difference),
        }
    }
}

/// Two recaps side by side with per-field differences
#[derive(Debug, Clone, PartialEq)]
pub struct RecapComparison {
    pub first: MonthlyRecap,
    pub second: MonthlyRecap,
    pub differences: Vec<FieldComparison>,
}

impl RecapComparison {
    pub fn new(first: MonthlyRecap, second: MonthlyRecap) -> Self {
        let differences = RecapField::ALL
            .iter()
            .map(|field| {
                FieldComparison::between(
                    *field,
                    field.value(&first.figures),
                    field.value(&second.figures),
                )
            })
            .collect();

        Self { first, second, differences }
    }

    pub fn difference(&self, field: RecapField) -> Option<&FieldComparison> {
        self.differences.iter().find(|d| d.field == field)
    }
}

/// `difference / base * 100` rounded to 2 decimals; 0 when the base is 0
pub fn percentage_change(difference: i64, base: i64) -> f64 {
    if base == 0 {
        return 0.0;
    }
    round2(difference as f64 / base as f64 * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
