use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Direction of a financial transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// Transaction category as recorded by the admin panel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Spp,
    Registration,
    MentorPayment,
    Operational,
    Utilities,
    Other,
    /// Any stored string outside the known set
    Unrecognized(String),
}

impl Category {
    /// Parse a stored category string; never fails, unknown values are kept verbatim
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "spp" => Category::Spp,
            "registration" => Category::Registration,
            "mentor_payment" => Category::MentorPayment,
            "operational" => Category::Operational,
            "utilities" => Category::Utilities,
            "other" => Category::Other,
            other => Category::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Spp => "spp",
            Category::Registration => "registration",
            Category::MentorPayment => "mentor_payment",
            Category::Operational => "operational",
            Category::Utilities => "utilities",
            Category::Other => "other",
            Category::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named recap sub-total a transaction rolls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    SppIncome,
    RegistrationIncome,
    MentorPaymentExpense,
    OperationalExpense,
}

/// Map a (type, category) pair to its recap bucket.
///
/// Income outside spp/registration only counts toward the total. Every expense
/// that is not a mentor payment, including unrecognized categories, is
/// operational.
pub fn bucket_for(entry_type: EntryType, category: &Category) -> Option<Bucket> {
    match (entry_type, category) {
        (EntryType::Income, Category::Spp) => Some(Bucket::SppIncome),
        (EntryType::Income, Category::Registration) => Some(Bucket::RegistrationIncome),
        (EntryType::Income, _) => None,
        (EntryType::Expense, Category::MentorPayment) => Some(Bucket::MentorPaymentExpense),
        (EntryType::Expense, _) => Some(Bucket::OperationalExpense),
    }
}

/// A single row of `financial_transactions`
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub category: Category,
    pub description: String,
    /// Whole rupiah, never negative
    pub amount: i64,
    pub created_at: String,
}

/// New transaction to append to the ledger
#[derive(Debug, Clone)]
pub struct NewFinancialTransaction {
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub category: Category,
    pub description: String,
    pub amount: i64,
}

/// Sum of a period's transactions for one (type, category) group
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub entry_type: EntryType,
    pub category: Category,
    pub total: i64,
}
