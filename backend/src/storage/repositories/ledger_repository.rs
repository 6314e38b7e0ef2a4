use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use sqlx::{Executor, FromRow, Sqlite};

use crate::domain::models::ledger::{
    Category, CategoryTotal, EntryType, FinancialTransaction, NewFinancialTransaction,
};
use crate::storage::connection::DbConnection;

/// Row type for financial transaction queries
#[derive(FromRow)]
struct TransactionRow {
    id: i64,
    date: String,
    #[sqlx(rename = "type")]
    entry_type: String,
    category: String,
    description: String,
    amount: i64,
    created_at: String,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<FinancialTransaction> {
        Ok(FinancialTransaction {
            id: self.id,
            date: parse_date(&self.date)?,
            entry_type: self.entry_type.parse::<EntryType>().map_err(|e| anyhow!(e))?,
            category: Category::parse(&self.category),
            description: self.description,
            amount: self.amount,
            created_at: self.created_at,
        })
    }
}

/// Row type for grouped period sums
#[derive(FromRow)]
struct CategoryTotalRow {
    #[sqlx(rename = "type")]
    entry_type: String,
    category: String,
    total: i64,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| anyhow!("Invalid stored date '{}': {}", raw, e))
}

/// Repository for the append-only `financial_transactions` table
#[derive(Clone)]
pub struct LedgerRepository {
    db: DbConnection,
}

impl LedgerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Signed sum (income - expense) of every transaction dated strictly before `date`
    pub async fn net_balance_before<'e, E>(&self, executor: E, date: NaiveDate) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE -amount END), 0)
            FROM financial_transactions
            WHERE date < ?
            "#,
        )
        .bind(date.to_string())
        .fetch_one(executor)
        .await?;

        Ok(balance)
    }

    /// Sums of transactions dated within `[start, end]`, grouped by type and category
    pub async fn category_totals<'e, E>(&self, executor: E, start: NaiveDate, end: NaiveDate) -> Result<Vec<CategoryTotal>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, CategoryTotalRow>(
            r#"
            SELECT type, category, COALESCE(SUM(amount), 0) AS total
            FROM financial_transactions
            WHERE date >= ? AND date <= ?
            GROUP BY type, category
            ORDER BY type, category
            "#,
        )
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CategoryTotal {
                    entry_type: row.entry_type.parse::<EntryType>().map_err(|e| anyhow!(e))?,
                    category: Category::parse(&row.category),
                    total: row.total,
                })
            })
            .collect()
    }

    /// Append a transaction and return the stored row
    pub async fn store_transaction(&self, transaction: &NewFinancialTransaction) -> Result<FinancialTransaction> {
        let result = sqlx::query(
            r#"
            INSERT INTO financial_transactions (date, type, category, description, amount)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.date.to_string())
        .bind(transaction.entry_type.as_str())
        .bind(transaction.category.as_str())
        .bind(&transaction.description)
        .bind(transaction.amount)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        self.get_transaction(id)
            .await?
            .ok_or_else(|| anyhow!("Transaction {} missing right after insert", id))
    }

    /// Retrieve a specific transaction by ID
    pub async fn get_transaction(&self, id: i64) -> Result<Option<FinancialTransaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, date, type, category, description, amount, CAST(created_at AS TEXT) AS created_at
            FROM financial_transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    /// Transactions dated within `[start, end]`, oldest first
    pub async fn list_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<FinancialTransaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, date, type, category, description, amount, CAST(created_at AS TEXT) AS created_at
            FROM financial_transactions
            WHERE date >= ? AND date <= ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    async fn setup_test() -> (DbConnection, LedgerRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = LedgerRepository::new(db.clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_net_balance_before_is_strict() {
        let (db, repo) = setup_test().await;
        test_utils::insert_transaction(&db, "2024-12-31", "income", "spp", 500_000).await;
        test_utils::insert_transaction(&db, "2024-12-15", "expense", "operational", 120_000).await;
        test_utils::insert_transaction(&db, "2025-01-01", "income", "spp", 999_000).await;

        let balance = repo.net_balance_before(db.pool(), date("2025-01-01")).await.unwrap();
        assert_eq!(balance, 380_000);
    }

    #[tokio::test]
    async fn test_net_balance_with_no_history_is_zero() {
        let (db, repo) = setup_test().await;
        let balance = repo.net_balance_before(db.pool(), date("2025-01-01")).await.unwrap();
        assert_eq!(balance, 0);
    }

    #[tokio::test]
    async fn test_category_totals_group_within_range() {
        let (db, repo) = setup_test().await;
        test_utils::insert_transaction(&db, "2025-01-01", "income", "spp", 300_000).await;
        test_utils::insert_transaction(&db, "2025-01-31", "income", "spp", 200_000).await;
        test_utils::insert_transaction(&db, "2025-01-10", "expense", "utilities", 75_000).await;
        test_utils::insert_transaction(&db, "2025-01-12", "expense", "kebersihan", 25_000).await;
        test_utils::insert_transaction(&db, "2025-02-01", "income", "spp", 1_000).await;

        let totals = repo
            .category_totals(db.pool(), date("2025-01-01"), date("2025-01-31"))
            .await
            .unwrap();

        assert_eq!(totals.len(), 3);
        let spp = totals
            .iter()
            .find(|t| t.entry_type == EntryType::Income && t.category == Category::Spp)
            .unwrap();
        assert_eq!(spp.total, 500_000);
        assert!(totals
            .iter()
            .any(|t| t.category == Category::Unrecognized("kebersihan".to_string()) && t.total == 25_000));
    }

    #[tokio::test]
    async fn test_store_and_list_transactions() {
        let (_db, repo) = setup_test().await;

        let stored = repo
            .store_transaction(&NewFinancialTransaction {
                date: date("2025-03-05"),
                entry_type: EntryType::Expense,
                category: Category::MentorPayment,
                description: "Honor mentor Maret".to_string(),
                amount: 450_000,
            })
            .await
            .unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.category, Category::MentorPayment);
        assert_eq!(stored.entry_type, EntryType::Expense);

        let listed = repo.list_between(date("2025-03-01"), date("2025-03-31")).await.unwrap();
        assert_eq!(listed, vec![stored]);
        assert!(repo.list_between(date("2025-04-01"), date("2025-04-30")).await.unwrap().is_empty());
    }
}
