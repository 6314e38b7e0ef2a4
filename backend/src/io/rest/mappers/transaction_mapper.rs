use shared::{CreateFinancialTransactionRequest, FinancialTransaction, TransactionType};

use crate::domain::commands::ledger::RecordTransactionCommand;
use crate::domain::models::ledger::{EntryType, FinancialTransaction as DomainTransaction};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn entry_type_to_dto(entry_type: EntryType) -> TransactionType {
        match entry_type {
            EntryType::Income => TransactionType::Income,
            EntryType::Expense => TransactionType::Expense,
        }
    }

    pub fn entry_type_to_domain(transaction_type: TransactionType) -> EntryType {
        match transaction_type {
            TransactionType::Income => EntryType::Income,
            TransactionType::Expense => EntryType::Expense,
        }
    }

    pub fn to_dto(transaction: DomainTransaction) -> FinancialTransaction {
        FinancialTransaction {
            id: transaction.id,
            date: transaction.date.format("%Y-%m-%d").to_string(),
            transaction_type: Self::entry_type_to_dto(transaction.entry_type),
            category: transaction.category.as_str().to_string(),
            description: transaction.description,
            amount: transaction.amount,
            created_at: transaction.created_at,
        }
    }

    pub fn to_command(request: CreateFinancialTransactionRequest) -> RecordTransactionCommand {
        RecordTransactionCommand {
            date: request.date,
            transaction_type: Self::entry_type_to_domain(request.transaction_type).as_str().to_string(),
            category: request.category,
            description: request.description,
            amount: request.amount,
        }
    }
}
