//! # Storage Module
//!
//! Handles all data persistence for the recap service.
//!
//! The recap engine owns a single table, `monthly_recap`, and only reads the
//! ledger (`financial_transactions`) and the tutoring program's source tables
//! (`students`, `mentors`, `spp_payments`, attendance, `users`).
//!
//! ## Components
//!
//! - **connection.rs** - `DbConnection`, the SQLite pool and schema bootstrap
//! - **repositories/** - one repository per table family
//!
//! Repository methods that take part in recap generation accept any sqlx
//! executor, so the same query runs against the pool or inside the
//! generation transaction.

pub mod connection;
pub mod repositories;

#[cfg(test)]
pub mod test_utils;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{
    LedgerRepository,
    RecapRepository,
    RosterRepository,
    StatisticsRepository,
};
