//! # Domain Module
//!
//! Business logic of the Muhajirin tutoring program's financial reporting.
//!
//! ## Module Organization
//!
//! - **recap_service**: generates, lists, compares and deletes monthly recaps
//! - **statistics_service**: per-month program statistics from the source tables
//! - **ledger_service**: records and lists financial transactions
//! - **export_service**: CSV export of stored recaps
//! - **commands**: internal command, query and result types
//! - **errors**: the `RecapError` taxonomy shared by every service
//! - **models**: periods, ledger entries, recaps, comparisons and statistics
//!
//! ## Core Concepts
//!
//! - **Period**: a calendar month, the key of every recap
//! - **Recap**: a persisted snapshot of one period's balances and headcounts
//! - **Bucket**: one of the four named sub-totals a transaction rolls into

pub mod commands;
pub mod errors;
pub mod export_service;
pub mod ledger_service;
pub mod models;
pub mod recap_service;
pub mod statistics_service;

pub use errors::RecapError;
pub use export_service::ExportService;
pub use ledger_service::LedgerService;
pub use recap_service::RecapService;
pub use statistics_service::StatisticsService;
