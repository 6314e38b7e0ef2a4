// Repository modules
pub mod ledger_repository;
pub mod recap_repository;
pub mod roster_repository;
pub mod statistics_repository;

// Re-export repository types
pub use ledger_repository::LedgerRepository;
pub use recap_repository::{RecapFilter, RecapRepository};
pub use roster_repository::RosterRepository;
pub use statistics_repository::{AttendanceSource, SppTotals, StatisticsRepository};
