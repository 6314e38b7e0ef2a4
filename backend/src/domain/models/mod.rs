pub mod comparison;
pub mod ledger;
pub mod period;
pub mod recap;
pub mod statistics;

pub use period::Period;
