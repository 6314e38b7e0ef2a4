pub mod recap_mapper;
pub mod statistics_mapper;
pub mod transaction_mapper;
