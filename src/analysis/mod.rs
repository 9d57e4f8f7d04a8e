//! Aggregation of the OKR table into chart-ready rows.

pub mod aggregator;

pub use aggregator::*;
