//! Transaction report pipeline: reads CSV or JSON transaction files, keeps the
//! well-formed records, aggregates per-account balances and per-type
//! statistics, flags suspicious transactions and writes CSV reports.

pub mod config;
pub mod engine;
pub mod input;
pub mod report;
