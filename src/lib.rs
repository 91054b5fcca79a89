//! Black-Scholes premium screener: prices an option chain and flags the
//! contracts quoted above model value.

pub mod cli;
pub mod config;
pub mod errors;
pub mod feeds;
pub mod models;
pub mod report;
pub mod screener;
