use crate::models::OptionKind;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Flags option contracts quoted above their Black-Scholes value.
#[derive(Debug, Parser)]
#[command(name = "premium_screener")]
#[command(version)]
#[command(about = "Screen an option chain for contracts trading above Black-Scholes value")]
pub struct Cli {
    /// Underlying ticker symbol (e.g. NVDA)
    pub ticker: String,

    /// Expiration date of the chain, YYYY-MM-DD
    pub expiration: NaiveDate,

    /// Annual risk-free rate as a decimal [env: RISK_FREE_RATE, default 0.01]
    #[arg(short, long, allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Which side of the chain to screen
    #[arg(short, long, value_enum, default_value_t = OptionKind::Call)]
    pub kind: OptionKind,

    /// Valuation date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub valuation_date: Option<NaiveDate>,

    /// Read spot and chain from a JSON file instead of the network
    #[arg(long)]
    pub chain_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
