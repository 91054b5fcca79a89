use crate::errors::{ScreenerError, ScreenerResult};
use crate::models::OptionKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day-count basis for year fractions (ACT/365).
pub const DAYS_PER_YEAR: f64 = 365.0;

// ── Inputs ──

/// One traded option as quoted by the market-data source.
/// Field aliases accept the option-chain column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(alias = "contractSymbol")]
    pub identifier: String,
    pub strike: f64,
    #[serde(alias = "lastPrice")]
    pub quoted_price: f64,
    #[serde(alias = "impliedVolatility")]
    pub implied_volatility: f64,
}

impl Contract {
    /// Checks the fields the pricer does not see.
    pub fn validate(&self) -> ScreenerResult<()> {
        if !self.quoted_price.is_finite() || self.quoted_price < 0.0 {
            return Err(ScreenerError::InvalidInput(format!(
                "quoted price must be non-negative: {}",
                self.quoted_price
            )));
        }
        Ok(())
    }
}

/// Market state shared by every contract in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationContext {
    pub spot_price: f64,
    pub risk_free_rate: f64,
    pub valuation_date: NaiveDate,
    pub expiration_date: NaiveDate,
}

impl ValuationContext {
    /// Whole days to expiry over 365. Fails if expiry precedes valuation.
    pub fn time_to_expiration(&self) -> ScreenerResult<f64> {
        let days = (self.expiration_date - self.valuation_date).num_days();
        if days < 0 {
            return Err(ScreenerError::InvalidInput(format!(
                "expiration {} is before valuation date {}",
                self.expiration_date, self.valuation_date
            )));
        }
        Ok(days as f64 / DAYS_PER_YEAR)
    }

    pub fn validate(&self) -> ScreenerResult<()> {
        if !self.spot_price.is_finite() || self.spot_price <= 0.0 {
            return Err(ScreenerError::InvalidInput(format!(
                "spot price must be positive: {}",
                self.spot_price
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ScreenerError::InvalidInput(format!(
                "risk-free rate is not finite: {}",
                self.risk_free_rate
            )));
        }
        self.time_to_expiration().map(|_| ())
    }
}

// ── Outputs ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingResult {
    pub identifier: String,
    pub strike: f64,
    pub quoted_price: f64,
    pub theoretical_price: f64,
    /// quoted - theoretical. Always > 0 in a screen report.
    pub premium: f64,
}

/// A contract skipped because its fields are outside the model's domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedContract {
    pub identifier: String,
    /// Position in the input batch.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    pub kind: OptionKind,
    pub spot_price: f64,
    pub time_to_expiration: f64,
    pub evaluated: usize,
    /// Contracts with strictly positive premium, in input order.
    pub results: Vec<PricingResult>,
    /// Invalid contracts, in input order.
    pub rejected: Vec<RejectedContract>,
}
