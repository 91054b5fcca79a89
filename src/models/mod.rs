pub mod black_scholes;

use crate::errors::{ScreenerError, ScreenerResult};

/// Option right. The screener prices calls unless told otherwise.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    #[default]
    Call,
    Put,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Everything needed to price one European option.
/// Stack-allocated, Copy.
#[derive(Debug, Clone, Copy)]
pub struct PricingInputs {
    pub spot: f64,
    pub strike: f64,
    /// Year fraction to expiry.
    pub ttl_years: f64,
    pub rate: f64,
    pub volatility: f64,
    pub kind: OptionKind,
}

impl PricingInputs {
    /// Reject inputs outside the model's domain.
    /// Zero ttl or zero volatility are valid (degenerate, priced at intrinsic).
    pub fn validate(&self) -> ScreenerResult<()> {
        let fields = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("time_to_expiration", self.ttl_years),
            ("risk_free_rate", self.rate),
            ("volatility", self.volatility),
        ];
        if let Some((name, v)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScreenerError::InvalidInput(format!("{name} is not finite: {v}")));
        }
        if self.spot <= 0.0 {
            return Err(ScreenerError::InvalidInput(format!("spot must be positive: {}", self.spot)));
        }
        if self.strike <= 0.0 {
            return Err(ScreenerError::InvalidInput(format!(
                "strike must be positive: {}",
                self.strike
            )));
        }
        if self.volatility < 0.0 {
            return Err(ScreenerError::InvalidInput(format!(
                "volatility must be non-negative: {}",
                self.volatility
            )));
        }
        if self.ttl_years < 0.0 {
            return Err(ScreenerError::InvalidInput(format!(
                "time to expiration must be non-negative: {}",
                self.ttl_years
            )));
        }
        Ok(())
    }
}

/// Pricing models implement this trait.
/// price() must be a pure function: deterministic output from inputs only.
pub trait PricingModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Theoretical option value. Errors only on inputs outside the model's domain.
    fn price(&self, inputs: &PricingInputs) -> ScreenerResult<f64>;
}
