use crate::errors::ScreenerResult;
use crate::models::{OptionKind, PricingInputs, PricingModel};
use statrs::distribution::{ContinuousCDF, Normal};

/// Black-Scholes European option pricing.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// call = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// put  = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// No dividends. T = 0 prices at intrinsic value, sigma = 0 prices at the
/// discounted forward intrinsic value.
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl BlackScholes {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn price(&self, inputs: &PricingInputs) -> ScreenerResult<f64> {
        inputs.validate()?;

        let PricingInputs { spot, strike, ttl_years: t, rate, volatility: vol, kind } = *inputs;

        if t == 0.0 {
            return Ok(intrinsic(kind, spot, strike));
        }

        let discounted_strike = strike * (-rate * t).exp();

        if vol == 0.0 {
            return Ok(intrinsic(kind, spot, discounted_strike));
        }

        let sigma_sqrt_t = vol * t.sqrt();

        // Unbounded total variance: the call tends to S, the put to K*e^(-rT).
        if !sigma_sqrt_t.is_finite() {
            return Ok(match kind {
                OptionKind::Call => spot,
                OptionKind::Put => discounted_strike,
            });
        }

        // sigma^2 is never formed so huge volatilities cannot overflow.
        let d1 = ((spot / strike).ln() + rate * t) / sigma_sqrt_t + 0.5 * sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;

        let price = match kind {
            OptionKind::Call => spot * self.normal.cdf(d1) - discounted_strike * self.normal.cdf(d2),
            OptionKind::Put => discounted_strike * self.normal.cdf(-d2) - spot * self.normal.cdf(-d1),
        };

        Ok(price)
    }
}

/// Black-Scholes price of a single option.
pub fn price(
    spot: f64,
    strike: f64,
    ttl_years: f64,
    rate: f64,
    volatility: f64,
    kind: OptionKind,
) -> ScreenerResult<f64> {
    BlackScholes::new().price(&PricingInputs {
        spot,
        strike,
        ttl_years,
        rate,
        volatility,
        kind,
    })
}

#[inline]
fn intrinsic(kind: OptionKind, spot: f64, strike: f64) -> f64 {
    match kind {
        OptionKind::Call => (spot - strike).max(0.0),
        OptionKind::Put => (strike - spot).max(0.0),
    }
}
