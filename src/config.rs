use crate::errors::{ScreenerError, ScreenerResult};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub risk_free_rate: f64,
    pub market_data_base_url: String,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> ScreenerResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys take their defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> ScreenerResult<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let risk_free_rate = lookup("RISK_FREE_RATE")
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| ScreenerError::Config(format!("RISK_FREE_RATE: {e}")))?
            .unwrap_or(DEFAULT_RISK_FREE_RATE);
        if !risk_free_rate.is_finite() {
            return Err(ScreenerError::Config(format!(
                "RISK_FREE_RATE: not finite: {risk_free_rate}"
            )));
        }

        let http_timeout_secs = var_or("HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| ScreenerError::Config(format!("HTTP_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            risk_free_rate,
            market_data_base_url: var_or(
                "MARKET_DATA_BASE_URL",
                "https://query2.finance.yahoo.com",
            ),
            http_timeout_secs,
        })
    }
}
