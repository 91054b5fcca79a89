/// Domain-specific error types for the screener.
/// Contract-level faults are reported per contract and never abort a batch.
/// Context-level faults (bad spot, expiry before valuation, missing data)
/// abort the run with a message naming what was missing.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("market data unavailable for {ticker} expiring {expiration}: {reason}")]
    DataUnavailable {
        ticker: String,
        expiration: String,
        reason: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl ScreenerError {
    pub fn unavailable(
        ticker: &str,
        expiration: chrono::NaiveDate,
        reason: impl Into<String>,
    ) -> Self {
        ScreenerError::DataUnavailable {
            ticker: ticker.to_string(),
            expiration: expiration.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ScreenerError {
    fn from(e: reqwest::Error) -> Self {
        ScreenerError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ScreenerError {
    fn from(e: serde_json::Error) -> Self {
        ScreenerError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ScreenerError {
    fn from(e: std::io::Error) -> Self {
        ScreenerError::Io(e.to_string())
    }
}

pub type ScreenerResult<T> = Result<T, ScreenerError>;
