pub mod chain_file;
pub mod yahoo;

use crate::errors::ScreenerResult;
use crate::models::OptionKind;
use crate::screener::types::Contract;
use chrono::NaiveDate;
use std::future::Future;

/// Supplies the spot price and option chain the screener consumes.
/// Implementations own transport, timeouts and any retry policy;
/// missing data surfaces as `ScreenerError::DataUnavailable`.
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Latest spot price of the underlying. Always positive and finite on Ok.
    fn spot_price(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> impl Future<Output = ScreenerResult<f64>> + Send;

    /// Contracts of one kind expiring on `expiration`. Never empty on Ok.
    fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
        kind: OptionKind,
    ) -> impl Future<Output = ScreenerResult<Vec<Contract>>> + Send;
}
