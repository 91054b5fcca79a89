use super::MarketDataSource;
use crate::errors::{ScreenerError, ScreenerResult};
use crate::models::OptionKind;
use crate::screener::types::Contract;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use smallvec::{smallvec, SmallVec};

/// Yahoo Finance REST client. Spot comes from the daily chart endpoint,
/// the option chain from the options endpoint for one expiration.
/// All methods return Result, never panic. No retry: a failed fetch is
/// reported as DataUnavailable.
#[derive(Clone)]
pub struct YahooFinance {
    client: Client,
    base_url: String,
}

impl YahooFinance {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .user_agent(concat!("premium_screener/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> ScreenerResult<T> {
        let url = build_url(&self.base_url, segments, params)?;

        tracing::debug!(url = %url, "market data request");

        let resp = self.client.get(url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScreenerError::Network(format!("HTTP {status}: {body}")));
        }

        resp.json::<T>().await.map_err(|e| ScreenerError::Parse(format!("GET {}: {e}", url.path())))
    }
}

impl MarketDataSource for YahooFinance {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn spot_price(&self, ticker: &str, expiration: NaiveDate) -> ScreenerResult<f64> {
        let params = [("range", "1d".to_string()), ("interval", "1d".to_string())];
        let path: SmallVec<[&str; 4]> = smallvec!["v8", "finance", "chart", ticker];
        let resp: ChartResponse = self
            .get_json(&path, &params)
            .await
            .map_err(|e| ScreenerError::unavailable(ticker, expiration, e.to_string()))?;

        spot_from_chart(&resp)
            .ok_or_else(|| ScreenerError::unavailable(ticker, expiration, "no closing price"))
    }

    async fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
        kind: OptionKind,
    ) -> ScreenerResult<Vec<Contract>> {
        let expected_ts = expiration_timestamp(expiration);
        let params = [("date", expected_ts.to_string())];
        let path: SmallVec<[&str; 4]> = smallvec!["v7", "finance", "options", ticker];
        let resp: OptionChainResponse = self
            .get_json(&path, &params)
            .await
            .map_err(|e| ScreenerError::unavailable(ticker, expiration, e.to_string()))?;

        let set = option_set_for(&resp, expected_ts)
            .map_err(|reason| ScreenerError::unavailable(ticker, expiration, reason))?;
        let contracts = contracts_from_set(set, kind);
        if contracts.is_empty() {
            return Err(ScreenerError::unavailable(
                ticker,
                expiration,
                format!("no {kind} contracts listed"),
            ));
        }

        tracing::info!(ticker = %ticker, %expiration, %kind, count = contracts.len(), "option chain fetched");
        Ok(contracts)
    }
}

/// Base URL plus path segments, each percent-encoded (a `/` in a ticker
/// stays inside its segment), plus query pairs.
fn build_url(base_url: &str, segments: &[&str], params: &[(&str, String)]) -> ScreenerResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ScreenerError::Config(format!("MARKET_DATA_BASE_URL {base_url}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| ScreenerError::Config(format!("MARKET_DATA_BASE_URL {base_url}: not a base URL")))?
        .pop_if_empty()
        .extend(segments);

    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }

    Ok(url)
}

/// Expirations are keyed by midnight UTC of the expiry date.
fn expiration_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

// Chart response format (trimmed):
// {
//   "chart": {
//     "result": [{
//       "meta": { "symbol": "NVDA", "regularMarketPrice": 118.42 },
//       "indicators": { "quote": [{ "close": [117.9, null, 118.42] }] }
//     }],
//     "error": null
//   }
// }

#[derive(Debug, serde::Deserialize)]
struct ChartResponse {
    chart: Option<Chart>,
}

#[derive(Debug, serde::Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    indicators: Option<Indicators>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteSeries>>,
}

#[derive(Debug, serde::Deserialize)]
struct QuoteSeries {
    close: Option<Vec<Option<f64>>>,
}

/// Last non-null daily close, falling back to the regular market price.
fn spot_from_chart(resp: &ChartResponse) -> Option<f64> {
    let result = resp.chart.as_ref()?.result.as_ref()?.first()?;

    let last_close = result
        .indicators
        .as_ref()
        .and_then(|i| i.quote.as_ref())
        .and_then(|q| q.first())
        .and_then(|q| q.close.as_ref())
        .and_then(|closes| closes.iter().rev().find_map(|c| *c));

    last_close
        .or_else(|| result.meta.as_ref().and_then(|m| m.regular_market_price))
        .filter(|p| p.is_finite() && *p > 0.0)
}

// Options response format (trimmed):
// {
//   "optionChain": {
//     "result": [{
//       "underlyingSymbol": "NVDA",
//       "options": [{
//         "expirationDate": 1738281600,
//         "calls": [{ "contractSymbol": "NVDA250131C00100000", "strike": 100.0,
//                     "lastPrice": 19.6, "impliedVolatility": 0.71 }],
//         "puts": [ ... ]
//       }]
//     }],
//     "error": null
//   }
// }

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionChainResponse {
    option_chain: Option<OptionChain>,
}

#[derive(Debug, serde::Deserialize)]
struct OptionChain {
    result: Option<Vec<OptionChainResult>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionChainResult {
    expiration_dates: Option<Vec<i64>>,
    options: Option<Vec<OptionSet>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionSet {
    expiration_date: Option<i64>,
    calls: Option<Vec<OptionQuote>>,
    puts: Option<Vec<OptionQuote>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionQuote {
    contract_symbol: Option<String>,
    strike: Option<f64>,
    last_price: Option<f64>,
    implied_volatility: Option<f64>,
}

impl OptionQuote {
    fn to_contract(&self) -> Option<Contract> {
        Some(Contract {
            identifier: self.contract_symbol.clone()?,
            strike: self.strike?,
            quoted_price: self.last_price?,
            implied_volatility: self.implied_volatility?,
        })
    }
}

/// The option set for the requested expiry. An unlisted expiry makes the
/// endpoint fall back to another date, which must not be priced.
fn option_set_for(resp: &OptionChainResponse, expected_ts: i64) -> Result<&OptionSet, String> {
    let result = resp
        .option_chain
        .as_ref()
        .and_then(|c| c.result.as_ref())
        .and_then(|r| r.first())
        .ok_or_else(|| "no option chain returned".to_string())?;

    let set = result
        .options
        .as_ref()
        .and_then(|o| o.first())
        .ok_or_else(|| "no option chain returned".to_string())?;

    match set.expiration_date {
        Some(ts) if ts == expected_ts => Ok(set),
        other => {
            let listed = result.expiration_dates.as_ref().map_or(0, |d| d.len());
            Err(format!(
                "expiration not listed (chain returned {}, {listed} expirations listed)",
                other.map_or_else(|| "no date".to_string(), |ts| ts.to_string())
            ))
        }
    }
}

/// Contracts of `kind` in chain order. Quotes missing a field are dropped.
fn contracts_from_set(set: &OptionSet, kind: OptionKind) -> Vec<Contract> {
    let quotes = match kind {
        OptionKind::Call => set.calls.as_deref(),
        OptionKind::Put => set.puts.as_deref(),
    };

    quotes
        .unwrap_or_default()
        .iter()
        .filter_map(|q| {
            let contract = q.to_contract();
            if contract.is_none() {
                tracing::debug!(symbol = ?q.contract_symbol, "incomplete option quote dropped");
            }
            contract
        })
        .collect()
}
