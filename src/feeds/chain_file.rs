use super::MarketDataSource;
use crate::errors::{ScreenerError, ScreenerResult};
use crate::models::OptionKind;
use crate::screener::types::Contract;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Pre-fetched market data read from a JSON file.
///
/// ```json
/// { "spot": 118.42,
///   "calls": [{ "contractSymbol": "NVDA250131C00100000", "strike": 100.0,
///               "lastPrice": 19.6, "impliedVolatility": 0.71 }],
///   "puts": [] }
/// ```
///
/// `contracts` is accepted as an alias of `calls`. Quotes missing a field
/// (or carrying `null`) are dropped one by one, as the HTTP feed does.
#[derive(Debug, Clone)]
pub struct ChainFile {
    path: PathBuf,
    snapshot: ChainSnapshot,
}

#[derive(Debug, Clone)]
struct ChainSnapshot {
    spot: Option<f64>,
    calls: Vec<Contract>,
    puts: Vec<Contract>,
}

#[derive(Debug, serde::Deserialize)]
struct RawSnapshot {
    spot: Option<f64>,
    #[serde(default, alias = "contracts")]
    calls: Vec<RawQuote>,
    #[serde(default)]
    puts: Vec<RawQuote>,
}

/// One quote as written in the file, before completeness checks.
#[derive(Debug, serde::Deserialize)]
struct RawQuote {
    #[serde(alias = "contractSymbol")]
    identifier: Option<String>,
    strike: Option<f64>,
    #[serde(alias = "lastPrice")]
    quoted_price: Option<f64>,
    #[serde(alias = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

impl RawQuote {
    fn to_contract(&self) -> Option<Contract> {
        Some(Contract {
            identifier: self.identifier.clone()?,
            strike: self.strike?,
            quoted_price: self.quoted_price?,
            implied_volatility: self.implied_volatility?,
        })
    }
}

fn complete_contracts(quotes: &[RawQuote]) -> Vec<Contract> {
    quotes
        .iter()
        .filter_map(|q| {
            let contract = q.to_contract();
            if contract.is_none() {
                tracing::debug!(symbol = ?q.identifier, "incomplete option quote dropped");
            }
            contract
        })
        .collect()
}

impl ChainFile {
    pub fn load(path: &Path) -> ScreenerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScreenerError::Io(format!("{}: {e}", path.display())))?;
        let raw: RawSnapshot = serde_json::from_str(&text)
            .map_err(|e| ScreenerError::Parse(format!("{}: {e}", path.display())))?;
        let snapshot = ChainSnapshot {
            spot: raw.spot,
            calls: complete_contracts(&raw.calls),
            puts: complete_contracts(&raw.puts),
        };

        tracing::info!(
            path = %path.display(),
            calls = snapshot.calls.len(),
            puts = snapshot.puts.len(),
            "chain file loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            snapshot,
        })
    }
}

impl MarketDataSource for ChainFile {
    fn name(&self) -> &'static str {
        "chain-file"
    }

    async fn spot_price(&self, ticker: &str, expiration: NaiveDate) -> ScreenerResult<f64> {
        self.snapshot
            .spot
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| {
                ScreenerError::unavailable(
                    ticker,
                    expiration,
                    format!("no positive spot in {}", self.path.display()),
                )
            })
    }

    async fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
        kind: OptionKind,
    ) -> ScreenerResult<Vec<Contract>> {
        let contracts = match kind {
            OptionKind::Call => &self.snapshot.calls,
            OptionKind::Put => &self.snapshot.puts,
        };
        if contracts.is_empty() {
            return Err(ScreenerError::unavailable(
                ticker,
                expiration,
                format!("no {kind} contracts in {}", self.path.display()),
            ));
        }
        Ok(contracts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_loads_spot_and_calls() {
        let file = write_file(
            r#"{"spot":100.0,"contracts":[
                {"contractSymbol":"A","strike":90.0,"lastPrice":15.0,"impliedVolatility":0.25},
                {"identifier":"B","strike":110.0,"quoted_price":1.0,"implied_volatility":0.3}
            ]}"#,
        );
        let source = ChainFile::load(file.path()).unwrap();

        assert_eq!(source.spot_price("NVDA", expiry()).await.unwrap(), 100.0);
        let calls = source.option_chain("NVDA", expiry(), OptionKind::Call).await.unwrap();
        let ids: Vec<&str> = calls.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_missing_puts_is_unavailable() {
        let file = write_file(r#"{"spot":100.0,"calls":[]}"#);
        let source = ChainFile::load(file.path()).unwrap();

        let err = source.option_chain("NVDA", expiry(), OptionKind::Put).await.unwrap_err();
        match err {
            ScreenerError::DataUnavailable { ticker, expiration, .. } => {
                assert_eq!(ticker, "NVDA");
                assert_eq!(expiration, "2025-01-31");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_spot_is_unavailable() {
        let file = write_file(r#"{"calls":[]}"#);
        let source = ChainFile::load(file.path()).unwrap();
        assert!(matches!(
            source.spot_price("NVDA", expiry()).await,
            Err(ScreenerError::DataUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_incomplete_quote_dropped_others_kept() {
        let file = write_file(
            r#"{"spot":100.0,"calls":[
                {"contractSymbol":"A","strike":90.0,"lastPrice":15.0,"impliedVolatility":0.25},
                {"contractSymbol":"B","strike":100.0,"lastPrice":null,"impliedVolatility":0.3},
                {"contractSymbol":"C","strike":105.0,"lastPrice":2.0},
                {"contractSymbol":"D","strike":110.0,"lastPrice":1.0,"impliedVolatility":0.3}
            ]}"#,
        );
        let source = ChainFile::load(file.path()).unwrap();

        let calls = source.option_chain("NVDA", expiry(), OptionKind::Call).await.unwrap();
        let ids: Vec<&str> = calls.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, vec!["A", "D"]);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = write_file("{ not json");
        assert!(matches!(ChainFile::load(file.path()), Err(ScreenerError::Parse(_))));
    }
}
