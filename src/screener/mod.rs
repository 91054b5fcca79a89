pub mod types;

use crate::errors::ScreenerResult;
use crate::models::black_scholes::BlackScholes;
use crate::models::{OptionKind, PricingInputs, PricingModel};
use types::{Contract, PricingResult, RejectedContract, ScreenReport, ValuationContext};

/// Premium screen over a batch of contracts sharing one expiration.
///
/// Time to expiration is computed once from the context. Each contract is
/// priced with Black-Scholes at its own implied volatility; only contracts
/// quoted strictly above the model price are kept. Output order follows
/// input order.
///
/// Context faults (bad spot, expiry before valuation) abort the batch.
/// Contract faults are collected in `rejected` and the batch continues.
pub fn screen(
    contracts: &[Contract],
    context: &ValuationContext,
    kind: OptionKind,
) -> ScreenerResult<ScreenReport> {
    context.validate()?;
    let ttl_years = context.time_to_expiration()?;

    Ok(price_batch(
        &BlackScholes::new(),
        contracts,
        context.spot_price,
        context.risk_free_rate,
        ttl_years,
        kind,
    ))
}

/// Prices every contract with `model` and keeps the positive premiums.
/// Pure function: same inputs always produce the same report.
pub fn price_batch(
    model: &dyn PricingModel,
    contracts: &[Contract],
    spot: f64,
    rate: f64,
    ttl_years: f64,
    kind: OptionKind,
) -> ScreenReport {
    let mut results = Vec::new();
    let mut rejected = Vec::new();

    for (index, contract) in contracts.iter().enumerate() {
        let inputs = PricingInputs {
            spot,
            strike: contract.strike,
            ttl_years,
            rate,
            volatility: contract.implied_volatility,
            kind,
        };

        let theoretical = contract.validate().and_then(|_| model.price(&inputs));

        match theoretical {
            Ok(theoretical_price) => {
                let premium = contract.quoted_price - theoretical_price;
                if premium > 0.0 {
                    results.push(PricingResult {
                        identifier: contract.identifier.clone(),
                        strike: contract.strike,
                        quoted_price: contract.quoted_price,
                        theoretical_price,
                        premium,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(
                    contract = %contract.identifier,
                    index,
                    error = %e,
                    "contract skipped"
                );
                rejected.push(RejectedContract {
                    identifier: contract.identifier.clone(),
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        model = model.name(),
        evaluated = contracts.len(),
        flagged = results.len(),
        rejected = rejected.len(),
        "batch priced"
    );

    ScreenReport {
        kind,
        spot_price: spot,
        time_to_expiration: ttl_years,
        evaluated: contracts.len(),
        results,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScreenerError;
    use crate::models::black_scholes;
    use chrono::NaiveDate;

    fn contract(id: &str, strike: f64, quoted: f64, iv: f64) -> Contract {
        Contract {
            identifier: id.to_string(),
            strike,
            quoted_price: quoted,
            implied_volatility: iv,
        }
    }

    fn context(days: i64) -> ValuationContext {
        let valuation = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        ValuationContext {
            spot_price: 100.0,
            risk_free_rate: 0.01,
            valuation_date: valuation,
            expiration_date: valuation + chrono::Duration::days(days),
        }
    }

    #[test]
    fn test_scenario_only_rich_contract_survives() {
        let contracts = vec![contract("A", 90.0, 15.0, 0.25), contract("B", 110.0, 1.0, 0.3)];
        let report = price_batch(&BlackScholes::new(), &contracts, 100.0, 0.01, 0.5, OptionKind::Call);

        let expected_a = black_scholes::price(100.0, 90.0, 0.5, 0.01, 0.25, OptionKind::Call).unwrap();
        assert!((expected_a - 13.155).abs() < 1e-3, "A theoretical={expected_a}");

        assert_eq!(report.results.len(), 1);
        let a = &report.results[0];
        assert_eq!(a.identifier, "A");
        assert!((a.theoretical_price - expected_a).abs() < 1e-12);
        assert!((a.premium - (15.0 - expected_a)).abs() < 1e-12);
        assert!(report.rejected.is_empty());
        assert_eq!(report.evaluated, 2);
    }

    #[test]
    fn test_zero_premium_excluded() {
        let fair = black_scholes::price(100.0, 100.0, 0.5, 0.01, 0.2, OptionKind::Call).unwrap();
        let contracts = vec![contract("FAIR", 100.0, fair, 0.2)];
        let report = price_batch(&BlackScholes::new(), &contracts, 100.0, 0.01, 0.5, OptionKind::Call);
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_order_preserved_and_filter_holds() {
        let contracts: Vec<Contract> = (0..20)
            .map(|i| {
                let strike = 80.0 + 2.0 * i as f64;
                let quoted = if i % 3 == 0 { 30.0 } else { 0.01 };
                contract(&format!("C{i:02}"), strike, quoted, 0.3)
            })
            .collect();
        let report = screen(&contracts, &context(90), OptionKind::Call).unwrap();

        assert!(!report.results.is_empty());
        assert!(report.results.iter().all(|r| r.premium > 0.0));
        let ids: Vec<&str> = report.results.iter().map(|r| r.identifier.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted, "output must follow input order");

        // Every excluded contract priced at or above its quote.
        let ttl = 90.0 / 365.0;
        for c in contracts.iter().filter(|c| !ids.contains(&c.identifier.as_str())) {
            let p = black_scholes::price(100.0, c.strike, ttl, 0.01, 0.3, OptionKind::Call).unwrap();
            assert!(c.quoted_price - p <= 0.0);
        }
    }

    #[test]
    fn test_screen_is_deterministic() {
        let contracts = vec![contract("A", 90.0, 15.0, 0.25), contract("B", 110.0, 9.0, 0.3)];
        let first = screen(&contracts, &context(30), OptionKind::Call).unwrap();
        let second = screen(&contracts, &context(30), OptionKind::Call).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_contracts_reported_not_fatal() {
        let contracts = vec![
            contract("NEG_STRIKE", -10.0, 5.0, 0.2),
            contract("GOOD", 90.0, 50.0, 0.25),
            contract("NEG_IV", 100.0, 5.0, -0.2),
            contract("NEG_QUOTE", 100.0, -1.0, 0.2),
        ];
        let report = screen(&contracts, &context(30), OptionKind::Call).unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].identifier, "GOOD");
        let rejected: Vec<(&str, usize)> = report
            .rejected
            .iter()
            .map(|r| (r.identifier.as_str(), r.index))
            .collect();
        assert_eq!(rejected, vec![("NEG_STRIKE", 0), ("NEG_IV", 2), ("NEG_QUOTE", 3)]);
    }

    #[test]
    fn test_expiry_before_valuation_aborts() {
        let contracts = vec![contract("A", 90.0, 15.0, 0.25)];
        let result = screen(&contracts, &context(-1), OptionKind::Call);
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[test]
    fn test_expiry_day_uses_intrinsic() {
        let contracts = vec![contract("ITM", 90.0, 10.5, 0.25), contract("OTM", 110.0, 0.0, 0.25)];
        let report = screen(&contracts, &context(0), OptionKind::Call).unwrap();
        assert_eq!(report.results.len(), 1);
        assert!((report.results[0].theoretical_price - 10.0).abs() < 1e-9);
        assert!((report.results[0].premium - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_put_screen_uses_put_prices() {
        // Put values: K=110 ~ 14.36, K=90 ~ 3.84
        let contracts = vec![contract("CHEAP", 110.0, 12.0, 0.3), contract("RICH", 90.0, 5.0, 0.3)];
        let report = price_batch(&BlackScholes::new(), &contracts, 100.0, 0.01, 0.5, OptionKind::Put);
        let put_90 = black_scholes::price(100.0, 90.0, 0.5, 0.01, 0.3, OptionKind::Put).unwrap();
        let call_90 = black_scholes::price(100.0, 90.0, 0.5, 0.01, 0.3, OptionKind::Call).unwrap();

        assert_eq!(report.kind, OptionKind::Put);
        assert_eq!(report.results.len(), 1);
        let r = &report.results[0];
        assert_eq!(r.identifier, "RICH");
        assert!((r.theoretical_price - put_90).abs() < 1e-12);
        assert!((r.theoretical_price - call_90).abs() > 1.0);
        assert!((r.premium - (5.0 - put_90)).abs() < 1e-12);
    }
}
