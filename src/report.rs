use crate::errors::ScreenerResult;
use crate::screener::types::ScreenReport;
use std::fmt::Write;

/// Plain-text table of flagged contracts, then any rejected ones.
pub fn render_text(ticker: &str, report: &ScreenReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{ticker} {} spot={:.2} T={:.4}y: {} of {} contracts above model value",
        report.kind,
        report.spot_price,
        report.time_to_expiration,
        report.results.len(),
        report.evaluated,
    );

    if !report.results.is_empty() {
        let width = report
            .results
            .iter()
            .map(|r| r.identifier.len())
            .max()
            .unwrap_or(0)
            .max("contract".len());

        let _ = writeln!(
            out,
            "{:<width$}  {:>10}  {:>10}  {:>10}  {:>10}",
            "contract", "strike", "last", "bs_price", "premium"
        );
        for r in &report.results {
            let _ = writeln!(
                out,
                "{:<width$}  {:>10.2}  {:>10.2}  {:>10.4}  {:>10.4}",
                r.identifier, r.strike, r.quoted_price, r.theoretical_price, r.premium
            );
        }
    }

    if !report.rejected.is_empty() {
        let _ = writeln!(out, "skipped {} invalid contracts:", report.rejected.len());
        for r in &report.rejected {
            let _ = writeln!(out, "  #{} {}: {}", r.index, r.identifier, r.reason);
        }
    }

    out
}

pub fn render_json(report: &ScreenReport) -> ScreenerResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
