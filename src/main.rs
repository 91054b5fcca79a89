use chrono::NaiveDate;
use clap::Parser;
use premium_screener::cli::{Cli, OutputFormat};
use premium_screener::config;
use premium_screener::errors::ScreenerResult;
use premium_screener::feeds::chain_file::ChainFile;
use premium_screener::feeds::yahoo::YahooFinance;
use premium_screener::feeds::MarketDataSource;
use premium_screener::models::OptionKind;
use premium_screener::report;
use premium_screener::screener::{self, types::{ScreenReport, ValuationContext}};

/// One screening run: which chain to fetch and how to value it.
#[derive(Debug, Clone)]
struct ScreenRequest {
    ticker: String,
    expiration: NaiveDate,
    valuation_date: NaiveDate,
    risk_free_rate: f64,
    kind: OptionKind,
}

#[tokio::main]
async fn main() {
    // Structured logging on stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let request = ScreenRequest {
        ticker: cli.ticker.clone(),
        expiration: cli.expiration,
        valuation_date: cli
            .valuation_date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        risk_free_rate: cli.rate.unwrap_or(cfg.risk_free_rate),
        kind: cli.kind,
    };

    tracing::info!(
        ticker = %request.ticker,
        expiration = %request.expiration,
        valuation_date = %request.valuation_date,
        rate = request.risk_free_rate,
        kind = %request.kind,
        "premium screen starting"
    );

    let result = match &cli.chain_file {
        Some(path) => match ChainFile::load(path) {
            Ok(source) => screen_ticker(&source, &request).await,
            Err(e) => Err(e),
        },
        None => {
            let source = YahooFinance::new(&cfg.market_data_base_url, cfg.http_timeout_secs);
            screen_ticker(&source, &request).await
        }
    };

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    match cli.output {
        OutputFormat::Text => print!("{}", report::render_text(&request.ticker, &report)),
        OutputFormat::Json => match report::render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        },
    }
}

/// Fetches spot and chain from `source`, then screens the chain.
async fn screen_ticker<S: MarketDataSource>(
    source: &S,
    request: &ScreenRequest,
) -> ScreenerResult<ScreenReport> {
    let (spot_price, contracts) = tokio::try_join!(
        source.spot_price(&request.ticker, request.expiration),
        source.option_chain(&request.ticker, request.expiration, request.kind),
    )?;

    tracing::info!(
        source = source.name(),
        spot = spot_price,
        contracts = contracts.len(),
        "market data ready"
    );

    let context = ValuationContext {
        spot_price,
        risk_free_rate: request.risk_free_rate,
        valuation_date: request.valuation_date,
        expiration_date: request.expiration,
    };

    let report = screener::screen(&contracts, &context, request.kind)?;

    tracing::info!(
        flagged = report.results.len(),
        rejected = report.rejected.len(),
        evaluated = report.evaluated,
        "premium screen complete"
    );

    Ok(report)
}
