//! NSE Screener - daily buy-on-dip and momentum scanner for NSE stocks.
//!
//! Runs the four scans once and prints the assembled Markdown report.
//! When the primary dip scan finds nothing, the run stops there by
//! design; the remaining scans are not executed.

use std::sync::Arc;

use anyhow::Result;
use nse_screener::config::AppConfig;
use nse_screener::data::YahooFinanceAdapter;
use nse_screener::logging::init_logging;
use nse_screener::ScreenerService;

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = AppConfig::load()?;

    init_logging(&config.log_level, &config.log_format);

    tracing::info!("NSE Screener v{}", env!("CARGO_PKG_VERSION"));

    let provider = Arc::new(YahooFinanceAdapter::new());
    let service = ScreenerService::new(config, provider);

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    // The dip scan is the primary view; an empty result halts the run.
    let dips = service.dip_candidates().await;
    if dips.is_empty() {
        tracing::info!("Dip scan returned no candidates, stopping");
        println!("No good buy-on-dip candidates today.");
        return Ok(());
    }

    let (report, _frames) = service.daily_report().await;
    println!("{}", report.to_markdown());

    Ok(())
}
