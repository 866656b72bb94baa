//! Yahoo Finance chart API adapter.
//!
//! # API
//! `GET /v8/finance/chart/{symbol}?range={range}&interval=1d`
//!
//! The chart endpoint is unauthenticated and returns parallel arrays of
//! timestamps and quote fields. Trading halts show up as `null` entries
//! inside those arrays; such rows are dropped rather than surfaced as
//! zero-priced bars.
//!
//! # Coverage
//! - NSE symbols use the ".NS" suffix (e.g., "RELIANCE.NS")

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::provider::{MarketDataProvider, ProviderError};
use super::{Bar, FetchPeriod};

// ============================================================================
// Constants
// ============================================================================

/// Yahoo Finance API base URL
const YAHOO_API_BASE: &str = "https://query1.finance.yahoo.com";

/// Chart (K-line) endpoint
const CHART_ENDPOINT: &str = "/v8/finance/chart";

/// Yahoo rejects requests without a browser-like user agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

/// Retry delay reported after a rate limit error (seconds)
const RATE_LIMIT_RETRY_SECS: u64 = 60;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

// ============================================================================
// Yahoo Finance Adapter
// ============================================================================

/// Yahoo Finance adapter for daily NSE market data.
pub struct YahooFinanceAdapter {
    /// HTTP client
    client: reqwest::Client,
    /// API base URL (overridable for tests)
    base_url: String,
}

impl YahooFinanceAdapter {
    /// Create a new adapter against the public Yahoo endpoint.
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_API_BASE)
    }

    /// Create an adapter against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        period: FetchPeriod,
    ) -> Result<Vec<Bar>, ProviderError> {
        if symbol.is_empty() || symbol.contains('/') || symbol.contains('?') {
            return Err(ProviderError::InvalidRequest(format!(
                "Invalid symbol: {:?}",
                symbol
            )));
        }

        let url = format!(
            "{}{}/{}?range={}&interval=1d",
            self.base_url,
            CHART_ENDPOINT,
            symbol,
            period.as_range_param()
        );

        debug!(url = %url, symbol, "Fetching daily bars from Yahoo");

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Network("Request timeout".into())
                } else if e.is_connect() {
                    ProviderError::Network("Connection failed".into())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::DataNotAvailable(format!(
                "Unknown symbol: {}",
                symbol
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                retry_after_secs: Some(RATE_LIMIT_RETRY_SECS),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Internal(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let result: ChartResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Internal(format!("Failed to parse response: {}", e)))?;

        parse_chart(symbol, result)
    }
}

impl Default for YahooFinanceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the chart envelope into ordered daily bars.
fn parse_chart(symbol: &str, response: ChartResponse) -> Result<Vec<Bar>, ProviderError> {
    if let Some(err) = response.chart.error {
        return Err(ProviderError::DataNotAvailable(format!(
            "{}: {}",
            err.code, err.description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| {
            ProviderError::DataNotAvailable(format!("Empty chart result for {}", symbol))
        })?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let date = match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };

        // All five fields must be present; halted sessions come back null
        let row = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );

        if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row {
            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    // Enforce the series invariant: ascending dates, no duplicates
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    Ok(bars)
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooFinanceAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn daily_bars(
        &self,
        symbol: &str,
        period: FetchPeriod,
    ) -> Result<Vec<Bar>, ProviderError> {
        self.fetch_chart(symbol, period).await
    }
}

// ============================================================================
// Tests
// ============================================================================
