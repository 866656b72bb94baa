//! Integration tests for scan-result memoization.
//!
//! The service caches each scan's output under its identity for a fixed
//! TTL; a hit must not touch the provider, and caching must never change
//! the computed rows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use nse_screener::config::AppConfig;
use nse_screener::data::{Bar, FetchPeriod, MarketDataProvider, ProviderError};
use nse_screener::ScreenerService;

// ============================================================================
// Counting Mock Provider
// ============================================================================

struct CountingProvider {
    series: HashMap<String, Vec<Bar>>,
    fetch_count: AtomicU32,
}

impl CountingProvider {
    fn new(series: HashMap<String, Vec<Bar>>) -> Self {
        Self {
            series,
            fetch_count: AtomicU32::new(0),
        }
    }

    fn fetches(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MarketDataProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting-mock"
    }

    async fn daily_bars(
        &self,
        symbol: &str,
        _period: FetchPeriod,
    ) -> Result<Vec<Bar>, ProviderError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::DataNotAvailable(symbol.to_string()))
    }
}

fn dip_bars() -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let mut closes = vec![100.0; 29];
    closes.push(95.0);

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

fn test_config(ttl_secs: i64) -> AppConfig {
    let mut config = AppConfig::default();
    config.universe = vec!["FALL.NS".to_string()];
    config.cache_ttl_secs = ttl_secs;
    config
}

fn service(ttl_secs: i64) -> (ScreenerService<CountingProvider>, Arc<CountingProvider>) {
    let mut series = HashMap::new();
    series.insert("FALL.NS".to_string(), dip_bars());

    let provider = Arc::new(CountingProvider::new(series));
    let svc = ScreenerService::new(test_config(ttl_secs), Arc::clone(&provider));
    (svc, provider)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn repeated_scan_within_ttl_does_not_refetch() {
    let (svc, provider) = service(3600);

    let first = svc.dip_candidates().await;
    assert_eq!(provider.fetches(), 1);

    let second = svc.dip_candidates().await;
    assert_eq!(provider.fetches(), 1, "cache hit must not refetch");

    assert_eq!(first.candidates.len(), second.candidates.len());
    assert_eq!(first.candidates[0].symbol, second.candidates[0].symbol);
    assert_eq!(first.candidates[0].price, second.candidates[0].price);
}

#[tokio::test]
async fn expired_cache_recomputes() {
    // A negative TTL stamps every entry already expired
    let (svc, provider) = service(-1);

    svc.dip_candidates().await;
    svc.dip_candidates().await;

    assert_eq!(provider.fetches(), 2);
}

#[tokio::test]
async fn scans_are_cached_independently() {
    let (svc, provider) = service(3600);

    svc.dip_candidates().await;
    let after_dip = provider.fetches();

    // A different scan has its own key and must fetch again
    svc.high_demand().await;
    assert!(provider.fetches() > after_dip);

    // But repeating it hits its own cache
    let after_demand = provider.fetches();
    svc.high_demand().await;
    assert_eq!(provider.fetches(), after_demand);
}

#[tokio::test]
async fn leader_sets_are_cached_by_name() {
    let (svc, provider) = service(3600);
    let config = svc.config().clone();

    let nifty = config.leader_set("NIFTY").unwrap();
    let banknifty = config.leader_set("BANKNIFTY").unwrap();

    svc.index_leaders(nifty).await;
    let after_nifty = provider.fetches();
    assert_eq!(after_nifty, nifty.symbols.len() as u32);

    // Second invocation for the same set is a cache hit
    svc.index_leaders(nifty).await;
    assert_eq!(provider.fetches(), after_nifty);

    // A differently named set is a distinct cache key
    svc.index_leaders(banknifty).await;
    assert_eq!(
        provider.fetches(),
        after_nifty + banknifty.symbols.len() as u32
    );
}
