//! NSE Screener Library
//!
//! A daily screener for NSE-listed stocks: fetch recent daily OHLCV
//! history per symbol, derive simple technical indicators, and classify
//! each symbol into dip, high-demand, combined dip+momentum, and
//! index-leader result lists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       nse-screener                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐    │
//! │  │  Market Data │──▶│  Indicators  │──▶│   Screener   │    │
//! │  │  (provider)  │   │  (RSI/SMA)   │   │   Engine     │    │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘    │
//! │          ▲                                    │            │
//! │  ┌───────┴──────┐                     ┌───────▼───────┐    │
//! │  │  TTL cache   │◀────────────────────│ ScreenerService│   │
//! │  │ (scan memo)  │                     │  + DailyReport │   │
//! │  └──────────────┘                     └───────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scans iterate their symbol list sequentially; a failure on one symbol
//! skips that symbol only. Scan outputs are memoized for a fixed TTL at
//! the service layer — the engine itself always recomputes.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod data;
pub mod indicators;
pub mod logging;
pub mod screener;

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::{AppConfig, SymbolSet};
use crate::data::{MarketDataProvider, TtlCache};
use crate::screener::{
    CombinedCandidate, DailyReport, DemandCandidate, DipScanResult, IndexLeader, LeaderSection,
    ScreenerEngine,
};

/// Cache key for the dip scan.
const DIP_SCAN_KEY: &str = "dips";
/// Cache key for the demand scan.
const DEMAND_SCAN_KEY: &str = "demand";
/// Cache key for the combined scan.
const COMBINED_SCAN_KEY: &str = "combined";

/// Screener service: the engine plus memoized scan entry points.
///
/// Each scan's output is cached under its identity (and the set name for
/// index leaders) for the configured TTL; a hit returns the previously
/// computed list without touching the provider. Caching never changes
/// computed values, only how often they are recomputed.
pub struct ScreenerService<P: MarketDataProvider> {
    config: AppConfig,
    engine: ScreenerEngine<P>,
    dip_cache: TtlCache<String, DipScanResult>,
    demand_cache: TtlCache<String, Vec<DemandCandidate>>,
    combined_cache: TtlCache<String, Vec<CombinedCandidate>>,
    leaders_cache: TtlCache<String, Vec<IndexLeader>>,
}

impl<P: MarketDataProvider> ScreenerService<P> {
    /// Create a new service around a provider.
    pub fn new(config: AppConfig, provider: Arc<P>) -> Self {
        let ttl = config.cache_ttl_secs;
        let engine = ScreenerEngine::new(provider, config.thresholds.clone());

        Self {
            config,
            engine,
            dip_cache: TtlCache::new(ttl),
            demand_cache: TtlCache::new(ttl),
            combined_cache: TtlCache::new(ttl),
            leaders_cache: TtlCache::new(ttl),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Buy-on-dip candidates over the configured universe.
    pub async fn dip_candidates(&self) -> DipScanResult {
        let key = DIP_SCAN_KEY.to_string();
        if let Some(cached) = self.dip_cache.get(&key) {
            debug!(scan = DIP_SCAN_KEY, "Returning cached scan result");
            return cached;
        }

        let result = self.engine.scan_dips(&self.config.universe).await;
        self.dip_cache.insert(key, result.clone());
        result
    }

    /// High-demand (volume momentum) candidates over the universe.
    pub async fn high_demand(&self) -> Vec<DemandCandidate> {
        let key = DEMAND_SCAN_KEY.to_string();
        if let Some(cached) = self.demand_cache.get(&key) {
            debug!(scan = DEMAND_SCAN_KEY, "Returning cached scan result");
            return cached;
        }

        let result = self.engine.scan_high_demand(&self.config.universe).await;
        self.demand_cache.insert(key, result.clone());
        result
    }

    /// Top combined dip + momentum candidates over the universe.
    pub async fn top_combined(&self) -> Vec<CombinedCandidate> {
        let key = COMBINED_SCAN_KEY.to_string();
        if let Some(cached) = self.combined_cache.get(&key) {
            debug!(scan = COMBINED_SCAN_KEY, "Returning cached scan result");
            return cached;
        }

        let result = self.engine.scan_top_combined(&self.config.universe).await;
        self.combined_cache.insert(key, result.clone());
        result
    }

    /// Leaders within one named symbol set.
    pub async fn index_leaders(&self, set: &SymbolSet) -> Vec<IndexLeader> {
        if let Some(cached) = self.leaders_cache.get(&set.name) {
            debug!(scan = "leaders", set = %set.name, "Returning cached scan result");
            return cached;
        }

        let result = self.engine.scan_index_leaders(&set.name, &set.symbols).await;
        self.leaders_cache.insert(set.name.clone(), result.clone());
        result
    }

    /// Run every scan and assemble the daily report.
    ///
    /// Returns the report together with the dip scan's chart frames so
    /// the presentation layer can chart a selected dip candidate.
    pub async fn daily_report(&self) -> (DailyReport, DipScanResult) {
        let dips = self.dip_candidates().await;
        let demand = self.high_demand().await;
        let top_combined = self.top_combined().await;

        let mut leader_sections = Vec::with_capacity(self.config.leader_sets.len());
        for set in &self.config.leader_sets {
            leader_sections.push(LeaderSection {
                name: set.name.clone(),
                leaders: self.index_leaders(set).await,
            });
        }

        let report = DailyReport {
            dips: dips.candidates.clone(),
            demand,
            top_combined,
            leader_sections,
            generated_at: Utc::now(),
        };

        (report, dips)
    }
}
