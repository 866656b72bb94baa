//! Scan engine module.
//!
//! The four classification scans share one shape: fetch a symbol's daily
//! series, derive indicators, evaluate the latest bar against a rule, and
//! collect qualifying rows. A failure anywhere in that chain skips the
//! one symbol and the scan continues; the skip policy is an explicit
//! `Result` contract rather than a catch-all.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::{FetchPeriod, MarketDataProvider};
use crate::indicators::{IndicatorFrame, RSI_WINDOW};

use super::config::ScanThresholds;

// ============================================================================
// Skip Reason
// ============================================================================

/// Why a single symbol was dropped from a scan.
///
/// Skips are per-symbol and never abort the surrounding scan. A symbol
/// either contributes a complete row or is entirely absent.
#[derive(Debug, Clone, Error)]
pub enum SkipReason {
    /// The provider failed or returned an empty series. Callers cannot
    /// (and must not) distinguish an unknown symbol from a transient
    /// fetch failure.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// The series is too short for the scan or for the indicator warm-up.
    #[error("insufficient history: {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    /// An arithmetic fault while deriving or evaluating indicators.
    #[error("computation fault: {0}")]
    ComputationFault(&'static str),
}

// ============================================================================
// Result Rows
// ============================================================================

/// A stock that fell today with a weak RSI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DipCandidate {
    /// Symbol (e.g., "RELIANCE.NS")
    pub symbol: String,
    /// Latest close price
    pub price: f64,
    /// Close-over-close change (%)
    pub change_pct: f64,
    /// RSI(14) at the latest bar
    pub rsi: f64,
}

/// A stock with a volume spike behind a >1% gain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandCandidate {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    /// Today's traded volume
    pub volume: u64,
    pub rsi: f64,
}

/// A stock scored across the combined dip + momentum conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedCandidate {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    pub rsi: f64,
    /// Accumulated rule score
    pub score: u32,
}

/// A constituent leading its index today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexLeader {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    pub rsi: f64,
}

/// Dip scan output: qualifying rows plus the full indicator frame per
/// qualifying symbol, so the presentation layer can chart a selection
/// without another fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DipScanResult {
    /// Qualifying rows in universe order
    pub candidates: Vec<DipCandidate>,
    /// Chart payloads keyed by symbol
    pub frames: HashMap<String, IndicatorFrame>,
}

impl DipScanResult {
    /// Chart payload for one qualifying symbol.
    pub fn frame(&self, symbol: &str) -> Option<&IndicatorFrame> {
        self.frames.get(symbol)
    }

    /// Whether the scan produced zero candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ============================================================================
// Qualification Rules
// ============================================================================

/// Dip rule: fell today with RSI below the ceiling.
pub fn dip_qualifies(change_pct: f64, rsi: f64, t: &ScanThresholds) -> bool {
    change_pct < 0.0 && rsi < t.dip_max_rsi
}

/// Demand rule: strict volume spike, strict gain floor, inclusive RSI band.
pub fn demand_qualifies(
    volume: f64,
    avg_vol: f64,
    change_pct: f64,
    rsi: f64,
    t: &ScanThresholds,
) -> bool {
    volume > t.volume_spike_ratio * avg_vol
        && change_pct > t.demand_min_change
        && (t.momentum_rsi_floor..=t.momentum_rsi_ceiling).contains(&rsi)
}

/// Combined dip + momentum score.
///
/// Six conditions worth 2 points each, except MA proximity at 1. The dip
/// and momentum change conditions are mutually exclusive, so the real
/// maximum is 9.
pub fn combined_score(
    change_pct: f64,
    rsi: f64,
    close: f64,
    ma20: f64,
    volume: f64,
    avg_vol: f64,
    t: &ScanThresholds,
) -> u32 {
    let mut score = 0;

    // Dip conditions
    if change_pct < 0.0 {
        score += 2;
    }
    if rsi < t.combined_dip_rsi {
        score += 2;
    }
    if (close - ma20).abs() / ma20 < t.ma_proximity {
        score += 1;
    }

    // Momentum conditions
    if change_pct > 0.0 {
        score += 2;
    }
    if volume > t.volume_spike_ratio * avg_vol {
        score += 2;
    }
    if (t.momentum_rsi_floor..=t.momentum_rsi_ceiling).contains(&rsi) {
        score += 2;
    }

    score
}

/// Index leader rule: strict gain floor and strict RSI floor.
pub fn leader_qualifies(change_pct: f64, rsi: f64, t: &ScanThresholds) -> bool {
    change_pct > t.leader_min_change && rsi > t.leader_min_rsi
}

/// Round to two decimals for display rows.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Latest-Bar Snapshot
// ============================================================================

/// The values every rule reads off the two most recent bars.
struct LatestSnapshot {
    close: f64,
    volume: f64,
    change_pct: f64,
    rsi: f64,
}

fn latest_snapshot(frame: &IndicatorFrame) -> Result<LatestSnapshot, SkipReason> {
    let today = frame
        .latest()
        .ok_or(SkipReason::ComputationFault("empty frame"))?;

    if frame.previous().is_none() {
        return Err(SkipReason::InsufficientHistory {
            have: frame.len(),
            need: 2,
        });
    }

    let change_pct = frame
        .latest_change_percent()
        .ok_or(SkipReason::ComputationFault("zero previous close"))?;

    let rsi = frame
        .latest_rsi()
        .ok_or(SkipReason::InsufficientHistory {
            have: frame.len(),
            need: RSI_WINDOW + 1,
        })?;

    Ok(LatestSnapshot {
        close: today.close,
        volume: today.volume,
        change_pct,
        rsi,
    })
}

// ============================================================================
// Screener Engine
// ============================================================================

/// The scan engine.
///
/// Generic over the data provider so scans run against a mock in tests.
/// Holds no caches and no per-scan state; every invocation recomputes
/// from fresh fetches. Memoization belongs to the service layer.
pub struct ScreenerEngine<P: MarketDataProvider> {
    provider: Arc<P>,
    thresholds: ScanThresholds,
}

impl<P: MarketDataProvider> ScreenerEngine<P> {
    /// Create a new engine.
    pub fn new(provider: Arc<P>, thresholds: ScanThresholds) -> Self {
        Self {
            provider,
            thresholds,
        }
    }

    /// The thresholds this engine scans with.
    pub fn thresholds(&self) -> &ScanThresholds {
        &self.thresholds
    }

    /// Fetch a symbol's series and derive its indicator frame.
    async fn fetch_frame(
        &self,
        symbol: &str,
        period: FetchPeriod,
        min_bars: usize,
    ) -> Result<IndicatorFrame, SkipReason> {
        let bars = self
            .provider
            .daily_bars(symbol, period)
            .await
            .map_err(|e| SkipReason::DataUnavailable(e.to_string()))?;

        if bars.is_empty() {
            return Err(SkipReason::DataUnavailable("empty series".into()));
        }

        if bars.len() < min_bars {
            return Err(SkipReason::InsufficientHistory {
                have: bars.len(),
                need: min_bars,
            });
        }

        Ok(IndicatorFrame::compute(symbol, bars))
    }

    // ========================================================================
    // Dip Scan
    // ========================================================================

    /// Evaluate one symbol against the dip rule.
    ///
    /// `Ok(None)` means the symbol was evaluated and did not qualify;
    /// `Err` means it could not be evaluated at all.
    async fn evaluate_dip(
        &self,
        symbol: &str,
    ) -> Result<Option<(DipCandidate, IndicatorFrame)>, SkipReason> {
        let frame = self
            .fetch_frame(
                symbol,
                FetchPeriod::ThreeMonths,
                self.thresholds.min_history_full,
            )
            .await?;
        let snap = latest_snapshot(&frame)?;

        if !dip_qualifies(snap.change_pct, snap.rsi, &self.thresholds) {
            return Ok(None);
        }

        let row = DipCandidate {
            symbol: symbol.to_string(),
            price: round2(snap.close),
            change_pct: round2(snap.change_pct),
            rsi: round2(snap.rsi),
        };

        Ok(Some((row, frame)))
    }

    /// Scan the universe for buy-on-dip candidates.
    pub async fn scan_dips(&self, universe: &[String]) -> DipScanResult {
        let mut candidates = Vec::new();
        let mut frames = HashMap::new();

        for symbol in universe {
            match self.evaluate_dip(symbol).await {
                Ok(Some((row, frame))) => {
                    frames.insert(symbol.clone(), frame);
                    candidates.push(row);
                }
                Ok(None) => {}
                Err(reason) => debug!(symbol = %symbol, %reason, "Skipping symbol"),
            }
        }

        info!(
            scanned = universe.len(),
            candidates = candidates.len(),
            "Dip scan complete"
        );

        DipScanResult { candidates, frames }
    }

    // ========================================================================
    // Demand Scan
    // ========================================================================

    async fn evaluate_demand(&self, symbol: &str) -> Result<Option<DemandCandidate>, SkipReason> {
        let frame = self
            .fetch_frame(
                symbol,
                FetchPeriod::ThreeMonths,
                self.thresholds.min_history_full,
            )
            .await?;
        let snap = latest_snapshot(&frame)?;

        let avg_vol = frame
            .latest_avg_vol20()
            .ok_or(SkipReason::ComputationFault("volume average undefined"))?;

        if !demand_qualifies(snap.volume, avg_vol, snap.change_pct, snap.rsi, &self.thresholds) {
            return Ok(None);
        }

        Ok(Some(DemandCandidate {
            symbol: symbol.to_string(),
            price: round2(snap.close),
            change_pct: round2(snap.change_pct),
            volume: snap.volume.max(0.0) as u64,
            rsi: round2(snap.rsi),
        }))
    }

    /// Scan the universe for high-demand (volume momentum) candidates.
    pub async fn scan_high_demand(&self, universe: &[String]) -> Vec<DemandCandidate> {
        let mut candidates = Vec::new();

        for symbol in universe {
            match self.evaluate_demand(symbol).await {
                Ok(Some(row)) => candidates.push(row),
                Ok(None) => {}
                Err(reason) => debug!(symbol = %symbol, %reason, "Skipping symbol"),
            }
        }

        info!(
            scanned = universe.len(),
            candidates = candidates.len(),
            "Demand scan complete"
        );

        candidates
    }

    // ========================================================================
    // Combined Dip + Momentum Scan
    // ========================================================================

    async fn evaluate_combined(
        &self,
        symbol: &str,
    ) -> Result<Option<CombinedCandidate>, SkipReason> {
        let frame = self
            .fetch_frame(
                symbol,
                FetchPeriod::ThreeMonths,
                self.thresholds.min_history_full,
            )
            .await?;
        let snap = latest_snapshot(&frame)?;

        let ma20 = frame
            .latest_ma20()
            .ok_or(SkipReason::ComputationFault("price average undefined"))?;
        let avg_vol = frame
            .latest_avg_vol20()
            .ok_or(SkipReason::ComputationFault("volume average undefined"))?;

        if ma20 == 0.0 {
            return Err(SkipReason::ComputationFault("zero price average"));
        }

        let score = combined_score(
            snap.change_pct,
            snap.rsi,
            snap.close,
            ma20,
            snap.volume,
            avg_vol,
            &self.thresholds,
        );

        if score < self.thresholds.combined_min_score {
            return Ok(None);
        }

        Ok(Some(CombinedCandidate {
            symbol: symbol.to_string(),
            price: round2(snap.close),
            change_pct: round2(snap.change_pct),
            rsi: round2(snap.rsi),
            score,
        }))
    }

    /// Scan the universe for the top combined dip + momentum candidates.
    ///
    /// Results are sorted by score descending (stable, so universe order
    /// breaks ties) and truncated to the configured top N.
    pub async fn scan_top_combined(&self, universe: &[String]) -> Vec<CombinedCandidate> {
        let mut candidates = Vec::new();

        for symbol in universe {
            match self.evaluate_combined(symbol).await {
                Ok(Some(row)) => candidates.push(row),
                Ok(None) => {}
                Err(reason) => debug!(symbol = %symbol, %reason, "Skipping symbol"),
            }
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(self.thresholds.combined_top_n);

        info!(
            scanned = universe.len(),
            candidates = candidates.len(),
            "Combined scan complete"
        );

        candidates
    }

    // ========================================================================
    // Index Leaders Scan
    // ========================================================================

    async fn evaluate_leader(&self, symbol: &str) -> Result<Option<IndexLeader>, SkipReason> {
        let frame = self
            .fetch_frame(
                symbol,
                FetchPeriod::OneMonth,
                self.thresholds.min_history_leaders,
            )
            .await?;
        let snap = latest_snapshot(&frame)?;

        if !leader_qualifies(snap.change_pct, snap.rsi, &self.thresholds) {
            return Ok(None);
        }

        Ok(Some(IndexLeader {
            symbol: symbol.to_string(),
            price: round2(snap.close),
            change_pct: round2(snap.change_pct),
            rsi: round2(snap.rsi),
        }))
    }

    /// Scan one named symbol set for index leaders.
    ///
    /// The set is an explicit input; invoking this with different sets
    /// produces independent result lists.
    pub async fn scan_index_leaders(&self, set_name: &str, symbols: &[String]) -> Vec<IndexLeader> {
        let mut leaders = Vec::new();

        for symbol in symbols {
            match self.evaluate_leader(symbol).await {
                Ok(Some(row)) => leaders.push(row),
                Ok(None) => {}
                Err(reason) => debug!(symbol = %symbol, %reason, "Skipping symbol"),
            }
        }

        info!(
            set = set_name,
            scanned = symbols.len(),
            leaders = leaders.len(),
            "Index leaders scan complete"
        );

        leaders
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> ScanThresholds {
        ScanThresholds::default()
    }

    #[test]
    fn test_dip_rule() {
        assert!(dip_qualifies(-0.5, 49.9, &t()));
        assert!(!dip_qualifies(0.0, 49.9, &t())); // flat day is not a dip
        assert!(!dip_qualifies(-0.5, 50.0, &t())); // RSI cutoff is strict
        assert!(!dip_qualifies(1.0, 30.0, &t()));
    }

    #[test]
    fn test_demand_rule_strict_volume_ratio() {
        // Ratio exactly 1.5 does not qualify; one share more does
        assert!(!demand_qualifies(150.0, 100.0, 2.0, 60.0, &t()));
        assert!(demand_qualifies(151.0, 100.0, 2.0, 60.0, &t()));
    }

    #[test]
    fn test_demand_rule_change_and_rsi_band() {
        assert!(!demand_qualifies(200.0, 100.0, 1.0, 60.0, &t())); // change must exceed 1
        assert!(demand_qualifies(200.0, 100.0, 1.01, 55.0, &t())); // band floor inclusive
        assert!(demand_qualifies(200.0, 100.0, 1.01, 70.0, &t())); // band ceiling inclusive
        assert!(!demand_qualifies(200.0, 100.0, 1.01, 70.01, &t()));
        assert!(!demand_qualifies(200.0, 100.0, 1.01, 54.99, &t()));
    }

    #[test]
    fn test_combined_score_spec_example() {
        // close=100, MA20=100, change=-3, RSI=40, no volume spike
        // dip(2) + oversold(2) + near-MA(1) = 5
        let score = combined_score(-3.0, 40.0, 100.0, 100.0, 100.0, 100.0, &t());
        assert_eq!(score, 5);
    }

    #[test]
    fn test_combined_score_momentum_side() {
        // gain + spike + RSI band = 2 + 2 + 2 = 6
        let score = combined_score(2.0, 60.0, 110.0, 100.0, 200.0, 100.0, &t());
        assert_eq!(score, 6);
    }

    #[test]
    fn test_combined_score_change_conditions_exclusive() {
        // The dip and momentum change conditions can never both fire, so
        // the attainable maximum is 9, not 11.
        let dip_side = combined_score(-1.0, 40.0, 100.0, 100.0, 200.0, 100.0, &t());
        assert_eq!(dip_side, 7); // dip 2 + oversold 2 + near-MA 1 + spike 2

        let momentum_side = combined_score(1.5, 60.0, 100.0, 100.0, 200.0, 100.0, &t());
        assert_eq!(momentum_side, 7); // momentum 2 + spike 2 + band 2 + near-MA 1

        let flat = combined_score(0.0, 60.0, 100.0, 100.0, 200.0, 100.0, &t());
        assert_eq!(flat, 5); // a flat day earns neither change condition
    }

    #[test]
    fn test_leader_rule_strict_inequalities() {
        assert!(leader_qualifies(1.5, 56.0, &t()));
        assert!(!leader_qualifies(1.0, 56.0, &t())); // exactly 1.0 fails
        assert!(!leader_qualifies(1.5, 55.0, &t())); // exactly 55 fails
    }

    #[test]
    fn test_dip_rule_monotonic_in_rsi_threshold() {
        // Tightening the RSI ceiling can only shrink the qualifying set
        let samples: Vec<(f64, f64)> = vec![(-1.0, 20.0), (-2.0, 45.0), (-0.5, 49.0), (-3.0, 60.0)];

        let loose = t();
        let mut tight = t();
        tight.dip_max_rsi = 35.0;

        for (change, rsi) in samples {
            if dip_qualifies(change, rsi, &tight) {
                assert!(dip_qualifies(change, rsi, &loose));
            }
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(-1.0416667), -1.04);
        assert_eq!(round2(99.996), 100.0);
        assert_eq!(round2(55.554), 55.55);
    }
}
