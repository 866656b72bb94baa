//! Daily stock screener module.
//!
//! Four independent scans over a symbol universe, each fetching daily
//! bars, deriving indicators, and testing the latest bar against its
//! rule:
//!
//! 1. **Dip** — fell today with RSI(14) below 50.
//! 2. **Demand** — volume spike over AvgVol20 behind a >1% gain with
//!    RSI in the 55-70 band.
//! 3. **Combined** — weighted dip + momentum score, top 3 kept.
//! 4. **Index leaders** — >1% gain and RSI above 55 within a named
//!    symbol set, over a shorter 1-month window.
//!
//! A symbol that cannot be fetched or evaluated is skipped with a
//! [`SkipReason`]; a scan never fails as a whole.

pub mod config;
pub mod engine;
pub mod report;

pub use config::ScanThresholds;
pub use engine::{
    combined_score, demand_qualifies, dip_qualifies, leader_qualifies, CombinedCandidate,
    DemandCandidate, DipCandidate, DipScanResult, IndexLeader, ScreenerEngine, SkipReason,
};
pub use report::{DailyReport, LeaderSection, ReportFormat};
