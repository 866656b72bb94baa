//! Scan threshold configuration.
//!
//! Every classification rule reads its cutoffs from here so a deployment
//! can tune them without touching the engine.

use serde::{Deserialize, Serialize};

// ============================================================================
// Scan Thresholds
// ============================================================================

/// Thresholds for the four scan rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanThresholds {
    // === Dip scan ===
    /// RSI ceiling for a dip candidate (today's RSI must be below this)
    #[serde(default = "default_dip_max_rsi")]
    pub dip_max_rsi: f64,

    // === Demand (high-volume momentum) scan ===
    /// Today's volume must strictly exceed this multiple of AvgVol20
    #[serde(default = "default_volume_spike_ratio")]
    pub volume_spike_ratio: f64,

    /// Minimum percentage gain (strict) for a demand candidate
    #[serde(default = "default_demand_min_change")]
    pub demand_min_change: f64,

    /// Inclusive RSI band for momentum candidates
    #[serde(default = "default_momentum_rsi_floor")]
    pub momentum_rsi_floor: f64,

    #[serde(default = "default_momentum_rsi_ceiling")]
    pub momentum_rsi_ceiling: f64,

    // === Combined dip + momentum scorer ===
    /// RSI ceiling for the combined scorer's oversold condition
    #[serde(default = "default_combined_dip_rsi")]
    pub combined_dip_rsi: f64,

    /// Maximum relative distance from MA20 to count as "near the average"
    #[serde(default = "default_ma_proximity")]
    pub ma_proximity: f64,

    /// Minimum total score for a combined candidate
    #[serde(default = "default_combined_min_score")]
    pub combined_min_score: u32,

    /// Number of combined candidates kept after sorting
    #[serde(default = "default_combined_top_n")]
    pub combined_top_n: usize,

    // === Index leaders scan ===
    /// Minimum percentage gain (strict) for an index leader
    #[serde(default = "default_leader_min_change")]
    pub leader_min_change: f64,

    /// RSI floor (strict) for an index leader
    #[serde(default = "default_leader_min_rsi")]
    pub leader_min_rsi: f64,

    // === History minimums ===
    /// Minimum bars required by the three 3-month scans
    #[serde(default = "default_min_history_full")]
    pub min_history_full: usize,

    /// Minimum bars required by the index-leader scans
    #[serde(default = "default_min_history_leaders")]
    pub min_history_leaders: usize,
}

impl Default for ScanThresholds {
    fn default() -> Self {
        Self {
            dip_max_rsi: default_dip_max_rsi(),
            volume_spike_ratio: default_volume_spike_ratio(),
            demand_min_change: default_demand_min_change(),
            momentum_rsi_floor: default_momentum_rsi_floor(),
            momentum_rsi_ceiling: default_momentum_rsi_ceiling(),
            combined_dip_rsi: default_combined_dip_rsi(),
            ma_proximity: default_ma_proximity(),
            combined_min_score: default_combined_min_score(),
            combined_top_n: default_combined_top_n(),
            leader_min_change: default_leader_min_change(),
            leader_min_rsi: default_leader_min_rsi(),
            min_history_full: default_min_history_full(),
            min_history_leaders: default_min_history_leaders(),
        }
    }
}

fn default_dip_max_rsi() -> f64 {
    50.0
}

fn default_volume_spike_ratio() -> f64 {
    1.5
}

fn default_demand_min_change() -> f64 {
    1.0
}

fn default_momentum_rsi_floor() -> f64 {
    55.0
}

fn default_momentum_rsi_ceiling() -> f64 {
    70.0
}

fn default_combined_dip_rsi() -> f64 {
    45.0
}

fn default_ma_proximity() -> f64 {
    0.02
}

fn default_combined_min_score() -> u32 {
    5
}

fn default_combined_top_n() -> usize {
    3
}

fn default_leader_min_change() -> f64 {
    1.0
}

fn default_leader_min_rsi() -> f64 {
    55.0
}

fn default_min_history_full() -> usize {
    30
}

fn default_min_history_leaders() -> usize {
    10
}

// ============================================================================
// Tests
// ============================================================================
