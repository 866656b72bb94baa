//! Application configuration.
//!
//! Loaded from a JSON file when one exists (`$NSE_SCREENER_CONFIG`, else
//! `<config dir>/nse-screener/config.json`), otherwise built entirely
//! from defaults. The symbol universes are named, immutable data here —
//! the scanners receive them as explicit inputs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::DEFAULT_RESULT_TTL_SECS;
use crate::screener::ScanThresholds;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "NSE_SCREENER_CONFIG";

// ============================================================================
// Symbol Sets
// ============================================================================

/// A named, immutable list of symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSet {
    /// Set name (e.g., "NIFTY")
    pub name: String,
    /// Constituent symbols
    pub symbols: Vec<String>,
}

impl SymbolSet {
    /// Create a set from static symbol strings.
    pub fn new(name: impl Into<String>, symbols: &[&str]) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// Application Config
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level directive (e.g., "info", "debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// TTL for memoized scan results, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// The NSE universe the three full scans iterate
    #[serde(default = "default_universe")]
    pub universe: Vec<String>,

    /// Named symbol sets for the index-leader scans
    #[serde(default = "default_leader_sets")]
    pub leader_sets: Vec<SymbolSet>,

    /// Scan rule thresholds
    #[serde(default)]
    pub thresholds: ScanThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            cache_ttl_secs: default_cache_ttl_secs(),
            universe: default_universe(),
            leader_sets: default_leader_sets(),
            thresholds: ScanThresholds::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults when no
    /// config file exists. A present-but-malformed file is an error.
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Look up a leader set by name.
    pub fn leader_set(&self, name: &str) -> Option<&SymbolSet> {
        self.leader_sets.iter().find(|s| s.name == name)
    }
}

/// Resolve the config file location.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| dir.join("nse-screener").join("config.json"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_cache_ttl_secs() -> i64 {
    DEFAULT_RESULT_TTL_SECS
}

/// The default NSE large-cap universe.
fn default_universe() -> Vec<String> {
    [
        "RELIANCE.NS",
        "TCS.NS",
        "INFY.NS",
        "HDFCBANK.NS",
        "ICICIBANK.NS",
        "SBIN.NS",
        "AXISBANK.NS",
        "KOTAKBANK.NS",
        "LT.NS",
        "ITC.NS",
        "HINDUNILVR.NS",
        "BHARTIARTL.NS",
        "ASIANPAINT.NS",
        "MARUTI.NS",
        "M&M.NS",
        "TATASTEEL.NS",
        "JSWSTEEL.NS",
        "SUNPHARMA.NS",
        "DRREDDY.NS",
        "CIPLA.NS",
        "ULTRACEMCO.NS",
        "NTPC.NS",
        "POWERGRID.NS",
        "ONGC.NS",
        "COALINDIA.NS",
        "HCLTECH.NS",
        "WIPRO.NS",
        "TECHM.NS",
        "BAJFINANCE.NS",
        "BAJAJFINSV.NS",
        "INDUSINDBK.NS",
        "TITAN.NS",
        "NESTLEIND.NS",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// The default index sets scanned for leaders.
fn default_leader_sets() -> Vec<SymbolSet> {
    vec![
        SymbolSet::new(
            "NIFTY",
            &[
                "RELIANCE.NS",
                "TCS.NS",
                "INFY.NS",
                "HDFCBANK.NS",
                "ICICIBANK.NS",
                "ITC.NS",
                "LT.NS",
                "BHARTIARTL.NS",
                "ASIANPAINT.NS",
                "MARUTI.NS",
                "SUNPHARMA.NS",
                "TITAN.NS",
            ],
        ),
        SymbolSet::new(
            "BANKNIFTY",
            &[
                "HDFCBANK.NS",
                "ICICIBANK.NS",
                "SBIN.NS",
                "AXISBANK.NS",
                "KOTAKBANK.NS",
                "INDUSINDBK.NS",
            ],
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================
