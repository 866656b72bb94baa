//! Market data module for NSE daily bars.
//!
//! Provides the core OHLCV types, the provider abstraction, the Yahoo
//! Finance adapter, and the TTL cache used to memoize scan results.

mod cache;
mod provider;
mod yahoo;

pub use cache::{TtlCache, DEFAULT_RESULT_TTL_SECS};
pub use provider::{MarketDataProvider, ProviderError};
pub use yahoo::YahooFinanceAdapter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Data Types
// ============================================================================

/// Lookback period for a daily-bar fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPeriod {
    /// Roughly one calendar month of daily bars
    OneMonth,
    /// Roughly three calendar months of daily bars
    ThreeMonths,
}

impl FetchPeriod {
    /// Parse from string (e.g., "1mo", "3mo")
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1mo" | "1m" => Some(Self::OneMonth),
            "3mo" | "3m" => Some(Self::ThreeMonths),
            _ => None,
        }
    }

    /// Convert to the API range parameter
    pub fn as_range_param(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
        }
    }

    /// Approximate number of trading days covered
    pub fn approx_trading_days(&self) -> usize {
        match self {
            Self::OneMonth => 22,
            Self::ThreeMonths => 66,
        }
    }
}

impl std::fmt::Display for FetchPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_range_param())
    }
}

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl Bar {
    /// Percentage close-over-close change from the previous bar.
    ///
    /// Returns `None` when the previous close is zero or either close is
    /// not finite, so a degenerate bar can never poison a scan.
    pub fn change_percent_from(&self, prev: &Bar) -> Option<f64> {
        if prev.close == 0.0 || !prev.close.is_finite() || !self.close.is_finite() {
            return None;
        }
        Some((self.close - prev.close) / prev.close * 100.0)
    }

    /// Full range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Check the series invariant: ascending dates, no duplicates.
pub fn is_ordered_series(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, close: f64) -> Bar {
        Bar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn test_period_round_trip() {
        assert_eq!(FetchPeriod::from_str("1mo"), Some(FetchPeriod::OneMonth));
        assert_eq!(FetchPeriod::from_str("3MO"), Some(FetchPeriod::ThreeMonths));
        assert_eq!(FetchPeriod::from_str("6mo"), None);
        assert_eq!(FetchPeriod::ThreeMonths.as_range_param(), "3mo");
    }

    #[test]
    fn test_change_percent_exact() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let yesterday = bar(d1, 100.0);
        let today = bar(d2, 95.0);

        assert_eq!(today.change_percent_from(&yesterday), Some(-5.0));
    }

    #[test]
    fn test_change_percent_zero_close_is_none() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let yesterday = bar(d1, 0.0);
        let today = bar(d2, 95.0);

        assert_eq!(today.change_percent_from(&yesterday), None);
    }

    #[test]
    fn test_ordered_series() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

        assert!(is_ordered_series(&[bar(d1, 1.0), bar(d2, 2.0)]));
        assert!(!is_ordered_series(&[bar(d2, 1.0), bar(d1, 2.0)]));
        assert!(!is_ordered_series(&[bar(d1, 1.0), bar(d1, 2.0)]));
        assert!(is_ordered_series(&[]));
    }
}
