//! Technical indicator computation.
//!
//! Pure functions over close/volume series, plus `IndicatorFrame`, a bar
//! series augmented with aligned derived columns. Every column has the
//! same length as its input; entries before the lookback window is
//! satisfied are `None` rather than a guessed value, so a warm-up bar can
//! never qualify a symbol by accident.

use serde::{Deserialize, Serialize};

use crate::data::Bar;

/// RSI lookback window (bars of close-over-close changes).
pub const RSI_WINDOW: usize = 14;

/// Moving-average window for MA20 and AvgVol20.
pub const MA_WINDOW: usize = 20;

// ============================================================================
// Rolling Indicators
// ============================================================================

/// Simple moving average with a trailing window ending at each index.
///
/// The first `window - 1` entries are `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }

    out
}

/// Wilder relative-strength index over close prices.
///
/// Seed averages are simple means of the first `window` gains/losses;
/// subsequent values use Wilder smoothing. The first `window` entries are
/// `None` (the first value needs `window + 1` closes). When the average
/// loss is zero the RSI is 100 by convention, which also covers an
/// entirely flat series.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=window {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= window as f64;
    avg_loss /= window as f64;

    out[window] = Some(rsi_from_averages(avg_gain, avg_loss));

    let w = window as f64;
    for i in (window + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (avg_gain * (w - 1.0) + gain) / w;
        avg_loss = (avg_loss * (w - 1.0) + loss) / w;

        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

// ============================================================================
// Indicator Frame
// ============================================================================

/// A bar series augmented with derived indicator columns.
///
/// All columns share the index of `bars`. This is also the chart payload
/// handed to the presentation layer for a selected symbol (close + MA20
/// overlay, RSI panel).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorFrame {
    /// Symbol the series belongs to
    pub symbol: String,
    /// Underlying daily bars, ascending by date
    pub bars: Vec<Bar>,
    /// RSI(14) column
    pub rsi: Vec<Option<f64>>,
    /// 20-bar simple moving average of close
    pub ma20: Vec<Option<f64>>,
    /// 20-bar simple moving average of volume
    pub avg_vol20: Vec<Option<f64>>,
}

impl IndicatorFrame {
    /// Compute all derived columns for a series.
    pub fn compute(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        Self {
            symbol: symbol.into(),
            rsi: rsi(&closes, RSI_WINDOW),
            ma20: sma(&closes, MA_WINDOW),
            avg_vol20: sma(&volumes, MA_WINDOW),
            bars,
        }
    }

    /// Number of bars in the frame.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the frame holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar ("today").
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The second most recent bar ("yesterday").
    pub fn previous(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).and_then(|i| self.bars.get(i))
    }

    /// RSI at the most recent bar, if the warm-up window is satisfied.
    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().flatten()
    }

    /// MA20 at the most recent bar.
    pub fn latest_ma20(&self) -> Option<f64> {
        self.ma20.last().copied().flatten()
    }

    /// AvgVol20 at the most recent bar.
    pub fn latest_avg_vol20(&self) -> Option<f64> {
        self.avg_vol20.last().copied().flatten()
    }

    /// Percentage close-over-close change of the most recent bar.
    pub fn latest_change_percent(&self) -> Option<f64> {
        let today = self.latest()?;
        let yesterday = self.previous()?;
        today.change_percent_from(yesterday)
    }
}

// ============================================================================
// Tests
// ============================================================================
