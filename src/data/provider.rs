//! Data provider abstraction for daily market data.
//!
//! Defines the `MarketDataProvider` trait the scan engine consumes, so
//! the HTTP-backed source can be swapped for a mock in tests.

use async_trait::async_trait;
use std::fmt;

use super::{Bar, FetchPeriod};

// ============================================================================
// Provider Error
// ============================================================================

/// Errors surfaced by a market data provider.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// Network error (connection failed, timeout)
    Network(String),
    /// Rate limit exceeded
    RateLimited { retry_after_secs: Option<u64> },
    /// Data not available for the requested symbol/period
    DataNotAvailable(String),
    /// Invalid request parameters
    InvalidRequest(String),
    /// Internal provider error
    Internal(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::RateLimited { retry_after_secs } => {
                write!(f, "Rate limited")?;
                if let Some(secs) = retry_after_secs {
                    write!(f, ", retry after {} seconds", secs)?;
                }
                Ok(())
            }
            Self::DataNotAvailable(msg) => write!(f, "Data not available: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Check if the error is transient (a later invocation may succeed).
    ///
    /// The scan engine never retries within a scan either way; callers
    /// such as the cache layer use this only for log verbosity.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimited { .. })
    }
}

// ============================================================================
// Market Data Provider Trait
// ============================================================================

/// Trait for market data providers.
///
/// The contract is deliberately narrow: daily bars for one symbol over a
/// fixed lookback period, oldest first. An unknown symbol and a transient
/// transport failure are indistinguishable to callers; both end in the
/// symbol being skipped.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the provider name (e.g., "yahoo")
    fn name(&self) -> &'static str;

    /// Fetch daily bars for a symbol.
    ///
    /// Returns bars ordered by ascending date with no duplicate dates.
    /// May return fewer bars than the period suggests when the symbol has
    /// limited history; may return an empty series.
    async fn daily_bars(
        &self,
        symbol: &str,
        period: FetchPeriod,
    ) -> Result<Vec<Bar>, ProviderError>;
}

// ============================================================================
// Tests
// ============================================================================
