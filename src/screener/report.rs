//! Report generation for scan results.
//!
//! Assembles the four result lists into one daily report, rendered as
//! Markdown for humans or JSON for downstream consumers. An empty result
//! list is a state with its own message, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::{CombinedCandidate, DemandCandidate, DipCandidate, IndexLeader};

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Markdown format (human-readable)
    Markdown,
    /// JSON format (machine-readable)
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

// ============================================================================
// Daily Report
// ============================================================================

/// One index's leader list, labeled by its set name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderSection {
    /// Symbol set name (e.g., "NIFTY")
    pub name: String,
    /// Qualifying leaders in set order
    pub leaders: Vec<IndexLeader>,
}

/// The assembled output of one daily scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    /// Buy-on-dip candidates
    pub dips: Vec<DipCandidate>,
    /// High-demand candidates
    pub demand: Vec<DemandCandidate>,
    /// Top combined dip + momentum candidates
    pub top_combined: Vec<CombinedCandidate>,
    /// One section per scanned index set
    pub leader_sections: Vec<LeaderSection>,
    /// When the report was assembled
    pub generated_at: DateTime<Utc>,
}

impl DailyReport {
    /// Render the report in the requested format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Markdown rendering with one section per scan.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "# Daily NSE Screener\n\n**Generated**: {} UTC\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));

        md.push_str("## Stocks Down Today (Buy-on-Dip)\n\n");
        if self.dips.is_empty() {
            md.push_str("No good buy-on-dip candidates today.\n\n");
        } else {
            md.push_str("| Stock | Price | % Change | RSI |\n");
            md.push_str("|-------|-------|----------|-----|\n");
            for row in &self.dips {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:.2} |\n",
                    row.symbol, row.price, row.change_pct, row.rsi
                ));
            }
            md.push('\n');
        }

        md.push_str("## High Demand Stocks Today\n\n");
        if self.demand.is_empty() {
            md.push_str("No strong buying pressure detected today.\n\n");
        } else {
            md.push_str("| Stock | Price | % Change | Volume | RSI |\n");
            md.push_str("|-------|-------|----------|--------|-----|\n");
            for row in &self.demand {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {} | {:.2} |\n",
                    row.symbol, row.price, row.change_pct, row.volume, row.rsi
                ));
            }
            md.push('\n');
        }

        md.push_str("## Top 3 Stocks Today (Dip + Momentum)\n\n");
        if self.top_combined.is_empty() {
            md.push_str("No strong combined opportunities today.\n\n");
        } else {
            md.push_str("| Stock | Price | % Change | RSI | Score |\n");
            md.push_str("|-------|-------|----------|-----|-------|\n");
            for row in &self.top_combined {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:.2} | {} |\n",
                    row.symbol, row.price, row.change_pct, row.rsi, row.score
                ));
            }
            md.push('\n');
        }

        for section in &self.leader_sections {
            md.push_str(&format!("## {} Leaders Today\n\n", section.name));
            if section.leaders.is_empty() {
                md.push_str(&format!("No strong {} leaders today.\n\n", section.name));
            } else {
                md.push_str("| Stock | Price | % Change | RSI |\n");
                md.push_str("|-------|-------|----------|-----|\n");
                for row in &section.leaders {
                    md.push_str(&format!(
                        "| {} | {:.2} | {:.2} | {:.2} |\n",
                        row.symbol, row.price, row.change_pct, row.rsi
                    ));
                }
                md.push('\n');
            }
        }

        md
    }

    /// JSON rendering of the full report.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
