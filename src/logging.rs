//! Logging bootstrap.
//!
//! Structured logging via `tracing`, with the HTTP stack's internals
//! clamped to warn so scan-level events stay readable at debug.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Modules whose debug output drowns out scan logs.
const NOISY_MODULES: &[&str] = &["hyper", "reqwest", "rustls"];

fn build_filter(log_level: &str) -> EnvFilter {
    let mut directives = String::from(log_level);

    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives))
}

/// Initialize the global tracing subscriber.
///
/// `log_format` selects "json" or the default pretty console output.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(log_level: &str, log_format: &str) {
    let filter = build_filter(log_level);

    let subscriber = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        "Logging initialized"
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging("debug", "pretty");
        init_logging("info", "json");
    }
}
