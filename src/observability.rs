//! Structured logging and tracing configuration.
//!
//! Provides setup for observability using the `tracing` crate with:
//! - Structured logging with JSON output option
//! - Configurable log levels

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

/// Initialize tracing with the given configuration.
///
/// Sets up the tracing subscriber with the configured log level (overridable
/// via `RUST_LOG`) and either plain-text or JSON output.
///
/// # Panics
///
/// Panics if a tracing subscriber has already been initialized in this
/// process.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default().with(env_filter).with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer().with_target(true);

        Registry::default().with(env_filter).with(fmt_layer).init();
    }

    tracing::debug!("Tracing initialized: level={}, json={}", level, json);
}

/// Span helpers for the agent pipeline.
pub mod spans {
    use tracing::{info_span, Span};

    /// Create a span covering one scan/diff/process cycle.
    #[must_use]
    pub fn cycle_span(cycle: u64) -> Span {
        info_span!("cycle", cycle = cycle)
    }

    /// Create a span for a single report submission.
    #[must_use]
    pub fn submit_span(collection: &str, filename: &str) -> Span {
        info_span!(
            "submit",
            collection = %collection,
            filename = %filename,
        )
    }
}
