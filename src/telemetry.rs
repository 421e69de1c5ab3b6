/*!
 * Telemetry
 * Structured tracing bootstrap and lifecycle operation spans
 *
 * Environment variables:
 * - RUST_LOG: set log level filter (default: info)
 * - RUNTIME_TRACE_JSON: enable JSON output (default: false)
 */

use crate::core::types::InstanceId;
use std::time::Instant;
use tracing::{debug, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing for the host process.
///
/// Call once at startup, before the first runtime instance. `log` records
/// from the lifecycle modules flow into the same subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUNTIME_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::FULL),
            )
            .init();
        tracing::info!("Tracing initialized with JSON output");
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        tracing::info!("Tracing initialized");
    }
}

/// Span covering one lifecycle operation, with the duration recorded when it
/// closes. Correlation key is the instance id.
pub struct LifecycleSpan {
    span: tracing::Span,
    start: Instant,
    operation: &'static str,
}

impl LifecycleSpan {
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        let span = span!(
            Level::DEBUG,
            "lifecycle",
            operation = operation,
            instance_id = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            operation,
        }
    }

    /// Attach the instance once it is known.
    pub fn record_instance(&self, id: InstanceId) {
        self.span.record("instance_id", id);
    }
}

impl Drop for LifecycleSpan {
    fn drop(&mut self) {
        let duration_us = self.start.elapsed().as_micros() as u64;
        self.span.record("duration_us", duration_us);
        let _entered = self.span.enter();
        debug!(
            operation = self.operation,
            duration_us, "lifecycle operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    fn init_test_tracing() {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("debug"))
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init();
    }

    #[test]
    fn test_lifecycle_span() {
        init_test_tracing();

        let span = LifecycleSpan::new("create");
        span.record_instance(17);
        std::thread::sleep(std::time::Duration::from_micros(100));
        // Dropped here; duration is recorded on close
    }
}
