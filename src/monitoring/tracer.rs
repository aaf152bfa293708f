/*!
 * Structured Tracing
 * Subscriber setup and per-run spans using the tracing crate
 *
 * Features:
 * - EnvFilter driven log levels
 * - JSON-formatted logs for structured parsing
 * - One span per algorithm run with its wall-clock cost
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable selecting JSON output
pub const ENV_TRACE_JSON: &str = "SCHED_TRACE_JSON";

// Runs slower than this are reported at warn level
const SLOW_RUN_MS: u128 = 500;

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SCHED_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span covering one algorithm run
///
/// Logs the wall-clock duration when dropped.
pub struct RunSpan {
    span: tracing::Span,
    start: Instant,
    run_id: u64,
}

impl RunSpan {
    pub fn new(algorithm: &str, processes: usize) -> Self {
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);

        let span = span!(
            Level::DEBUG,
            "simulation",
            run_id,
            algorithm,
            processes,
            total_time = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            run_id,
        }
    }

    #[inline]
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Record the simulated clock at the end of the run
    pub fn record_total_time(&self, total_time: u64) {
        self.span.record("total_time", total_time);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.span.record("duration_us", elapsed.as_micros() as u64);
        let _entered = self.span.enter();

        if elapsed.as_millis() > SLOW_RUN_MS {
            warn!(
                run_id = self.run_id,
                duration_ms = elapsed.as_millis() as u64,
                slow = true,
                "Slow simulation run"
            );
        } else {
            debug!(
                run_id = self.run_id,
                duration_us = elapsed.as_micros() as u64,
                "Simulation run finished"
            );
        }
    }
}
