/*!
 * Structured Tracing
 * Subscriber setup and per-trap spans using the tracing crate
 *
 * Output goes to stderr, which serves as the operator console; stdout is
 * reserved for the user program's console.
 */

use std::time::Instant;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - KERNEL_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("KERNEL_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Span covering the handling of one trap
pub struct TrapSpan {
    span: Span,
    start: Instant,
}

impl TrapSpan {
    pub fn new(trap_id: u64, exception: &str, call_number: i32) -> Self {
        let span = span!(
            Level::DEBUG,
            "trap",
            trap_id,
            exception,
            call_number,
            syscall = tracing::field::Empty,
            outcome = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Record the decoded syscall name
    pub fn record_syscall(&self, name: &str) {
        self.span.record("syscall", name);
    }

    /// Record how the trap ended and its duration
    pub fn finish(self, outcome: &str) {
        let elapsed = self.start.elapsed().as_micros() as u64;
        self.span.record("outcome", outcome);
        self.span.record("duration_us", elapsed);
        let _entered = self.span.enter();
        debug!(outcome, duration_us = elapsed, "trap finished");
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}
