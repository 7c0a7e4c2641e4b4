//! Structured logging setup and the user-facing status sink.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber. Call once at startup.
pub fn init() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .with_span_events(FmtSpan::ENTER)
        .init()
}

/// The single status text sink: session state changes, preset
/// confirmations, and surfaced errors all pass through here.
pub fn status(text: &str) {
    tracing::info!(target: "ruskvader::status", "Status: {text}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_status_reaches_the_sink() {
        status("Running...");
        assert!(logs_contain("Status: Running..."));
    }
}
