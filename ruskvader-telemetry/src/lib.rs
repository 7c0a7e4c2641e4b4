//! # ruskvader-telemetry
//!
//! Logging and metrics for the impairment proxy.

pub mod logging;
pub mod metrics;

pub use metrics::MetricsRecorder;
