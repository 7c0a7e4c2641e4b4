//! Prometheus counters for the impairment pipeline.

use prometheus::{Counter, Registry};

/// Per-session metrics: one counter per packet fate plus the raw capture
/// count. Cloneable; all clones share the same registry.
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub packets_captured: Counter,
    pub packets_forwarded: Counter,
    pub packets_dropped: Counter,
    pub packets_duplicated: Counter,
    pub packets_cancelled: Counter,
    pub packets_shed: Counter,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();

        let packets_captured = Counter::new(
            "ruskvader_packets_captured_total",
            "Frames pulled off the wire",
        )
        .unwrap();
        let packets_forwarded = Counter::new(
            "ruskvader_packets_forwarded_total",
            "Frames reinjected exactly once",
        )
        .unwrap();
        let packets_dropped = Counter::new(
            "ruskvader_packets_dropped_total",
            "Frames discarded by the drop stage",
        )
        .unwrap();
        let packets_duplicated = Counter::new(
            "ruskvader_packets_duplicated_total",
            "Frames reinjected twice by the duplicate stage",
        )
        .unwrap();
        let packets_cancelled = Counter::new(
            "ruskvader_packets_cancelled_total",
            "In-flight frames discarded by a stop request",
        )
        .unwrap();
        let packets_shed = Counter::new(
            "ruskvader_packets_shed_total",
            "Frames dropped because the in-flight bound was reached",
        )
        .unwrap();

        for counter in [
            &packets_captured,
            &packets_forwarded,
            &packets_dropped,
            &packets_duplicated,
            &packets_cancelled,
            &packets_shed,
        ] {
            registry.register(Box::new(counter.clone())).unwrap();
        }

        Self {
            registry,
            packets_captured,
            packets_forwarded,
            packets_dropped,
            packets_duplicated,
            packets_cancelled,
            packets_shed,
        }
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}
