//! ## ruskvader-core::pipeline
//! **The impairment pipeline**
//!
//! Every captured packet runs through Drop → Delay(+Jitter) → Duplicate →
//! Throttle → Forward, in that fixed order. Each stage may short-circuit
//! the remainder. The delay stage and the throttle stall are the only
//! suspension points; both observe the cancellation token and discard the
//! packet silently when stop is requested.
//!
//! One pipeline instance is shared by all in-flight packets of a session.
//! The configuration is snapshotted once per packet, so the control surface
//! can retune knobs mid-run without coordinating with packet tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::SharedConfig;
use crate::packet::Packet;
use crate::rng::PacketRng;
use crate::throttle::{ThrottleLimiter, STALL};
use crate::wire::InjectionSink;

/// What became of one captured packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Forwarded once.
    Forwarded,
    /// Discarded by the drop stage; nothing reached the wire.
    Dropped,
    /// Forwarded twice back-to-back; the throttle stage was skipped.
    Duplicated,
    /// Discarded because stop was requested while the packet was suspended.
    Cancelled,
}

pub struct ImpairmentPipeline<S: InjectionSink> {
    config: SharedConfig,
    rng: Arc<PacketRng>,
    limiter: ThrottleLimiter,
    sink: Arc<S>,
    cancel: CancellationToken,
}

impl<S: InjectionSink> ImpairmentPipeline<S> {
    pub fn new(
        config: SharedConfig,
        rng: Arc<PacketRng>,
        sink: Arc<S>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            rng,
            limiter: ThrottleLimiter::new(),
            sink,
            cancel,
        }
    }

    /// Runs one packet through every enabled stage.
    ///
    /// Injection failures are logged and swallowed; one packet's failure
    /// must never halt the capture loop.
    pub async fn process(&self, packet: Packet) -> Verdict {
        let cfg = self.config.snapshot();

        if cfg.drop_enabled && self.rng.percent_draw() < cfg.drop_percent {
            return Verdict::Dropped;
        }

        if cfg.delay_enabled {
            let jitter = if cfg.jitter_enabled {
                self.rng.jitter_ms(cfg.jitter_ms)
            } else {
                0
            };
            let wait_ms = (cfg.delay_ms as i64 + jitter).max(0) as u64;
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Verdict::Cancelled,
                _ = sleep(Duration::from_millis(wait_ms)) => {}
            }
        }

        if cfg.duplicate_enabled && self.rng.percent_draw() < cfg.duplicate_percent {
            // Duplicates go out back-to-back and are not charged to the
            // throttle budget.
            self.forward(&packet);
            self.forward(&packet);
            return Verdict::Duplicated;
        }

        if cfg.throttle_enabled
            && self
                .limiter
                .should_stall(packet.data.len() as u64, cfg.throttle_kbps)
        {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Verdict::Cancelled,
                _ = sleep(STALL) => {}
            }
        }

        self.forward(&packet);
        Verdict::Forwarded
    }

    fn forward(&self, packet: &Packet) {
        if let Err(e) = self.sink.inject(&packet.data) {
            debug!(error = %e, len = packet.data.len(), "suppressed injection failure");
        }
    }
}
