//! Impairment configuration snapshots.
//!
//! The control surface owns a [`SharedConfig`] handle and may change any
//! field while a session is running. The pipeline never holds the lock
//! across a suspension point: it takes one [`ImpairmentConfig`] snapshot
//! per packet and works off the copy.

use parking_lot::RwLock;
use std::sync::Arc;

/// Clamps a raw percent value into the `0..=100` range the stages expect.
///
/// Out-of-range input is configuration noise, never an error.
pub fn clamp_percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Per-packet snapshot of every impairment knob.
///
/// Stage order is fixed; only enablement and magnitudes are configurable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpairmentConfig {
    /// Chance in percent that a packet is discarded outright.
    pub drop_percent: u8,
    /// Base delay applied before forwarding.
    pub delay_ms: u64,
    /// Maximum signed perturbation added to the base delay.
    pub jitter_ms: u64,
    /// Chance in percent that a packet is forwarded twice.
    pub duplicate_percent: u8,
    /// Throughput budget; see [`crate::throttle`].
    pub throttle_kbps: u64,

    pub drop_enabled: bool,
    pub delay_enabled: bool,
    pub jitter_enabled: bool,
    pub duplicate_enabled: bool,
    pub throttle_enabled: bool,
}

/// Cloneable, live-updatable configuration handle.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ImpairmentConfig>>,
}

impl SharedConfig {
    pub fn new(config: ImpairmentConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copies out the current configuration.
    pub fn snapshot(&self) -> ImpairmentConfig {
        self.inner.read().clone()
    }

    /// Replaces the configuration wholesale, e.g. after a preset load.
    pub fn replace(&self, config: ImpairmentConfig) {
        *self.inner.write() = config;
    }

    /// Applies an in-place edit under the write lock.
    pub fn update(&self, edit: impl FnOnce(&mut ImpairmentConfig)) {
        edit(&mut self.inner.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_percent_bounds() {
        assert_eq!(clamp_percent(-5), 0);
        assert_eq!(clamp_percent(0), 0);
        assert_eq!(clamp_percent(42), 42);
        assert_eq!(clamp_percent(100), 100);
        assert_eq!(clamp_percent(250), 100);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_updates() {
        let shared = SharedConfig::new(ImpairmentConfig {
            drop_percent: 10,
            drop_enabled: true,
            ..Default::default()
        });
        let before = shared.snapshot();
        shared.update(|cfg| cfg.drop_percent = 90);

        assert_eq!(before.drop_percent, 10);
        assert_eq!(shared.snapshot().drop_percent, 90);
        assert!(shared.snapshot().drop_enabled);
    }

    #[test]
    fn test_replace_applies_every_field() {
        let shared = SharedConfig::default();
        shared.replace(ImpairmentConfig {
            delay_ms: 75,
            delay_enabled: true,
            jitter_ms: 20,
            jitter_enabled: true,
            ..Default::default()
        });
        let snap = shared.snapshot();
        assert_eq!(snap.delay_ms, 75);
        assert!(snap.delay_enabled);
        assert_eq!(snap.jitter_ms, 20);
        assert!(snap.jitter_enabled);
    }
}
