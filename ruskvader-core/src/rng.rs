//! Randomness for impairment decisions.
//!
//! Drop, duplicate, and jitter all draw from one mutex-held [`SmallRng`]
//! shared by every in-flight packet. The source is seedable so impairment
//! decisions are reproducible in tests and replayable runs.

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct PacketRng {
    rng: Mutex<SmallRng>,
}

impl PacketRng {
    /// Entropy-seeded source for live runs.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_rng(&mut rand::rng())),
        }
    }

    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Uniform draw in `[0, 100)`, compared against the percent knobs.
    pub fn percent_draw(&self) -> u8 {
        self.rng.lock().random_range(0..100)
    }

    /// Signed jitter in `[-magnitude_ms, +magnitude_ms]`, inclusive.
    pub fn jitter_ms(&self, magnitude_ms: u64) -> i64 {
        let magnitude = magnitude_ms as i64;
        self.rng.lock().random_range(-magnitude..=magnitude)
    }
}

impl Default for PacketRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
