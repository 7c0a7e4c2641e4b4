//! ## ruskvader-core::throttle
//! **Windowed byte-budget limiter**
//!
//! A crude token-bucket approximation: each 100 ms window grants a whole
//! number of bytes, the stall signalled on overflow is flat rather than
//! proportional to the excess, and bytes are charged whether or not the
//! caller stalls — packets are delayed, never rejected. The imprecision is
//! intentional and kept; see DESIGN.md.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Length of one accounting window.
pub const WINDOW: Duration = Duration::from_millis(100);

/// Flat stall applied when a window's budget is exceeded.
pub const STALL: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct Window {
    started_at: Instant,
    bytes: u64,
}

/// Byte budget shared by every in-flight packet.
///
/// All reads and updates go through one mutex so overlapping checks from
/// concurrently scheduled packets cannot lose updates.
#[derive(Debug)]
pub struct ThrottleLimiter {
    window: Mutex<Window>,
}

impl ThrottleLimiter {
    pub fn new() -> Self {
        Self {
            window: Mutex::new(Window {
                started_at: Instant::now(),
                bytes: 0,
            }),
        }
    }

    /// Decides whether the caller must stall before forwarding `frame_len`
    /// bytes at `throttle_kbps`, charging the bytes to the current window
    /// either way.
    pub fn should_stall(&self, frame_len: u64, throttle_kbps: u64) -> bool {
        let mut window = self.window.lock();

        let now = Instant::now();
        if now.duration_since(window.started_at) > WINDOW {
            window.started_at = now;
            window.bytes = 0;
        }

        // Whole bytes allowed per window; truncation matches the observed
        // behavior for budgets that do not divide evenly.
        let capacity = (throttle_kbps as f64 * 1024.0 / 8.0 * WINDOW.as_secs_f64()) as u64;

        let stall = window.bytes + frame_len > capacity;
        window.bytes += frame_len;
        stall
    }
}

impl Default for ThrottleLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread::sleep;

    // 100 kbit/s -> 100 * 1024 / 8 * 0.1 = 1280 bytes per window.
    const KBPS: u64 = 100;
    const FRAME: u64 = 1000;

    #[test]
    fn test_second_frame_in_window_stalls() {
        let limiter = ThrottleLimiter::new();
        assert!(!limiter.should_stall(FRAME, KBPS));
        assert!(limiter.should_stall(FRAME, KBPS));
    }

    #[test]
    fn test_bytes_charged_even_when_stalled() {
        let limiter = ThrottleLimiter::new();
        limiter.should_stall(FRAME, KBPS);
        assert!(limiter.should_stall(FRAME, KBPS));
        // 2000 bytes already in the window, so the third frame stalls too.
        assert!(limiter.should_stall(FRAME, KBPS));
    }

    #[test]
    fn test_window_reset_clears_budget() {
        let limiter = ThrottleLimiter::new();
        assert!(!limiter.should_stall(FRAME, KBPS));
        assert!(limiter.should_stall(FRAME, KBPS));

        sleep(WINDOW + Duration::from_millis(20));
        assert!(!limiter.should_stall(FRAME, KBPS));
    }

    #[test]
    fn test_zero_budget_always_stalls() {
        let limiter = ThrottleLimiter::new();
        for _ in 0..5 {
            assert!(limiter.should_stall(1, 0));
        }
    }

    #[test]
    fn test_capacity_truncates_to_whole_bytes() {
        // 1 kbit/s -> 12.8 bytes per window, truncated to 12.
        let limiter = ThrottleLimiter::new();
        assert!(!limiter.should_stall(12, 1));
        let limiter = ThrottleLimiter::new();
        assert!(limiter.should_stall(13, 1));
    }

    proptest! {
        #[test]
        fn prop_fresh_window_stalls_iff_over_capacity(
            frame_len in 1u64..100_000,
            kbps in 0u64..10_000,
        ) {
            let limiter = ThrottleLimiter::new();
            let capacity = (kbps as f64 * 1024.0 / 8.0 * 0.1) as u64;
            prop_assert_eq!(limiter.should_stall(frame_len, kbps), frame_len > capacity);
        }
    }
}
