//! # ruskvader-core
//!
//! Foundation layer for the link-impairment proxy: the packet model, the
//! shared impairment configuration, the seedable randomness source, the
//! throttle limiter, and the impairment pipeline itself.
//!
//! ### Key Submodules:
//! - `pipeline`: Drop → Delay(+Jitter) → Duplicate → Throttle → Forward
//! - `throttle`: windowed byte-budget limiter with a flat stall
//! - `wire`: the `PacketSource` / `InjectionSink` seams toward pcap
//!
//! The crate is deliberately free of any capture backend; `ruskvader-capture`
//! provides the pcap implementations of the `wire` traits.

pub mod config;
pub mod packet;
pub mod pipeline;
pub mod rng;
pub mod throttle;
pub mod wire;

pub use config::{ImpairmentConfig, SharedConfig};
pub use packet::Packet;
pub use pipeline::{ImpairmentPipeline, Verdict};
pub use rng::PacketRng;
pub use throttle::ThrottleLimiter;
pub use wire::{InjectionSink, PacketSource, WireError};

pub mod prelude {
    pub use crate::config::{ImpairmentConfig, SharedConfig};
    pub use crate::packet::Packet;
    pub use crate::pipeline::{ImpairmentPipeline, Verdict};
    pub use crate::rng::PacketRng;
    pub use crate::throttle::ThrottleLimiter;
    pub use crate::wire::{InjectionSink, PacketSource, WireError};
}
