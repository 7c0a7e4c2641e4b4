//! Seams toward the wire.
//!
//! [`PacketSource`] and [`InjectionSink`] are the two leaves the engine
//! wires the pipeline between. The pcap implementations live in
//! `ruskvader-capture`; tests substitute scripted fakes.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::packet::Packet;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to open capture: {0}")]
    Open(String),

    #[error("capture read failed: {0}")]
    Read(String),

    #[error("injection failed: {0}")]
    Inject(String),
}

/// Blocking producer of captured frames.
pub trait PacketSource: Send + 'static {
    /// Runs the capture loop until `cancel` is raised or a fatal read error
    /// occurs. Implementations must observe `cancel` at a coarse interval
    /// (on the order of the read timeout) so stop requests take effect
    /// promptly even on a quiet wire.
    fn run(
        &mut self,
        cancel: &CancellationToken,
        on_packet: &mut dyn FnMut(Packet),
    ) -> Result<(), WireError>;
}

/// Consumer of raw frames headed back onto the wire.
///
/// `inject` is called from concurrently scheduled packet tasks and must be
/// safe to share. Failures are surfaced to the caller, which suppresses
/// them per packet.
pub trait InjectionSink: Send + Sync + 'static {
    fn inject(&self, frame: &[u8]) -> Result<(), WireError>;
}
