//! Raw captured frames.

use bytes::Bytes;
use std::time::Instant;

/// One captured link-layer frame.
///
/// The payload is never mutated by any impairment stage; only its delivery
/// (timing, count, presence) is affected.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Raw frame bytes as they arrived on the wire.
    pub data: Bytes,
    /// Link-layer type of the capturing device (libpcap DLT value).
    pub link_type: i32,
    /// When the frame was pulled out of the capture device.
    pub captured_at: Instant,
}

impl Packet {
    pub fn new(data: impl Into<Bytes>, link_type: i32) -> Self {
        Self {
            data: data.into(),
            link_type,
            captured_at: Instant::now(),
        }
    }

    /// Frame length in bytes, as charged against the throttle budget.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
