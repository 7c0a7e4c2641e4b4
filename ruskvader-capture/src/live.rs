//! Live promiscuous capture and raw reinjection on one interface.
//!
//! Two pcap handles are opened on the same device: one owned by the
//! blocking read loop, one mutex-guarded for injection from concurrently
//! scheduled packet tasks. Dropping a handle closes the device; close
//! failures cannot surface and are therefore ignored by construction.

use bytes::Bytes;
use parking_lot::Mutex;
use pcap::{Active, Capture, Device};
use tokio_util::sync::CancellationToken;

use ruskvader_core::{InjectionSink, Packet, PacketSource, WireError};

/// Read timeout for the capture handle. Doubles as the coarse interval at
/// which the loop observes the cancellation token on a quiet wire.
pub const READ_TIMEOUT_MS: i32 = 1000;

const SNAPLEN: i32 = 65_535;

fn open_handle(interface: &str, promiscuous: bool) -> Result<Capture<Active>, WireError> {
    let device = Device::list()
        .map_err(|e| WireError::Open(e.to_string()))?
        .into_iter()
        .find(|d| d.name == interface)
        .ok_or_else(|| WireError::DeviceNotFound(interface.to_owned()))?;

    Capture::from_device(device)
        .map_err(|e| WireError::Open(e.to_string()))?
        .promisc(promiscuous)
        .snaplen(SNAPLEN)
        .timeout(READ_TIMEOUT_MS)
        .open()
        .map_err(|e| WireError::Open(e.to_string()))
}

/// Blocking pcap read loop for one interface.
pub struct LiveSource {
    cap: Capture<Active>,
    link_type: i32,
}

impl LiveSource {
    /// Opens `interface` in promiscuous mode with the fixed read timeout.
    pub fn open(interface: &str) -> Result<Self, WireError> {
        let cap = open_handle(interface, true)?;
        let link_type = cap.get_datalink().0;
        Ok(Self { cap, link_type })
    }
}

impl PacketSource for LiveSource {
    fn run(
        &mut self,
        cancel: &CancellationToken,
        on_packet: &mut dyn FnMut(Packet),
    ) -> Result<(), WireError> {
        while !cancel.is_cancelled() {
            match self.cap.next_packet() {
                Ok(captured) => {
                    on_packet(Packet::new(
                        Bytes::copy_from_slice(captured.data),
                        self.link_type,
                    ));
                }
                // No frame within the read timeout; loop around and
                // re-check the cancellation token.
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => return Err(WireError::Read(e.to_string())),
            }
        }
        Ok(())
    }
}

/// Injection handle writing raw frames back onto the same interface.
///
/// Separate from the read handle so packet tasks can inject while the
/// capture loop sits blocked in a read.
pub struct LiveSink {
    cap: Mutex<Capture<Active>>,
}

impl LiveSink {
    pub fn open(interface: &str) -> Result<Self, WireError> {
        Ok(Self {
            cap: Mutex::new(open_handle(interface, false)?),
        })
    }
}

impl InjectionSink for LiveSink {
    fn inject(&self, frame: &[u8]) -> Result<(), WireError> {
        self.cap
            .lock()
            .sendpacket(frame)
            .map_err(|e| WireError::Inject(e.to_string()))
    }
}
