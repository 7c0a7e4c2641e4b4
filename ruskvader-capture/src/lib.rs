//! # ruskvader-capture
//!
//! pcap-backed leaves of the impairment proxy: interface enumeration, the
//! live promiscuous capture source, and the raw-frame injection sink.
//! Everything algorithmic lives upstream in `ruskvader-core`; this crate
//! only adapts libpcap to the `wire` seams.

pub mod devices;
pub mod live;

pub use devices::{list_devices, DeviceInfo};
pub use live::{LiveSink, LiveSource};
