//! Interface enumeration.

use pcap::Device;
use ruskvader_core::WireError;

/// One capturable interface, as presented to the user.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// System identifier, passed back verbatim to open a capture.
    pub name: String,
    /// Human-readable description, where the platform provides one.
    pub description: Option<String>,
}

/// Lists the interfaces libpcap can open on this host.
pub fn list_devices() -> Result<Vec<DeviceInfo>, WireError> {
    let devices = Device::list().map_err(|e| WireError::Open(e.to_string()))?;
    Ok(devices
        .into_iter()
        .map(|d| DeviceInfo {
            name: d.name,
            description: d.desc,
        })
        .collect())
}
