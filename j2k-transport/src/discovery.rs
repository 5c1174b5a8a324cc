//! Device discovery for HID game controllers

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry::{self, KNOWN_CONTROLLERS};
use crate::error::TransportError;
use crate::hid_gamepad::HidGamepadTransport;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};

/// HID device discovery restricted to a VID/PID allow-list
pub struct HidDiscovery {
    /// VID/PID pairs to look for
    known_devices: Vec<(u16, u16)>,
}

impl Default for HidDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl HidDiscovery {
    /// Create a discovery instance for the built-in controller registry
    pub fn new() -> Self {
        Self {
            known_devices: KNOWN_CONTROLLERS
                .iter()
                .map(|&(vid, pid, _)| (vid, pid))
                .collect(),
        }
    }

    /// Create a discovery instance for an explicit set of VID/PID pairs
    pub fn with_devices(devices: &[(u16, u16)]) -> Self {
        let mut discovery = Self {
            known_devices: Vec::with_capacity(devices.len()),
        };
        for &(vid, pid) in devices {
            discovery.add_device(vid, pid);
        }
        discovery
    }

    /// Add a VID/PID pair to discover
    pub fn add_device(&mut self, vid: u16, pid: u16) {
        if !self.known_devices.contains(&(vid, pid)) {
            self.known_devices.push((vid, pid));
        }
    }

    /// Check if a device matches our allow-list
    pub fn is_known_device(&self, vid: u16, pid: u16) -> bool {
        self.known_devices.contains(&(vid, pid))
    }

    fn device_info_from(device_info: &hidapi::DeviceInfo) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid: device_info.vendor_id(),
            pid: device_info.product_id(),
            device_path: device_info.path().to_string_lossy().to_string(),
            serial: device_info.serial_number().map(|s| s.to_string()),
            product_name: device_info.product_string().map(|s| s.to_string()),
            manufacturer: device_info.manufacturer_string().map(|s| s.to_string()),
        }
    }

    /// List every HID device on the system (for diagnostics)
    pub fn list_all(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        Ok(api
            .device_list()
            .map(|d| DiscoveredDevice {
                info: Self::device_info_from(d),
            })
            .collect())
    }

    /// List connected devices matching the allow-list
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            if !self.is_known_device(device_info.vendor_id(), device_info.product_id()) {
                continue;
            }

            let info = Self::device_info_from(device_info);
            debug!(
                "Found device: VID={:04X} PID={:04X} path={}",
                info.vid, info.pid, info.device_path
            );
            devices.push(DiscoveredDevice { info });
        }

        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    /// Open a specific device
    pub fn open_device(
        &self,
        device: &DiscoveredDevice,
        read_timeout_ms: i32,
    ) -> Result<HidGamepadTransport, TransportError> {
        let api = HidApi::new()?;

        let hid_info = api
            .device_list()
            .find(|d| d.path().to_string_lossy() == device.info.device_path)
            .ok_or_else(|| {
                TransportError::DeviceNotFound(format!(
                    "{:04X}:{:04X} at {}",
                    device.info.vid, device.info.pid, device.info.device_path
                ))
            })?;

        let hid_device = hid_info.open_device(&api)?;

        info!(
            "Opened {} ({:04X}:{:04X})",
            device.info.display_name(),
            device.info.vid,
            device.info.pid
        );

        Ok(HidGamepadTransport::new(
            hid_device,
            device.info.clone(),
            read_timeout_ms,
        ))
    }

    /// Open the first matching device
    pub fn open_first(&self, read_timeout_ms: i32) -> Result<HidGamepadTransport, TransportError> {
        let devices = self.list_devices()?;
        let first = devices.first().ok_or_else(|| {
            let wanted: Vec<String> = self
                .known_devices
                .iter()
                .map(|(vid, pid)| match device_registry::controller_name(*vid, *pid) {
                    Some(name) => format!("{name} ({vid:04x}:{pid:04x})"),
                    None => format!("{vid:04x}:{pid:04x}"),
                })
                .collect();
            TransportError::DeviceNotFound(format!(
                "no compatible controller found (looking for {})",
                wanted.join(", ")
            ))
        })?;

        if devices.len() > 1 {
            debug!("{} matching devices, using the first", devices.len());
        }

        self.open_device(first, read_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_registry::{PID_XBOX360_WIRED, VENDOR_MICROSOFT};

    #[test]
    fn test_default_knows_registry() {
        let discovery = HidDiscovery::new();
        assert!(discovery.is_known_device(VENDOR_MICROSOFT, PID_XBOX360_WIRED));
        assert!(!discovery.is_known_device(0x1234, 0x5678));
    }

    #[test]
    fn test_with_devices_deduplicates() {
        let mut discovery = HidDiscovery::with_devices(&[(0x1234, 0x5678), (0x1234, 0x5678)]);
        discovery.add_device(0x1234, 0x5678);
        assert_eq!(discovery.known_devices.len(), 1);
        assert!(discovery.is_known_device(0x1234, 0x5678));
        assert!(!discovery.is_known_device(VENDOR_MICROSOFT, PID_XBOX360_WIRED));
    }

    #[test]
    #[ignore] // Requires HID access (run with: cargo test -- --ignored)
    fn test_list_devices() {
        let discovery = HidDiscovery::new();
        assert!(discovery.list_devices().is_ok());
    }
}
