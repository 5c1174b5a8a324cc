//! Common types for the transport layer

use std::fmt;

/// Device identification information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// hidraw path or platform identifier
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
    /// Manufacturer name if available
    pub manufacturer: Option<String>,
}

impl TransportDeviceInfo {
    /// Human-readable name, falling back to the registry and then to "Unknown"
    pub fn display_name(&self) -> &str {
        self.product_name
            .as_deref()
            .or_else(|| crate::device_registry::controller_name(self.vid, self.pid))
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for TransportDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:04x}:{:04x}) at {}",
            self.display_name(),
            self.vid,
            self.pid,
            self.device_path
        )
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(product_name: Option<&str>, vid: u16, pid: u16) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid,
            pid,
            device_path: "/dev/hidraw0".into(),
            serial: None,
            product_name: product_name.map(str::to_string),
            manufacturer: None,
        }
    }

    #[test]
    fn test_display_name_prefers_product_string() {
        let dev = info(Some("Controller"), 0x045E, 0x028E);
        assert_eq!(dev.display_name(), "Controller");
    }

    #[test]
    fn test_display_name_falls_back_to_registry() {
        let dev = info(None, 0x045E, 0x028E);
        assert_eq!(dev.display_name(), "Xbox 360 Controller");

        let dev = info(None, 0x1234, 0x5678);
        assert_eq!(dev.display_name(), "Unknown");
    }

    #[test]
    fn test_display_format() {
        let dev = info(None, 0x045E, 0x028E);
        assert_eq!(
            dev.to_string(),
            "Xbox 360 Controller (045e:028e) at /dev/hidraw0"
        );
    }
}
