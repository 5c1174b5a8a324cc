//! HID transport for wired USB game controllers

use hidapi::HidDevice;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::ReportSource;

/// Default read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 100;

/// Read-only transport for a controller's input endpoint
///
/// Each `read_report` call blocks until the device delivers an input report
/// or the read timeout expires.
pub struct HidGamepadTransport {
    device: HidDevice,
    info: TransportDeviceInfo,
    read_timeout_ms: i32,
}

impl HidGamepadTransport {
    /// Wrap an opened HID device
    ///
    /// # Arguments
    /// * `device` - Opened HID device (input endpoint)
    /// * `info` - Device information
    /// * `read_timeout_ms` - Blocking read timeout (-1 blocks forever)
    pub fn new(device: HidDevice, info: TransportDeviceInfo, read_timeout_ms: i32) -> Self {
        debug!(
            "Gamepad transport for {:04X}:{:04X} (timeout {}ms)",
            info.vid, info.pid, read_timeout_ms
        );
        Self {
            device,
            info,
            read_timeout_ms,
        }
    }
}

impl ReportSource for HidGamepadTransport {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let n = self.device.read_timeout(buf, self.read_timeout_ms)?;
        if n > 0 {
            trace!("Input report ({}b): {:02X?}", n, &buf[..n]);
        }
        Ok(n)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
