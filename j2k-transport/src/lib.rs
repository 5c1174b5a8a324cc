//! HID transport layer for game controllers
//!
//! Finds a supported controller by VID/PID, opens its input endpoint and
//! hands out raw input reports through the [`ReportSource`] trait. Decoding
//! the report bytes is left to the consumer.

pub mod device_registry;
pub mod error;
pub mod types;

mod discovery;
mod hid_gamepad;

pub use device_registry::{
    controller_name, is_known_controller, KNOWN_CONTROLLERS, PID_XBOX360_WIRED, VENDOR_MICROSOFT,
};
pub use discovery::HidDiscovery;
pub use error::TransportError;
pub use hid_gamepad::{HidGamepadTransport, DEFAULT_READ_TIMEOUT_MS};
pub use types::{DiscoveredDevice, TransportDeviceInfo};

/// Size of the buffer handed to a single report read
pub const READ_BUFFER_SIZE: usize = 64;

/// A blocking source of raw input reports
///
/// Implemented by the HID transport; tests provide scripted sources.
pub trait ReportSource {
    /// Read the next input report into `buf`
    ///
    /// Blocks up to the source's read timeout. Returns the number of bytes
    /// written, `Ok(0)` when the timeout expired without a report. The count
    /// must not exceed `buf.len()`; callers clamp it.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

impl<T: ReportSource + ?Sized> ReportSource for Box<T> {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).read_report(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }
}
