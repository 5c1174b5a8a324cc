//! Controller input report decoding
//!
//! The controller delivers a fixed-layout little-endian report:
//!
//! ```text
//! offset  size  field
//!      0     2  buttons (bitmask, see buttons.rs)
//!      2     2  left stick X  (i16)
//!      4     2  left stick Y  (i16)
//!      6     2  right stick X (i16)
//!      8     2  right stick Y (i16)
//!     10     1  left trigger  (u8)
//!     11     1  right trigger (u8)
//!     12     2  reserved
//! ```
//!
//! Anything past the 14th byte is ignored.

use thiserror::Error;
use zerocopy::byteorder::little_endian::{I16, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Minimum number of bytes in a usable report
pub const REPORT_LEN: usize = 14;

/// Errors from report decoding
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Short read: got {len} bytes, need at least {min}")]
    ShortRead { len: usize, min: usize },
}

/// Wire layout of the input report
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct RawReport {
    buttons: U16,
    left_x: I16,
    left_y: I16,
    right_x: I16,
    right_y: I16,
    trig_left: u8,
    trig_right: u8,
    _reserved: [u8; 2],
}

/// Decoded controller state for one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerReport {
    pub buttons: u16,
    pub left_x: i16,
    pub left_y: i16,
    pub right_x: i16,
    pub right_y: i16,
    pub trig_left: u8,
    pub trig_right: u8,
}

impl ControllerReport {
    /// Decode a report from raw bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, ReportError> {
        let short = ReportError::ShortRead {
            len: bytes.len(),
            min: REPORT_LEN,
        };
        if bytes.len() < REPORT_LEN {
            return Err(short);
        }
        let (raw, _) = RawReport::read_from_prefix(bytes).map_err(|_| short)?;

        Ok(Self {
            buttons: raw.buttons.get(),
            left_x: raw.left_x.get(),
            left_y: raw.left_y.get(),
            right_x: raw.right_x.get(),
            right_y: raw.right_y.get(),
            trig_left: raw.trig_left,
            trig_right: raw.trig_right,
        })
    }

    /// Encode into the wire layout (reserved bytes zeroed)
    pub fn encode(&self) -> [u8; REPORT_LEN] {
        let raw = RawReport {
            buttons: U16::new(self.buttons),
            left_x: I16::new(self.left_x),
            left_y: I16::new(self.left_y),
            right_x: I16::new(self.right_x),
            right_y: I16::new(self.right_y),
            trig_left: self.trig_left,
            trig_right: self.trig_right,
            _reserved: [0; 2],
        };
        let mut out = [0u8; REPORT_LEN];
        out.copy_from_slice(raw.as_bytes());
        out
    }
}
