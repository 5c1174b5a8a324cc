//! Virtual keyboard device using evdev/uinput
//!
//! Creates a virtual keyboard that advertises exactly the keys of the active
//! mapping. Applications see it as an ordinary keyboard.

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};
use thiserror::Error;
use tracing::debug;

/// EV_KEY values
const KEY_RELEASED: i32 = 0;
const KEY_PRESSED: i32 = 1;

/// Errors from virtual keyboard operations
#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Destination for synthetic key events
pub trait KeySink {
    /// Emit a key-down event
    fn press(&mut self, key: Key) -> Result<(), KeyboardError>;
    /// Emit a key-up event
    fn release(&mut self, key: Key) -> Result<(), KeyboardError>;
}

/// Virtual keyboard device
pub struct VirtualKeyboard {
    device: VirtualDevice,
}

impl VirtualKeyboard {
    /// Create a new virtual keyboard device
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest` and `libinput list-devices`)
    /// * `keys` - Keys the device may emit
    pub fn new(name: &str, keys: impl IntoIterator<Item = Key>) -> Result<Self, KeyboardError> {
        let mut key_set = AttributeSet::<Key>::new();
        for key in keys {
            key_set.insert(key);
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(KeyboardError::CreateDevice)?
            .name(name)
            .with_keys(&key_set)
            .map_err(KeyboardError::CreateDevice)?
            .build()
            .map_err(KeyboardError::CreateDevice)?;

        Ok(Self { device })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }

    fn emit_key(&mut self, key: Key, value: i32) -> Result<(), KeyboardError> {
        let event = InputEvent::new_now(EventType::KEY, key.code(), value);
        // emit() appends SYN_REPORT
        self.device
            .emit(&[event])
            .map_err(KeyboardError::EmitEvent)
    }
}

impl KeySink for VirtualKeyboard {
    fn press(&mut self, key: Key) -> Result<(), KeyboardError> {
        debug!("Key down: {:?}", key);
        self.emit_key(key, KEY_PRESSED)
    }

    fn release(&mut self, key: Key) -> Result<(), KeyboardError> {
        debug!("Key up: {:?}", key);
        self.emit_key(key, KEY_RELEASED)
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn press(&mut self, key: Key) -> Result<(), KeyboardError> {
        (**self).press(key)
    }

    fn release(&mut self, key: Key) -> Result<(), KeyboardError> {
        (**self).release(key)
    }
}
