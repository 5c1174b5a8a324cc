//! Joystick-to-keyboard emulator
//!
//! Reads input reports from a game controller and turns them into synthetic
//! key presses on a virtual keyboard.
//!
//! ```text
//! device ─► report ─► axis / buttons ─► IntentSet ─► KeyStateMachine ─► VirtualKeyboard
//! ```

pub mod axis;
pub mod buttons;
pub mod config;
pub mod error;
pub mod intent;
pub mod key_state;
pub mod keyboard;
pub mod keymap;
pub mod poll;
pub mod report;

pub use config::Config;
pub use error::Error;
pub use intent::{Input, IntentSet};
pub use key_state::KeyStateMachine;
pub use keyboard::{KeySink, KeyboardError, VirtualKeyboard};
pub use keymap::{KeyMapping, MappingError, Profile};
pub use poll::{run, PollSettings, PollStats, ShutdownToken};
pub use report::{ControllerReport, ReportError, REPORT_LEN};
