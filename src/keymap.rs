//! Logical input to key code mapping
//!
//! Mappings are built-in profiles selected once at startup. A key code may
//! be owned by at most one input so that every key's state has a single
//! driver.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use evdev::Key;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intent::Input;

/// Errors from building a key mapping
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("{key:?} is mapped by both {first} and {second}")]
    DuplicateKey { key: Key, first: Input, second: Input },

    #[error("{0} is mapped more than once")]
    DuplicateInput(Input),
}

/// Built-in mapping profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Every input wired: sticks, d-pad, face/shoulder buttons, triggers
    #[default]
    Full,
    /// Sticks and d-pad only
    Movement,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Full, Profile::Movement];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Full => "full",
            Profile::Movement => "movement",
        }
    }

    /// Input/key pairs for this profile
    pub fn table(self) -> &'static [(Input, Key)] {
        match self {
            Profile::Full => FULL_PROFILE,
            Profile::Movement => MOVEMENT_PROFILE,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Profile::ALL.iter().map(|p| p.as_str()).collect();
                format!("unknown profile \"{s}\" (expected one of: {})", names.join(", "))
            })
    }
}

const STICK_AND_DPAD: [(Input, Key); 12] = [
    // Left stick
    (Input::LStickLeft, Key::KEY_A),
    (Input::LStickRight, Key::KEY_D),
    (Input::LStickUp, Key::KEY_W),
    (Input::LStickDown, Key::KEY_S),
    // Right stick
    (Input::RStickLeft, Key::KEY_J),
    (Input::RStickRight, Key::KEY_L),
    (Input::RStickUp, Key::KEY_I),
    (Input::RStickDown, Key::KEY_K),
    // D-pad
    (Input::DpadUp, Key::KEY_UP),
    (Input::DpadDown, Key::KEY_DOWN),
    (Input::DpadLeft, Key::KEY_LEFT),
    (Input::DpadRight, Key::KEY_RIGHT),
];

const MOVEMENT_PROFILE: &[(Input, Key)] = &STICK_AND_DPAD;

const FULL_PROFILE: &[(Input, Key)] = &[
    (Input::LStickLeft, Key::KEY_A),
    (Input::LStickRight, Key::KEY_D),
    (Input::LStickUp, Key::KEY_W),
    (Input::LStickDown, Key::KEY_S),
    (Input::RStickLeft, Key::KEY_J),
    (Input::RStickRight, Key::KEY_L),
    (Input::RStickUp, Key::KEY_I),
    (Input::RStickDown, Key::KEY_K),
    (Input::DpadUp, Key::KEY_UP),
    (Input::DpadDown, Key::KEY_DOWN),
    (Input::DpadLeft, Key::KEY_LEFT),
    (Input::DpadRight, Key::KEY_RIGHT),
    // Face buttons
    (Input::A, Key::KEY_SPACE),
    (Input::B, Key::KEY_E),
    (Input::X, Key::KEY_F),
    (Input::Y, Key::KEY_Q),
    // Shoulders and triggers
    (Input::LeftShoulder, Key::KEY_T),
    (Input::RightShoulder, Key::KEY_R),
    (Input::LeftTrigger, Key::KEY_U),
    (Input::RightTrigger, Key::KEY_Y),
    (Input::Select, Key::KEY_TAB),
    (Input::Start, Key::KEY_ENTER),
    // Stick clicks
    (Input::LeftStickClick, Key::KEY_LEFTSHIFT),
    (Input::RightStickClick, Key::KEY_LEFTCTRL),
];

/// Static mapping from logical input to key code
#[derive(Debug, Clone)]
pub struct KeyMapping {
    /// Entries in logical-input order
    entries: Vec<(Input, Key)>,
    by_input: HashMap<Input, Key>,
}

impl KeyMapping {
    /// Build a mapping, rejecting duplicate inputs and shared key codes
    pub fn new(pairs: impl IntoIterator<Item = (Input, Key)>) -> Result<Self, MappingError> {
        let mut by_input = HashMap::new();
        let mut by_key: HashMap<Key, Input> = HashMap::new();

        for (input, key) in pairs {
            if by_input.insert(input, key).is_some() {
                return Err(MappingError::DuplicateInput(input));
            }
            if let Some(first) = by_key.insert(key, input) {
                return Err(MappingError::DuplicateKey {
                    key,
                    first,
                    second: input,
                });
            }
        }

        let mut entries: Vec<_> = by_input.iter().map(|(&i, &k)| (i, k)).collect();
        entries.sort_by_key(|&(input, _)| input);

        Ok(Self { entries, by_input })
    }

    /// Mapping for a built-in profile
    pub fn for_profile(profile: Profile) -> Result<Self, MappingError> {
        Self::new(profile.table().iter().copied())
    }

    /// Key code mapped to `input`, if any
    pub fn key_for(&self, input: Input) -> Option<Key> {
        self.by_input.get(&input).copied()
    }

    /// Iterate mapped pairs in logical-input order
    pub fn iter(&self) -> impl Iterator<Item = (Input, Key)> + '_ {
        self.entries.iter().copied()
    }

    /// Distinct key codes referenced by the mapping
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.iter().map(|&(_, key)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display name for a key code (`KEY_SPACE` -> `SPACE`)
pub fn key_name(key: Key) -> String {
    let name = format!("{key:?}");
    match name.strip_prefix("KEY_") {
        Some(short) => short.to_string(),
        None => name,
    }
}
