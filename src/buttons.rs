//! Digital inputs: button bitmask and trigger thresholds

/// Normalized trigger value above which a trigger counts as pressed
pub const TRIGGER_THRESHOLD: f64 = 0.5;

/// Buttons in bit order of the report's button word
///
/// Bits 14 and 15 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    Select,
    Start,
    LeftStickClick,
    RightStickClick,
}

impl Button {
    /// All buttons, indexed by bit position
    pub const ALL: [Button; 14] = [
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::Select,
        Button::Start,
        Button::LeftStickClick,
        Button::RightStickClick,
    ];

    /// Bit position in the button word
    pub fn bit(self) -> u32 {
        self as u32
    }

    /// Mask for this button in the button word
    pub fn mask(self) -> u16 {
        1 << self.bit()
    }

    /// Whether this button is held in `buttons`
    pub fn is_pressed(self, buttons: u16) -> bool {
        buttons & self.mask() != 0
    }
}

/// Iterate every button with its held state
pub fn button_states(buttons: u16) -> impl Iterator<Item = (Button, bool)> {
    Button::ALL.into_iter().map(move |b| (b, b.is_pressed(buttons)))
}

/// Whether a raw trigger value counts as pressed
pub fn trigger_pressed(raw: u8) -> bool {
    f64::from(raw) / 255.0 > TRIGGER_THRESHOLD
}
