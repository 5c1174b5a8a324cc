//! Logical inputs and the per-cycle desired intent set
//!
//! A logical input is a stable name (`dpad_up`, `lstick_left`, ...) that
//! decouples the report's bit and axis positions from the keys they drive.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::axis::{stick_directions, StickDirections};
use crate::buttons::{button_states, trigger_pressed, Button};
use crate::report::ControllerReport;

/// Every logical input the controller can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Input {
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
    LeftTrigger,
    RightTrigger,
    LStickLeft,
    LStickRight,
    LStickUp,
    LStickDown,
    RStickLeft,
    RStickRight,
    RStickUp,
    RStickDown,
}

impl Input {
    /// All logical inputs in evaluation order
    pub const ALL: [Input; 24] = [
        Input::DpadUp,
        Input::DpadDown,
        Input::DpadLeft,
        Input::DpadRight,
        Input::A,
        Input::B,
        Input::X,
        Input::Y,
        Input::LeftShoulder,
        Input::RightShoulder,
        Input::Select,
        Input::Start,
        Input::LeftStickClick,
        Input::RightStickClick,
        Input::LeftTrigger,
        Input::RightTrigger,
        Input::LStickLeft,
        Input::LStickRight,
        Input::LStickUp,
        Input::LStickDown,
        Input::RStickLeft,
        Input::RStickRight,
        Input::RStickUp,
        Input::RStickDown,
    ];

    /// Stable logical-input name
    pub fn name(self) -> &'static str {
        match self {
            Input::DpadUp => "dpad_up",
            Input::DpadDown => "dpad_down",
            Input::DpadLeft => "dpad_left",
            Input::DpadRight => "dpad_right",
            Input::A => "a",
            Input::B => "b",
            Input::X => "x",
            Input::Y => "y",
            Input::LeftShoulder => "left_shoulder",
            Input::RightShoulder => "right_shoulder",
            Input::Select => "select",
            Input::Start => "start",
            Input::LeftStickClick => "left_stick_click",
            Input::RightStickClick => "right_stick_click",
            Input::LeftTrigger => "left_trigger",
            Input::RightTrigger => "right_trigger",
            Input::LStickLeft => "lstick_left",
            Input::LStickRight => "lstick_right",
            Input::LStickUp => "lstick_up",
            Input::LStickDown => "lstick_down",
            Input::RStickLeft => "rstick_left",
            Input::RStickRight => "rstick_right",
            Input::RStickUp => "rstick_up",
            Input::RStickDown => "rstick_down",
        }
    }
}

impl From<Button> for Input {
    fn from(button: Button) -> Self {
        match button {
            Button::DpadUp => Input::DpadUp,
            Button::DpadDown => Input::DpadDown,
            Button::DpadLeft => Input::DpadLeft,
            Button::DpadRight => Input::DpadRight,
            Button::A => Input::A,
            Button::B => Input::B,
            Button::X => Input::X,
            Button::Y => Input::Y,
            Button::LeftShoulder => Input::LeftShoulder,
            Button::RightShoulder => Input::RightShoulder,
            Button::Select => Input::Select,
            Button::Start => Input::Start,
            Button::LeftStickClick => Input::LeftStickClick,
            Button::RightStickClick => Input::RightStickClick,
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Unrecognized logical-input name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown input name: \"{0}\"")]
pub struct UnknownInput(pub String);

impl FromStr for Input {
    type Err = UnknownInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Input::ALL
            .into_iter()
            .find(|input| input.name() == s)
            .ok_or_else(|| UnknownInput(s.to_string()))
    }
}

/// Desired state of every logical input for one poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSet {
    entries: Vec<(Input, bool)>,
}

impl IntentSet {
    /// Build the intent set for a decoded report
    pub fn from_report(report: &ControllerReport, deadzone: f64) -> Self {
        let mut entries = Vec::with_capacity(Input::ALL.len());

        entries.extend(
            button_states(report.buttons).map(|(button, pressed)| (Input::from(button), pressed)),
        );

        entries.push((Input::LeftTrigger, trigger_pressed(report.trig_left)));
        entries.push((Input::RightTrigger, trigger_pressed(report.trig_right)));

        let left = stick_directions(report.left_x, report.left_y, deadzone);
        push_stick(
            &mut entries,
            left,
            [
                Input::LStickLeft,
                Input::LStickRight,
                Input::LStickUp,
                Input::LStickDown,
            ],
        );

        let right = stick_directions(report.right_x, report.right_y, deadzone);
        push_stick(
            &mut entries,
            right,
            [
                Input::RStickLeft,
                Input::RStickRight,
                Input::RStickUp,
                Input::RStickDown,
            ],
        );

        Self { entries }
    }

    /// Desired state of one input
    pub fn get(&self, input: Input) -> Option<bool> {
        self.entries
            .iter()
            .find(|(i, _)| *i == input)
            .map(|&(_, pressed)| pressed)
    }

    /// Iterate all entries in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (Input, bool)> + '_ {
        self.entries.iter().copied()
    }

    /// Inputs whose desired state is pressed
    pub fn pressed(&self) -> impl Iterator<Item = Input> + '_ {
        self.iter().filter(|&(_, p)| p).map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn push_stick(entries: &mut Vec<(Input, bool)>, dirs: StickDirections, inputs: [Input; 4]) {
    let [left, right, up, down] = inputs;
    entries.push((left, dirs.left));
    entries.push((right, dirs.right));
    entries.push((up, dirs.up));
    entries.push((down, dirs.down));
}
