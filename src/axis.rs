//! Analog stick processing
//!
//! Converts raw signed axis pairs into deadzone-filtered directional flags.

/// Divisor that maps a raw i16 axis value onto [-1.0, 1.0]
pub const AXIS_SCALE: f64 = 32768.0;

/// Default radial deadzone (fraction of full deflection)
pub const DEFAULT_DEADZONE: f64 = 0.2;

/// Component threshold for a direction to count as held
pub const DIRECTION_THRESHOLD: f64 = 0.5;

/// Directional flags for one stick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickDirections {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl StickDirections {
    /// True if any direction is held
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Normalize a raw axis value to [-1.0, 1.0]
pub fn normalize_axis(value: i16) -> f64 {
    f64::from(value) / AXIS_SCALE
}

/// Apply a radial deadzone and rescale to a unit vector
///
/// Returns `(0.0, 0.0)` when the magnitude is below `deadzone`, otherwise the
/// direction of `(x, y)` with magnitude 1.
pub fn apply_deadzone(x: f64, y: f64, deadzone: f64) -> (f64, f64) {
    let magnitude = x.hypot(y);
    if magnitude < deadzone || magnitude == 0.0 {
        return (0.0, 0.0);
    }
    (x / magnitude, y / magnitude)
}

/// Derive directional flags from a raw axis pair
///
/// Negative Y is "up" on the controller's axes.
pub fn stick_directions(raw_x: i16, raw_y: i16, deadzone: f64) -> StickDirections {
    let (x, y) = apply_deadzone(normalize_axis(raw_x), normalize_axis(raw_y), deadzone);

    StickDirections {
        left: x < -DIRECTION_THRESHOLD,
        right: x > DIRECTION_THRESHOLD,
        up: y < -DIRECTION_THRESHOLD,
        down: y > DIRECTION_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize_axis(i16::MIN), -1.0);
        assert_eq!(normalize_axis(0), 0.0);
        assert!(normalize_axis(i16::MAX) < 1.0);
        assert!(normalize_axis(i16::MAX) > 0.9999);
    }

    #[test]
    fn test_inside_deadzone() {
        // magnitude ~0.043
        let dirs = stick_directions(1000, 1000, DEFAULT_DEADZONE);
        assert_eq!(dirs, StickDirections::default());
        assert!(!dirs.any());
    }

    #[test]
    fn test_centered() {
        assert_eq!(
            stick_directions(0, 0, DEFAULT_DEADZONE),
            StickDirections::default()
        );
        // Zero deadzone must not divide by zero
        assert_eq!(stick_directions(0, 0, 0.0), StickDirections::default());
    }

    #[test]
    fn test_full_left() {
        let dirs = stick_directions(i16::MIN, 0, DEFAULT_DEADZONE);
        assert!(dirs.left);
        assert!(!dirs.right);
        assert!(!dirs.up);
        assert!(!dirs.down);
    }

    #[test]
    fn test_full_right_up_down() {
        assert_eq!(
            stick_directions(i16::MAX, 0, DEFAULT_DEADZONE),
            StickDirections {
                right: true,
                ..Default::default()
            }
        );
        assert_eq!(
            stick_directions(0, i16::MIN, DEFAULT_DEADZONE),
            StickDirections {
                up: true,
                ..Default::default()
            }
        );
        assert_eq!(
            stick_directions(0, i16::MAX, DEFAULT_DEADZONE),
            StickDirections {
                down: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_diagonal_sets_two_directions() {
        // 45 degrees: each unit component is ~0.707
        let dirs = stick_directions(-20000, 20000, DEFAULT_DEADZONE);
        assert!(dirs.left);
        assert!(dirs.down);
        assert!(!dirs.right);
        assert!(!dirs.up);
    }

    #[test]
    fn test_magnitude_is_discarded() {
        // Just outside the deadzone counts the same as full deflection
        let small = stick_directions(-7000, 0, DEFAULT_DEADZONE);
        let full = stick_directions(i16::MIN, 0, DEFAULT_DEADZONE);
        assert_eq!(small, full);
    }

    #[test]
    fn test_shallow_angle_only_major_axis() {
        // Mostly right, slightly down: y component ~0.24 after rescale
        let dirs = stick_directions(30000, 7500, DEFAULT_DEADZONE);
        assert!(dirs.right);
        assert!(!dirs.down);
    }

    #[test]
    fn test_apply_deadzone_unit_length() {
        let (x, y) = apply_deadzone(0.3, 0.4, 0.2);
        assert!((x - 0.6).abs() < 1e-9);
        assert!((y - 0.8).abs() < 1e-9);
        assert_eq!(apply_deadzone(0.1, 0.1, 0.2), (0.0, 0.0));
    }

    #[test]
    fn test_opposites_never_both_set() {
        for &x in &[i16::MIN, -20000, -1, 0, 1, 20000, i16::MAX] {
            for &y in &[i16::MIN, -20000, -1, 0, 1, 20000, i16::MAX] {
                let dirs = stick_directions(x, y, DEFAULT_DEADZONE);
                assert!(!(dirs.left && dirs.right));
                assert!(!(dirs.up && dirs.down));
            }
        }
    }
}
