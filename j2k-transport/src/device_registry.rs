//! Known controller VID/PID pairs

/// Microsoft vendor ID
pub const VENDOR_MICROSOFT: u16 = 0x045E;

/// Xbox 360 wired controller product ID
pub const PID_XBOX360_WIRED: u16 = 0x028E;

/// Controllers whose input report matches the supported layout
pub const KNOWN_CONTROLLERS: &[(u16, u16, &str)] =
    &[(VENDOR_MICROSOFT, PID_XBOX360_WIRED, "Xbox 360 Controller")];

/// Look up a controller name by VID/PID
pub fn controller_name(vid: u16, pid: u16) -> Option<&'static str> {
    KNOWN_CONTROLLERS
        .iter()
        .find(|&&(v, p, _)| v == vid && p == pid)
        .map(|&(_, _, name)| name)
}

/// Check if a VID/PID pair is a known controller
pub fn is_known_controller(vid: u16, pid: u16) -> bool {
    controller_name(vid, pid).is_some()
}
