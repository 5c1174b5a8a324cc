//! Error types for the emulator

use j2k_transport::TransportError;
use thiserror::Error;

use crate::keyboard::KeyboardError;
use crate::keymap::MappingError;
use crate::report::ReportError;

/// Errors surfaced by the emulator
///
/// `Initialization`, `SignalHandler` and `DeviceUnavailable` are fatal at
/// startup.
/// `ShortRead` and `TransientRead` only skip a poll cycle.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to initialize virtual keyboard: {0}")]
    Initialization(#[source] KeyboardError),

    #[error("Failed to install Ctrl+C handler: {0}")]
    SignalHandler(#[source] ctrlc::Error),

    #[error("Controller unavailable: {0}")]
    DeviceUnavailable(#[source] TransportError),

    #[error(transparent)]
    ShortRead(#[from] ReportError),

    #[error("Error reading from controller: {0}")]
    TransientRead(#[source] TransportError),

    #[error("Invalid key mapping: {0}")]
    Mapping(#[from] MappingError),
}
