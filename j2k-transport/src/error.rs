//! Transport error types

use thiserror::Error;

/// Errors that can occur while discovering or reading a controller
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    // HID-specific errors
    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") || msg.contains("EACCES") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_detection() {
        let err = TransportError::from(hidapi::HidError::HidApiError {
            message: "Permission denied".into(),
        });
        assert!(matches!(err, TransportError::HidPermissionDenied(_)));

        let err = TransportError::from(hidapi::HidError::HidApiError {
            message: "Input/output error".into(),
        });
        assert!(matches!(err, TransportError::HidError(_)));
    }
}
