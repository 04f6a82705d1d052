//! Error types for input system initialisation.
//!
//! The per-frame path has no error type: missing channels are created on
//! demand and out-of-range controls read as neutral values.

use thiserror::Error;

use crate::device::DeviceKind;

/// Errors that can occur while bringing up an `InputSystem`.
#[derive(Debug, Error, PartialEq)]
pub enum InitError {
    /// The platform backend failed to open or enumerate devices.
    #[error("backend error: {0}")]
    Backend(String),

    /// A backend described a device whose layout the core cannot use.
    #[error("invalid {kind} descriptor at index {index} ({name:?}): {reason}")]
    InvalidDevice {
        index: usize,
        kind: DeviceKind,
        name: String,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_device_message_names_the_device() {
        let err = InitError::InvalidDevice {
            index: 2,
            kind: DeviceKind::Mouse,
            name: "trackball".to_string(),
            reason: "mouse must expose x, y and wheel axes",
        };

        let msg = err.to_string();
        assert!(msg.contains("mouse"));
        assert!(msg.contains("index 2"));
        assert!(msg.contains("\"trackball\""));
    }
}
