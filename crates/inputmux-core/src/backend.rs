//! Contracts between the input core and platform backends.
//!
//! A platform backend (RawInput on Windows, evdev/XInput2 on Linux,
//! IOHIDManager on macOS, or the virtual backend used for replay and tests)
//! does two things the core cannot:
//!
//! 1. **Enumerate devices** once at start-up, described by
//!    [`DeviceDescriptor`]s, and engage/release the OS-level pointer grab.
//!    That half is the [`PlatformBackend`] trait, owned by the input system.
//! 2. **Feed raw transitions** into the core while the application pumps its
//!    OS events.  That half is the [`RawInputSink`] trait, implemented by
//!    `InputSystem`.  It is the only way a backend can mutate device state.
//!
//! Backends address devices by [`DeviceHandle`], the position of the device in
//! the list returned from [`PlatformBackend::enumerate_devices`].  Handles stay
//! valid even when promotion reorders the device list.

use crate::device::{DeviceHandle, DeviceKind, MOUSE_AXIS_COUNT};
use crate::error::InitError;
use crate::keycode::{KeyCode, MouseButton, KEYBOARD_BUTTON_COUNT};

/// Static description of one discovered device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    /// Product name reported by the OS; may be empty.
    pub name: String,
    pub num_buttons: usize,
    pub num_axes: usize,
    /// Optional per-button descriptions; missing entries read as empty.
    pub button_names: Vec<String>,
    /// Optional per-axis descriptions; missing entries read as empty.
    pub axis_names: Vec<String>,
}

impl DeviceDescriptor {
    /// A mouse with the standard button and axis layout.
    pub fn mouse(name: impl Into<String>) -> Self {
        Self {
            kind: DeviceKind::Mouse,
            name: name.into(),
            num_buttons: MouseButton::COUNT,
            num_axes: MOUSE_AXIS_COUNT,
            button_names: Vec::new(),
            axis_names: Vec::new(),
        }
    }

    /// A keyboard with one button per scan code.
    pub fn keyboard(name: impl Into<String>) -> Self {
        Self {
            kind: DeviceKind::Keyboard,
            name: name.into(),
            num_buttons: KEYBOARD_BUTTON_COUNT,
            num_axes: 0,
            button_names: Vec::new(),
            axis_names: Vec::new(),
        }
    }

    /// A game controller with a backend-specific layout.
    pub fn joystick(name: impl Into<String>, num_buttons: usize, num_axes: usize) -> Self {
        Self {
            kind: DeviceKind::Joystick,
            name: name.into(),
            num_buttons,
            num_axes,
            button_names: Vec::new(),
            axis_names: Vec::new(),
        }
    }

    /// Attaches per-button descriptions.
    pub fn with_button_names(mut self, names: Vec<String>) -> Self {
        self.button_names = names;
        self
    }

    /// Attaches per-axis descriptions.
    pub fn with_axis_names(mut self, names: Vec<String>) -> Self {
        self.axis_names = names;
        self
    }

    /// Checks the layout the core relies on for each kind.
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        match self.kind {
            DeviceKind::Mouse if self.num_buttons < MouseButton::COUNT => {
                Err("mouse must expose at least the standard mouse buttons")
            }
            DeviceKind::Mouse if self.num_axes < MOUSE_AXIS_COUNT => {
                Err("mouse must expose x, y and wheel axes")
            }
            DeviceKind::Keyboard if self.num_buttons != KEYBOARD_BUTTON_COUNT => {
                Err("keyboard must expose one button per scan code")
            }
            _ => Ok(()),
        }
    }
}

/// Platform half of the backend contract, owned by the input system.
///
/// Production implementations talk to the OS; tests use the generated
/// `MockPlatformBackend` or an in-memory backend.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformBackend {
    /// Discovers every input device, in enumeration order.
    ///
    /// Called exactly once, from `InputSystem::initialize`.  An error aborts
    /// initialisation.
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceDescriptor>, InitError>;

    /// Engages (`true`) or releases (`false`) the OS-level pointer grab.
    ///
    /// Only called when the effective grab state actually flips.
    fn set_mouse_grab(&mut self, grabbed: bool);
}

/// How a backend reports pointer motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseMotion {
    /// Raw device delta (RawInput, evdev).
    Relative { dx: f32, dy: f32 },
    /// Cursor position in window coordinates (window-message based backends).
    Absolute { x: f32, y: f32 },
}

/// Event-injection half of the backend contract.
///
/// Each method reports exactly one raw transition.  The receiver updates device
/// state, applies promotion and single-device rerouting, then runs the event
/// pipeline.  Calls naming an unknown handle, or a handle of the wrong device
/// kind, are ignored.
pub trait RawInputSink {
    fn mouse_button(&mut self, mouse: DeviceHandle, button: MouseButton, pressed: bool);

    fn mouse_moved(&mut self, mouse: DeviceHandle, motion: MouseMotion);

    fn mouse_wheel(&mut self, mouse: DeviceHandle, delta: f32);

    /// `text` is the code point the key press produced under the active layout.
    fn key(&mut self, keyboard: DeviceHandle, key: KeyCode, text: Option<char>, pressed: bool);

    fn joystick_button(&mut self, joystick: DeviceHandle, button: usize, pressed: bool);

    fn joystick_axis(&mut self, joystick: DeviceHandle, axis: usize, value: f32);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_descriptors_validate() {
        assert!(DeviceDescriptor::mouse("m").validate().is_ok());
        assert!(DeviceDescriptor::keyboard("k").validate().is_ok());
        assert!(DeviceDescriptor::joystick("j", 12, 6).validate().is_ok());
    }

    #[test]
    fn test_mouse_without_wheel_axis_is_rejected() {
        // Arrange
        let mut desc = DeviceDescriptor::mouse("two-axis mouse");
        desc.num_axes = 2;

        // Act / Assert
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_keyboard_with_short_button_table_is_rejected() {
        let mut desc = DeviceDescriptor::keyboard("tiny");
        desc.num_buttons = 104;
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_builder_attaches_control_names() {
        let desc = DeviceDescriptor::joystick("pad", 2, 1)
            .with_button_names(vec!["A".into(), "B".into()])
            .with_axis_names(vec!["Stick X".into()]);

        assert_eq!(desc.button_names, vec!["A", "B"]);
        assert_eq!(desc.axis_names, vec!["Stick X"]);
    }
}
