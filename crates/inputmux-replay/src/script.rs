//! TOML raw-input scripts.
//!
//! A script is a list of frames.  Each frame advances the virtual clock, then
//! feeds its events into the input system in order, exactly as a platform
//! backend's event pump would between `start_update` and `end_update`:
//!
//! ```toml
//! [[frames]]
//! advance_ms = 16
//! events = [
//!     { type = "key", device = 0, key = "W", text = "w", pressed = true },
//!     { type = "mouse_move", device = 1, dx = 4.0, dy = -1.5 },
//! ]
//!
//! [[frames]]
//! advance_ms = 800            # long enough for key repeat to kick in
//!
//! [[frames]]
//! events = [
//!     { type = "key", device = 0, key = "W", pressed = false },
//!     { type = "focus", has_focus = false },
//! ]
//! ```
//!
//! `device` is the device's index in the profile's `[[devices]]` list.

use std::path::{Path, PathBuf};

use inputmux_core::{DeviceHandle, InputSystem, KeyCode, MouseButton, MouseMotion, RawInputSink};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for script loading.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A file system I/O error occurred.
    #[error("I/O error reading script at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse script TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// An event names a device index the profile does not define.
    #[error("frame {frame}: event refers to unknown device {device} (profile has {available})")]
    UnknownDevice {
        frame: usize,
        device: usize,
        available: usize,
    },
}

/// A complete script.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Script {
    #[serde(default)]
    pub frames: Vec<Frame>,
}

/// One update cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Virtual time elapsed since the previous frame.
    #[serde(default = "default_advance_ms")]
    pub advance_ms: u64,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

fn default_advance_ms() -> u64 {
    16
}

/// One raw transition or system call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Key {
        device: usize,
        key: KeyCode,
        #[serde(default)]
        text: Option<char>,
        pressed: bool,
    },
    MouseButton {
        device: usize,
        button: MouseButton,
        pressed: bool,
    },
    /// Relative pointer motion.
    MouseMove { device: usize, dx: f32, dy: f32 },
    /// Absolute pointer position.
    MouseMoveTo { device: usize, x: f32, y: f32 },
    MouseWheel { device: usize, delta: f32 },
    JoystickButton {
        device: usize,
        button: usize,
        pressed: bool,
    },
    JoystickAxis { device: usize, axis: usize, value: f32 },
    Focus { has_focus: bool },
    MouseGrab { enabled: bool },
    MultiDeviceMode { enabled: bool },
    ClearChannelAssignments,
}

impl ScriptEvent {
    /// The device index the event targets, if any.
    pub fn device(&self) -> Option<usize> {
        match *self {
            ScriptEvent::Key { device, .. }
            | ScriptEvent::MouseButton { device, .. }
            | ScriptEvent::MouseMove { device, .. }
            | ScriptEvent::MouseMoveTo { device, .. }
            | ScriptEvent::MouseWheel { device, .. }
            | ScriptEvent::JoystickButton { device, .. }
            | ScriptEvent::JoystickAxis { device, .. } => Some(device),
            ScriptEvent::Focus { .. }
            | ScriptEvent::MouseGrab { .. }
            | ScriptEvent::MultiDeviceMode { .. }
            | ScriptEvent::ClearChannelAssignments => None,
        }
    }

    /// Feeds the event into `system`.
    pub fn apply(&self, system: &mut InputSystem) {
        match *self {
            ScriptEvent::Key {
                device,
                key,
                text,
                pressed,
            } => system.key(DeviceHandle(device), key, text, pressed),
            ScriptEvent::MouseButton { device, button, pressed } => {
                system.mouse_button(DeviceHandle(device), button, pressed)
            }
            ScriptEvent::MouseMove { device, dx, dy } => {
                system.mouse_moved(DeviceHandle(device), MouseMotion::Relative { dx, dy })
            }
            ScriptEvent::MouseMoveTo { device, x, y } => {
                system.mouse_moved(DeviceHandle(device), MouseMotion::Absolute { x, y })
            }
            ScriptEvent::MouseWheel { device, delta } => system.mouse_wheel(DeviceHandle(device), delta),
            ScriptEvent::JoystickButton { device, button, pressed } => {
                system.joystick_button(DeviceHandle(device), button, pressed)
            }
            ScriptEvent::JoystickAxis { device, axis, value } => {
                system.joystick_axis(DeviceHandle(device), axis, value)
            }
            ScriptEvent::Focus { has_focus } => system.set_focus(has_focus),
            ScriptEvent::MouseGrab { enabled } => system.set_mouse_grab(enabled),
            ScriptEvent::MultiDeviceMode { enabled } => system.set_multi_device_mode(enabled),
            ScriptEvent::ClearChannelAssignments => system.clear_channel_assignments(),
        }
    }
}

impl Script {
    /// Parses a script from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(text)?)
    }

    /// Checks every device index against a profile with `available` devices.
    pub fn validate(&self, available: usize) -> Result<(), ScriptError> {
        for (frame, f) in self.frames.iter().enumerate() {
            if let Some(device) = f.events.iter().filter_map(ScriptEvent::device).find(|&d| d >= available) {
                return Err(ScriptError::UnknownDevice {
                    frame,
                    device,
                    available,
                });
            }
        }
        Ok(())
    }
}

/// Loads a script from a TOML file.
pub fn load_script(path: &Path) -> Result<Script, ScriptError> {
    let text = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Script::from_toml_str(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frames_and_events() {
        // Arrange
        let text = r#"
            [[frames]]
            events = [
                { type = "key", device = 0, key = "W", text = "w", pressed = true },
                { type = "mouse_move", device = 1, dx = 4.0, dy = -1.5 },
                { type = "focus", has_focus = false },
                { type = "clear_channel_assignments" },
            ]

            [[frames]]
            advance_ms = 800
        "#;

        // Act
        let script = Script::from_toml_str(text).unwrap();

        // Assert
        assert_eq!(script.frames.len(), 2);
        assert_eq!(script.frames[0].advance_ms, 16);
        assert_eq!(script.frames[1].advance_ms, 800);
        assert!(script.frames[1].events.is_empty());
        assert_eq!(
            script.frames[0].events,
            vec![
                ScriptEvent::Key {
                    device: 0,
                    key: KeyCode::W,
                    text: Some('w'),
                    pressed: true
                },
                ScriptEvent::MouseMove {
                    device: 1,
                    dx: 4.0,
                    dy: -1.5
                },
                ScriptEvent::Focus { has_focus: false },
                ScriptEvent::ClearChannelAssignments,
            ]
        );
    }

    #[test]
    fn test_unknown_event_type_is_parse_error() {
        let text = "[[frames]]\nevents = [{ type = \"teleport\", device = 0 }]\n";
        assert!(matches!(Script::from_toml_str(text), Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_device() {
        // Arrange
        let text = r#"
            [[frames]]
            events = [{ type = "mouse_wheel", device = 0, delta = 1.0 }]
            [[frames]]
            events = [{ type = "joystick_axis", device = 3, axis = 0, value = 0.5 }]
        "#;
        let script = Script::from_toml_str(text).unwrap();

        // Act
        let err = script.validate(2).unwrap_err();

        // Assert
        assert!(matches!(
            err,
            ScriptError::UnknownDevice {
                frame: 1,
                device: 3,
                available: 2
            }
        ));
        assert!(script.validate(4).is_ok());
    }

    #[test]
    fn test_system_events_have_no_device() {
        assert_eq!(ScriptEvent::MouseGrab { enabled: true }.device(), None);
        assert_eq!(
            ScriptEvent::JoystickButton {
                device: 2,
                button: 0,
                pressed: true
            }
            .device(),
            Some(2)
        );
    }
}
