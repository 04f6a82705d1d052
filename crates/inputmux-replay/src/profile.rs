//! TOML binding profiles.
//!
//! A profile describes the virtual devices to create, the input system
//! settings, and which physical controls feed which channels:
//!
//! ```toml
//! [input]
//! multi_device_mode = false
//!
//! [input.key_repeat]
//! enabled = true
//!
//! [[devices]]
//! kind = "keyboard"
//! name = "Keyboard"
//!
//! [[devices]]
//! kind = "mouse"
//!
//! [[devices]]
//! kind = "joystick"
//! name = "Gamepad"
//! buttons = 12
//! axes = 4
//!
//! # Digital channel 0: Space on keyboard 0, or button 0 on the gamepad
//! [[digital]]
//! channel = 0
//! device = 0
//! key = "Space"
//!
//! [[digital]]
//! channel = 0
//! device = 2
//! button = 0
//!
//! # Analog channel 1: stick X, only past 0.2, doubled
//! [[analog]]
//! channel = 1
//! device = 2
//! axis = 0
//! scale = 2.0
//! threshold = 0.2
//! ```
//!
//! Each binding names exactly one control: `key`, `mouse_button`, `button`
//! (raw button index) or `axis`.  Device indices refer to the `[[devices]]`
//! list, which is also the id each device starts with.
//!
//! # How a binding becomes a source
//!
//! | Table       | Control                   | Source                                       |
//! |-------------|---------------------------|----------------------------------------------|
//! | `[[digital]]` | key / button            | button source                                |
//! | `[[digital]]` | axis                    | axis source, `threshold` (default 0.5)       |
//! | `[[analog]]`  | key / button            | button source, `magnitude` (default 1.0)     |
//! | `[[analog]]`  | axis                    | raw axis source                              |
//! | `[[analog]]`  | axis + `scale`          | limited axis source, `threshold` (default 0) |

use std::path::{Path, PathBuf};

use inputmux_core::{
    ControlId, DeviceDescriptor, DeviceId, DeviceKind, InputConfig, InputSystem, KeyCode, MouseButton,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::virtual_backend::VirtualBackend;

/// Error type for profile loading and binding.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading profile at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A binding refers to a device index the profile does not define.
    #[error("{table} binding for channel {channel} refers to unknown device {device}")]
    UnknownDevice {
        table: &'static str,
        channel: usize,
        device: DeviceId,
    },

    /// A binding is malformed or does not fit its device.
    #[error("invalid {table} binding for channel {channel}: {reason}")]
    InvalidBinding {
        table: &'static str,
        channel: usize,
        reason: String,
    },
}

// ── Schema types ──────────────────────────────────────────────────────────────

/// A complete binding profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
    #[serde(default)]
    pub digital: Vec<DigitalBinding>,
    #[serde(default)]
    pub analog: Vec<AnalogBinding>,
}

/// One virtual device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceEntry {
    pub kind: DeviceKind,
    #[serde(default)]
    pub name: String,
    /// Joysticks only.
    #[serde(default = "default_joystick_buttons")]
    pub buttons: usize,
    /// Joysticks only.
    #[serde(default = "default_joystick_axes")]
    pub axes: usize,
}

/// A control on a device, as written in a binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ControlRef {
    pub device: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse_button: Option<MouseButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<ControlId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<ControlId>,
}

/// Binds one control to a digital channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DigitalBinding {
    pub channel: usize,
    #[serde(flatten)]
    pub control: ControlRef,
    /// Axis bindings only.
    #[serde(default = "default_digital_threshold")]
    pub threshold: f32,
}

/// Binds one control to an analog channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalogBinding {
    pub channel: usize,
    #[serde(flatten)]
    pub control: ControlRef,
    /// Button bindings only.
    #[serde(default = "default_magnitude")]
    pub magnitude: f32,
    /// Turns an axis binding into a limited axis binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Limited axis bindings only.
    #[serde(default)]
    pub threshold: f32,
}

// ── Default value functions ───────────────────────────────────────────────────

fn default_joystick_buttons() -> usize {
    12
}
fn default_joystick_axes() -> usize {
    4
}
fn default_digital_threshold() -> f32 {
    0.5
}
fn default_magnitude() -> f32 {
    1.0
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// A control resolved against the device list.
enum Control {
    Button(ControlId),
    Axis(ControlId),
}

impl DeviceEntry {
    pub fn descriptor(&self) -> DeviceDescriptor {
        match self.kind {
            DeviceKind::Mouse => DeviceDescriptor::mouse(self.name.clone()),
            DeviceKind::Keyboard => DeviceDescriptor::keyboard(self.name.clone()),
            DeviceKind::Joystick => DeviceDescriptor::joystick(self.name.clone(), self.buttons, self.axes),
        }
    }
}

impl ControlRef {
    fn resolve(&self, table: &'static str, channel: usize, devices: &[DeviceEntry]) -> Result<Control, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBinding {
            table,
            channel,
            reason: reason.to_string(),
        };
        let kind = devices
            .get(self.device)
            .map(|d| d.kind)
            .ok_or(ConfigError::UnknownDevice {
                table,
                channel,
                device: self.device,
            })?;

        let named = [
            self.key.is_some(),
            self.mouse_button.is_some(),
            self.button.is_some(),
            self.axis.is_some(),
        ];
        if named.iter().filter(|&&n| n).count() != 1 {
            return Err(invalid("exactly one of key, mouse_button, button or axis is required"));
        }

        match (self.key, self.mouse_button, self.button, self.axis) {
            (Some(key), ..) if kind == DeviceKind::Keyboard => Ok(Control::Button(key.index())),
            (Some(_), ..) => Err(invalid("key bindings need a keyboard")),
            (_, Some(button), ..) if kind == DeviceKind::Mouse => Ok(Control::Button(button.index())),
            (_, Some(_), ..) => Err(invalid("mouse_button bindings need a mouse")),
            (_, _, Some(button), _) => Ok(Control::Button(button)),
            (_, _, _, Some(axis)) if kind != DeviceKind::Keyboard => Ok(Control::Axis(axis)),
            _ => Err(invalid("keyboards have no axes")),
        }
    }
}

impl Profile {
    /// Parses a profile from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Descriptors for every device, in list order.
    pub fn descriptors(&self) -> Vec<DeviceDescriptor> {
        self.devices.iter().map(DeviceEntry::descriptor).collect()
    }

    /// A virtual backend reporting this profile's devices.
    pub fn backend(&self) -> VirtualBackend {
        VirtualBackend::new(self.descriptors())
    }

    /// Adds every binding to the system's channels.
    ///
    /// All bindings are checked before any is applied, so a failing profile
    /// leaves the channels untouched.
    pub fn apply_bindings(&self, system: &mut InputSystem) -> Result<(), ConfigError> {
        let digital = self
            .digital
            .iter()
            .map(|b| Ok((b, b.control.resolve("digital", b.channel, &self.devices)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let analog = self
            .analog
            .iter()
            .map(|b| Ok((b, b.control.resolve("analog", b.channel, &self.devices)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        for (binding, control) in digital {
            let device = binding.control.device;
            let channel = system.get_digital(binding.channel);
            match control {
                Control::Button(button) => channel.add_digital_source(device, button),
                Control::Axis(axis) => channel.add_analog_source(device, axis, binding.threshold),
            }
        }
        for (binding, control) in analog {
            let device = binding.control.device;
            let channel = system.get_analog(binding.channel);
            match (control, binding.scale) {
                (Control::Button(button), _) => channel.add_digital_source(device, button, binding.magnitude),
                (Control::Axis(axis), None) => channel.add_analog_source(device, axis),
                (Control::Axis(axis), Some(scale)) => {
                    channel.add_digitalized_analog_source(device, axis, scale, binding.threshold)
                }
            }
        }

        debug!(
            digital = self.digital.len(),
            analog = self.analog.len(),
            "applied profile bindings"
        );
        Ok(())
    }
}

/// Loads a profile from a TOML file.
pub fn load_profile(path: &Path) -> Result<Profile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Profile::from_toml_str(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
