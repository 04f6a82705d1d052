//! Input system configuration.
//!
//! All fields carry serde defaults, so an empty table or a partial file
//! deserialises to a working configuration:
//!
//! ```toml
//! multi_device_mode = false
//! mouse_grab = true
//!
//! [key_repeat]
//! enabled = true
//! delay = 0.5
//! ```

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;
use crate::key_repeat::KeyRepeatConfig;

/// Settings applied by `InputSystem::initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub key_repeat: KeyRepeatConfig,
    /// Report every device under its own identity instead of merging
    /// secondary mice and keyboards into the primary one.
    #[serde(default)]
    pub multi_device_mode: bool,
    /// Grab the pointer while the window has focus (single-device mode only).
    #[serde(default)]
    pub mouse_grab: bool,
    /// Promote the first mouse that shows activity to primary.
    #[serde(default = "default_true")]
    pub promote_mice_on_activity: bool,
    /// Promote the first keyboard that shows activity to primary.
    #[serde(default = "default_true")]
    pub promote_keyboards_on_activity: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_repeat: KeyRepeatConfig::default(),
            multi_device_mode: false,
            mouse_grab: false,
            promote_mice_on_activity: default_true(),
            promote_keyboards_on_activity: default_true(),
        }
    }
}

impl InputConfig {
    /// Whether activity-based promotion applies to devices of `kind`.
    pub fn promotes(&self, kind: DeviceKind) -> bool {
        match kind {
            DeviceKind::Mouse => self.promote_mice_on_activity,
            DeviceKind::Keyboard => self.promote_keyboards_on_activity,
            DeviceKind::Joystick => false,
        }
    }
}
