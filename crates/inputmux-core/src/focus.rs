//! Focus and pointer-grab coordination.
//!
//! Three independent inputs decide whether the OS pointer should be grabbed:
//!
//! - `has_focus`: the application window has keyboard focus,
//! - `grab_enabled`: the application asked for a grab,
//! - `multi_device_mode`: every device reports separately.
//!
//! They reduce to one derived value,
//! `grabbed = grab_enabled && has_focus && !multi_device_mode`.  A grab without
//! focus would trap the pointer in a background window, and raw multi-mouse
//! sampling bypasses the system cursor anyway.
//!
//! Setters report whether their input changed; [`FocusState::rederive`] then
//! reports whether the derived grab flipped, so the backend primitive is called
//! once per flip and never otherwise.

/// Focus, grab intent and the derived grab state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    has_focus: bool,
    grab_enabled: bool,
    multi_device_mode: bool,
    grabbed: bool,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            has_focus: true,
            grab_enabled: false,
            multi_device_mode: false,
            grabbed: false,
        }
    }
}

impl FocusState {
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn grab_enabled(&self) -> bool {
        self.grab_enabled
    }

    pub fn multi_device_mode(&self) -> bool {
        self.multi_device_mode
    }

    /// The grab state last applied to the backend.
    pub fn grabbed(&self) -> bool {
        self.grabbed
    }

    /// The grab state the three inputs currently call for.
    pub fn should_grab(&self) -> bool {
        self.grab_enabled && self.has_focus && !self.multi_device_mode
    }

    /// Returns `true` if focus changed.
    pub fn set_focus(&mut self, has_focus: bool) -> bool {
        let changed = self.has_focus != has_focus;
        self.has_focus = has_focus;
        changed
    }

    /// Returns `true` if the grab intent changed.
    pub fn set_grab_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.grab_enabled != enabled;
        self.grab_enabled = enabled;
        changed
    }

    /// Returns `true` if the mode changed.
    pub fn set_multi_device_mode(&mut self, enabled: bool) -> bool {
        let changed = self.multi_device_mode != enabled;
        self.multi_device_mode = enabled;
        changed
    }

    /// Re-derives the grab; returns the new value only if it flipped.
    pub fn rederive(&mut self) -> Option<bool> {
        let wanted = self.should_grab();
        if wanted == self.grabbed {
            return None;
        }
        self.grabbed = wanted;
        Some(wanted)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
