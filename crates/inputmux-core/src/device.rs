//! Device model: one physical input device and its per-frame control state.
//!
//! Every device, regardless of kind, is a flat set of **buttons** (digital,
//! up/down) and **axes** (analog, `f32`).  The kind decides how many of each
//! there are and what they mean:
//!
//! | Kind     | Buttons                               | Axes                           |
//! |----------|---------------------------------------|--------------------------------|
//! | Mouse    | [`MouseButton::COUNT`] (see enum)     | 3: X, Y (absolute), wheel      |
//! | Keyboard | [`KEYBOARD_BUTTON_COUNT`] (scan codes) | none                           |
//! | Joystick | backend-defined                       | backend-defined                |
//!
//! State is written only by the input system on behalf of a platform backend;
//! applications read it through the query methods or through the typed views
//! returned by [`Device::as_mouse`], [`Device::as_keyboard`] and
//! [`Device::as_joystick`].
//!
//! # Current vs. previous state
//!
//! At the start of every frame the current state is copied into the previous
//! state.  `was_button_pressed` is therefore "down now, up at frame start" and
//! `axis_difference` is "value now minus value at frame start".

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::backend::DeviceDescriptor;
use crate::keycode::{KeyCode, MouseButton, KEYBOARD_BUTTON_COUNT};

/// Index of a device in the input system's device list.
///
/// Ids are dense (`0..num_devices`) but **not stable**: promotion swaps the
/// ids of two devices.  Backends address devices by [`DeviceHandle`] instead.
pub type DeviceId = usize;

/// Index of a button or axis on a device.
pub type ControlId = usize;

/// Mouse axis carrying the absolute horizontal position.
pub const MOUSE_AXIS_X: ControlId = 0;
/// Mouse axis carrying the absolute vertical position.
pub const MOUSE_AXIS_Y: ControlId = 1;
/// Mouse axis carrying the wheel movement of the current frame.
pub const MOUSE_AXIS_WHEEL: ControlId = 2;
/// Number of axes every mouse exposes.
pub const MOUSE_AXIS_COUNT: usize = 3;

/// Stable identity of a device as assigned by the backend at enumeration.
///
/// Unlike [`DeviceId`], a handle never changes for the lifetime of the input
/// system.  It equals the device's position in the backend's enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceHandle(pub usize);

impl std::fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The capability set a device belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Mouse,
    Keyboard,
    Joystick,
}

impl DeviceKind {
    /// All kinds, in slot order.
    pub const ALL: [DeviceKind; 3] = [DeviceKind::Mouse, DeviceKind::Keyboard, DeviceKind::Joystick];

    /// Dense index used for per-kind bookkeeping arrays.
    pub(crate) fn slot(self) -> usize {
        match self {
            DeviceKind::Mouse => 0,
            DeviceKind::Keyboard => 1,
            DeviceKind::Joystick => 2,
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeviceKind::Mouse => "mouse",
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Joystick => "joystick",
        };
        f.write_str(s)
    }
}

/// A physical input device.
#[derive(Debug, Clone)]
pub struct Device {
    handle: DeviceHandle,
    id: DeviceId,
    count: usize,
    kind: DeviceKind,
    name: String,
    button_names: Vec<String>,
    axis_names: Vec<String>,
    buttons: Vec<bool>,
    prev_buttons: Vec<bool>,
    axes: Vec<f32>,
    prev_axes: Vec<f32>,
    is_first_update: bool,
    was_promoted: bool,
}

impl Device {
    /// Builds a device in its neutral state from a backend descriptor.
    pub(crate) fn new(handle: DeviceHandle, id: DeviceId, count: usize, descriptor: &DeviceDescriptor) -> Self {
        Self {
            handle,
            id,
            count,
            kind: descriptor.kind,
            name: descriptor.name.clone(),
            button_names: descriptor.button_names.clone(),
            axis_names: descriptor.axis_names.clone(),
            buttons: vec![false; descriptor.num_buttons],
            prev_buttons: vec![false; descriptor.num_buttons],
            axes: vec![0.0; descriptor.num_axes],
            prev_axes: vec![0.0; descriptor.num_axes],
            is_first_update: true,
            was_promoted: false,
        }
    }

    /// Stable backend handle of this device.
    pub fn handle(&self) -> DeviceHandle {
        self.handle
    }

    /// Current position in the device list.
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Zero-based rank among devices of the same kind; `0` is the primary device.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Human-readable product name, empty when the backend offers none.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_buttons(&self) -> usize {
        self.buttons.len()
    }

    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    /// Description of a button, empty when unknown or out of range.
    pub fn button_text(&self, index: ControlId) -> &str {
        self.button_names.get(index).map(String::as_str).unwrap_or("")
    }

    /// Description of an axis, empty when unknown or out of range.
    pub fn axis_text(&self, index: ControlId) -> &str {
        self.axis_names.get(index).map(String::as_str).unwrap_or("")
    }

    /// `true` while the button is held.  Out-of-range indices report `false`.
    pub fn is_button_down(&self, index: ControlId) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// `true` if the button went down since the start of this frame.
    pub fn was_button_pressed(&self, index: ControlId) -> bool {
        self.is_button_down(index) && !self.prev_buttons.get(index).copied().unwrap_or(false)
    }

    /// `true` if the button went up since the start of this frame.
    pub fn was_button_released(&self, index: ControlId) -> bool {
        !self.is_button_down(index) && self.prev_buttons.get(index).copied().unwrap_or(false)
    }

    /// Current axis value.  Out-of-range indices report `0.0`.
    pub fn axis_absolute(&self, index: ControlId) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Axis value now minus axis value at the start of this frame.
    pub fn axis_difference(&self, index: ControlId) -> f32 {
        match (self.axes.get(index), self.prev_axes.get(index)) {
            (Some(now), Some(before)) => now - before,
            _ => 0.0,
        }
    }

    /// `true` until the first frame after registration has ended.
    pub fn is_first_update(&self) -> bool {
        self.is_first_update
    }

    /// `true` once the device has been considered for promotion.
    pub fn was_promoted(&self) -> bool {
        self.was_promoted
    }

    pub fn as_mouse(&self) -> Option<Mouse<'_>> {
        (self.kind == DeviceKind::Mouse).then_some(Mouse(self))
    }

    pub fn as_keyboard(&self) -> Option<Keyboard<'_>> {
        (self.kind == DeviceKind::Keyboard).then_some(Keyboard(self))
    }

    pub fn as_joystick(&self) -> Option<Joystick<'_>> {
        (self.kind == DeviceKind::Joystick).then_some(Joystick(self))
    }

    // ── State mutation (input system only) ────────────────────────────────────

    /// Sets a button, returning `true` if its state actually changed.
    pub(crate) fn set_button(&mut self, index: ControlId, down: bool) -> bool {
        match self.buttons.get_mut(index) {
            Some(slot) if *slot != down => {
                *slot = down;
                true
            }
            _ => false,
        }
    }

    /// Sets an axis, returning `true` if its value actually changed.
    pub(crate) fn set_axis(&mut self, index: ControlId, value: f32) -> bool {
        match self.axes.get_mut(index) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// Adds `delta` to an axis, returning `true` if its value actually changed.
    pub(crate) fn add_axis(&mut self, index: ControlId, delta: f32) -> bool {
        let value = self.axis_absolute(index) + delta;
        self.set_axis(index, value)
    }

    /// Makes the button read as "held at frame start" so a synthesized release
    /// still reports through `was_button_released`.
    pub(crate) fn mark_previously_down(&mut self, index: ControlId) {
        if let Some(slot) = self.prev_buttons.get_mut(index) {
            *slot = true;
        }
    }

    /// Clears the per-frame wheel axis, returning the value it held.
    pub(crate) fn reset_wheel(&mut self) -> f32 {
        let previous = self.axis_absolute(MOUSE_AXIS_WHEEL);
        self.set_axis(MOUSE_AXIS_WHEEL, 0.0);
        if let Some(slot) = self.prev_axes.get_mut(MOUSE_AXIS_WHEEL) {
            *slot = 0.0;
        }
        previous
    }

    /// Snapshots current state as the frame-start state.
    pub(crate) fn begin_frame(&mut self) {
        self.prev_buttons.copy_from_slice(&self.buttons);
        self.prev_axes.copy_from_slice(&self.axes);
    }

    pub(crate) fn end_first_update(&mut self) {
        self.is_first_update = false;
    }

    pub(crate) fn set_promoted(&mut self) {
        self.was_promoted = true;
    }

    pub(crate) fn set_rank(&mut self, id: DeviceId, count: usize) {
        self.id = id;
        self.count = count;
    }
}

// ── Typed views ───────────────────────────────────────────────────────────────

/// Mouse view of a [`Device`].
#[derive(Debug, Clone, Copy)]
pub struct Mouse<'a>(&'a Device);

impl<'a> Mouse<'a> {
    /// Absolute horizontal position.
    pub fn x(&self) -> f32 {
        self.0.axis_absolute(MOUSE_AXIS_X)
    }

    /// Absolute vertical position.
    pub fn y(&self) -> f32 {
        self.0.axis_absolute(MOUSE_AXIS_Y)
    }

    /// Horizontal movement since the start of this frame.
    pub fn rel_x(&self) -> f32 {
        self.0.axis_difference(MOUSE_AXIS_X)
    }

    /// Vertical movement since the start of this frame.
    pub fn rel_y(&self) -> f32 {
        self.0.axis_difference(MOUSE_AXIS_Y)
    }

    /// Wheel movement accumulated during this frame.
    pub fn wheel(&self) -> f32 {
        self.0.axis_absolute(MOUSE_AXIS_WHEEL)
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.0.is_button_down(button.index())
    }

    pub fn was_pressed(&self, button: MouseButton) -> bool {
        self.0.was_button_pressed(button.index())
    }

    pub fn was_released(&self, button: MouseButton) -> bool {
        self.0.was_button_released(button.index())
    }

    pub fn device(&self) -> &'a Device {
        self.0
    }
}

impl Deref for Mouse<'_> {
    type Target = Device;

    fn deref(&self) -> &Device {
        self.0
    }
}

/// Keyboard view of a [`Device`]; key codes are button indices.
#[derive(Debug, Clone, Copy)]
pub struct Keyboard<'a>(&'a Device);

impl<'a> Keyboard<'a> {
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.0.is_button_down(key.index())
    }

    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.0.was_button_pressed(key.index())
    }

    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.0.was_button_released(key.index())
    }

    /// Every key currently held, in scan-code order.
    pub fn keys_down(&self) -> impl Iterator<Item = KeyCode> + 'a {
        let device = self.0;
        (0..KEYBOARD_BUTTON_COUNT)
            .filter(move |&index| device.is_button_down(index))
            .filter_map(KeyCode::from_index)
    }

    pub fn device(&self) -> &'a Device {
        self.0
    }
}

impl Deref for Keyboard<'_> {
    type Target = Device;

    fn deref(&self) -> &Device {
        self.0
    }
}

/// Game controller view of a [`Device`].
#[derive(Debug, Clone, Copy)]
pub struct Joystick<'a>(&'a Device);

impl<'a> Joystick<'a> {
    /// Current value of every axis, in axis order.
    pub fn axes(&self) -> impl Iterator<Item = f32> + 'a {
        self.0.axes.iter().copied()
    }

    pub fn device(&self) -> &'a Device {
        self.0
    }
}

impl Deref for Joystick<'_> {
    type Target = Device;

    fn deref(&self) -> &Device {
        self.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
