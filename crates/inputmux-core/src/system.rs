//! `InputSystem`: the context object owning all input state.
//!
//! # Lifecycle
//!
//! ```text
//! InputSystem::initialize(backend, config)   -- enumerate + register devices
//! loop {
//!     system.start_update();                  -- new frame, key repeat tick
//!     backend pumps OS events into system     -- RawInputSink calls
//!     system.end_update();
//!     ... application reads channels / devices ...
//! }
//! system.shutdown();
//! ```
//!
//! # Raw event handling
//!
//! Every [`RawInputSink`] call goes through the same steps:
//!
//! 1. Resolve the backend handle to the device's current id.
//! 2. Promote the device on its first real activity (mice and keyboards, if
//!    enabled in [`InputConfig`]).
//! 3. Pick the device the event is reported under: itself, or in
//!    single-device mode the primary device of its kind.
//! 4. Apply the transition to the device's own state and, when rerouted, to
//!    the primary's state as well.
//! 5. Run the event pipeline on the reporting device, but only if its state
//!    actually changed.
//!
//! Synthesized events (wheel reset, key repeat, focus loss, clearing channel
//! assignments) skip steps 1–2 and never promote.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::backend::{MouseMotion, PlatformBackend, RawInputSink};
use crate::channel::{AnalogChannel, ChannelId, ChannelStore, DigitalChannel};
use crate::config::InputConfig;
use crate::device::{
    ControlId, Device, DeviceHandle, DeviceId, DeviceKind, Joystick, Keyboard, Mouse, MOUSE_AXIS_WHEEL, MOUSE_AXIS_X,
    MOUSE_AXIS_Y,
};
use crate::dispatch::Dispatcher;
use crate::error::InitError;
use crate::focus::FocusState;
use crate::handler::InputHandler;
use crate::key_repeat::{ArmedKey, KeyRepeat, KeyRepeatConfig};
use crate::keycode::{KeyCode, MouseButton};
use crate::registry::DeviceRegistry;

/// Owns devices, channels, the handler and every piece of per-system state.
pub struct InputSystem {
    backend: Box<dyn PlatformBackend>,
    devices: DeviceRegistry,
    channels: ChannelStore,
    handler: Option<Box<dyn InputHandler>>,
    key_repeat: KeyRepeat,
    focus: FocusState,
    config: InputConfig,
}

impl InputSystem {
    /// Enumerates devices through `backend` and builds the input system.
    ///
    /// Fails if the backend cannot enumerate, or describes a device whose
    /// layout does not fit its kind.  The window is assumed to have focus.
    pub fn initialize(backend: impl PlatformBackend + 'static, config: InputConfig) -> Result<Self, InitError> {
        let mut backend: Box<dyn PlatformBackend> = Box::new(backend);
        let descriptors = backend.enumerate_devices()?;

        let mut devices = DeviceRegistry::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            descriptor.validate().map_err(|reason| InitError::InvalidDevice {
                index,
                kind: descriptor.kind,
                name: descriptor.name.clone(),
                reason,
            })?;
            devices.register(descriptor);
        }

        info!(
            mice = devices.count_of(DeviceKind::Mouse),
            keyboards = devices.count_of(DeviceKind::Keyboard),
            joysticks = devices.count_of(DeviceKind::Joystick),
            multi_device_mode = config.multi_device_mode,
            "input system initialised"
        );

        let mut focus = FocusState::default();
        focus.set_multi_device_mode(config.multi_device_mode);
        focus.set_grab_enabled(config.mouse_grab);

        let mut system = Self {
            backend,
            devices,
            channels: ChannelStore::new(),
            handler: None,
            key_repeat: KeyRepeat::new(config.key_repeat),
            focus,
            config,
        };
        system.apply_grab();
        Ok(system)
    }

    /// Releases the pointer grab and drops every device.
    pub fn shutdown(mut self) {
        self.focus.set_grab_enabled(false);
        self.apply_grab();
        info!(devices = self.devices.len(), "input system shut down");
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    // ── Frame cycle ───────────────────────────────────────────────────────────

    /// Begins a frame using the current wall-clock time.
    pub fn start_update(&mut self) {
        self.start_update_at(Instant::now());
    }

    /// Begins a frame at `now`.
    ///
    /// Resets per-frame channel tracking, snapshots device state, returns every
    /// mouse wheel to zero and advances the key-repeat timer.
    pub fn start_update_at(&mut self, now: Instant) {
        self.channels.begin_frame();

        for id in 0..self.devices.len() {
            let visible = self.is_reported(id);
            let Some(device) = self.devices.device_mut(id) else {
                continue;
            };
            device.begin_frame();
            if device.kind() != DeviceKind::Mouse {
                continue;
            }
            let wheel = device.reset_wheel();
            if wheel != 0.0 && visible {
                self.dispatcher().mouse_wheel(id, -wheel);
            }
        }

        if let Some(armed) = self.key_repeat.tick(now) {
            self.repeat_key(armed);
        }
    }

    /// Ends a frame.  Devices leave their first-update phase here.
    pub fn end_update(&mut self) {
        for device in self.devices.iter_mut() {
            device.end_first_update();
        }
    }

    // ── Handler ───────────────────────────────────────────────────────────────

    /// Installs the event handler, returning the previous one.
    pub fn set_handler(&mut self, handler: Box<dyn InputHandler>) -> Option<Box<dyn InputHandler>> {
        self.handler.replace(handler)
    }

    /// Removes the event handler.  Without one, every event reaches the channels.
    pub fn take_handler(&mut self) -> Option<Box<dyn InputHandler>> {
        self.handler.take()
    }

    // ── Devices ───────────────────────────────────────────────────────────────

    pub fn registry(&self) -> &DeviceRegistry {
        &self.devices
    }

    /// Every device, in id order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.device(id)
    }

    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    pub fn num_mice(&self) -> usize {
        self.devices.count_of(DeviceKind::Mouse)
    }

    pub fn num_keyboards(&self) -> usize {
        self.devices.count_of(DeviceKind::Keyboard)
    }

    pub fn num_joysticks(&self) -> usize {
        self.devices.count_of(DeviceKind::Joystick)
    }

    pub fn mouse_by_count(&self, count: usize) -> Option<Mouse<'_>> {
        self.devices.by_count(DeviceKind::Mouse, count).and_then(Device::as_mouse)
    }

    pub fn keyboard_by_count(&self, count: usize) -> Option<Keyboard<'_>> {
        self.devices.by_count(DeviceKind::Keyboard, count).and_then(Device::as_keyboard)
    }

    pub fn joystick_by_count(&self, count: usize) -> Option<Joystick<'_>> {
        self.devices.by_count(DeviceKind::Joystick, count).and_then(Device::as_joystick)
    }

    // ── Modes, focus and grab ─────────────────────────────────────────────────

    pub fn is_in_multi_device_mode(&self) -> bool {
        self.focus.multi_device_mode()
    }

    /// Switches between merged (single-device) and per-device reporting.
    pub fn set_multi_device_mode(&mut self, enabled: bool) {
        if !self.focus.set_multi_device_mode(enabled) {
            return;
        }
        info!(enabled, "multi-device mode changed");
        self.apply_grab();
    }

    pub fn has_focus(&self) -> bool {
        self.focus.has_focus()
    }

    /// Tells the system whether the application window has focus.
    ///
    /// On focus loss every held button is released and every deflected
    /// joystick axis and mouse wheel returns to zero, each through the normal
    /// event pipeline, so no channel stays on while the window is inactive.
    pub fn set_focus(&mut self, has_focus: bool) {
        if !self.focus.set_focus(has_focus) {
            return;
        }
        info!(has_focus, "focus changed");
        if !has_focus {
            self.release_all();
        }
        self.apply_grab();
    }

    pub fn is_mouse_grab_enabled(&self) -> bool {
        self.focus.grab_enabled()
    }

    /// Whether the OS pointer is currently grabbed.
    pub fn is_mouse_grabbed(&self) -> bool {
        self.focus.grabbed()
    }

    /// Requests or cancels the pointer grab.  The grab is only engaged while
    /// the window has focus and the system is in single-device mode.
    pub fn set_mouse_grab(&mut self, enabled: bool) {
        if self.focus.set_grab_enabled(enabled) {
            self.apply_grab();
        }
    }

    // ── Key repeat ────────────────────────────────────────────────────────────

    pub fn key_repeat_config(&self) -> KeyRepeatConfig {
        self.key_repeat.config()
    }

    pub fn set_key_repeat_config(&mut self, config: KeyRepeatConfig) {
        self.key_repeat.set_config(config);
    }

    /// `true` while a held key is waiting for its next repeat.
    pub fn is_in_key_repeat(&self) -> bool {
        self.key_repeat.is_active()
    }

    // ── Channels ──────────────────────────────────────────────────────────────

    pub fn channels(&self) -> &ChannelStore {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut ChannelStore {
        &mut self.channels
    }

    pub fn get_digital(&mut self, id: ChannelId) -> &mut DigitalChannel {
        self.channels.get_digital(id)
    }

    pub fn get_analog(&mut self, id: ChannelId) -> &mut AnalogChannel {
        self.channels.get_analog(id)
    }

    pub fn digital_ids(&self) -> Vec<ChannelId> {
        self.channels.digital_ids()
    }

    pub fn analog_ids(&self) -> Vec<ChannelId> {
        self.channels.analog_ids()
    }

    /// Unbinds every source from every channel.
    ///
    /// Channels that were on or non-zero are forced to neutral first and
    /// reported through the handler.
    pub fn clear_channel_assignments(&mut self) {
        let changes = self.channels.clear_assignments();
        debug!(reported = changes.len(), "cleared channel assignments");
        self.dispatcher().notify(changes);
    }

    // ── Primary-device queries ────────────────────────────────────────────────

    fn primary(&self, kind: DeviceKind) -> Option<&Device> {
        self.devices.primary(kind).and_then(|id| self.devices.device(id))
    }

    fn primary_mouse(&self) -> Option<Mouse<'_>> {
        self.primary(DeviceKind::Mouse).and_then(Device::as_mouse)
    }

    fn primary_keyboard(&self) -> Option<Keyboard<'_>> {
        self.primary(DeviceKind::Keyboard).and_then(Device::as_keyboard)
    }

    pub fn mouse_x(&self) -> f32 {
        self.primary_mouse().map_or(0.0, |m| m.x())
    }

    pub fn mouse_y(&self) -> f32 {
        self.primary_mouse().map_or(0.0, |m| m.y())
    }

    pub fn rel_mouse_x(&self) -> f32 {
        self.primary_mouse().map_or(0.0, |m| m.rel_x())
    }

    pub fn rel_mouse_y(&self) -> f32 {
        self.primary_mouse().map_or(0.0, |m| m.rel_y())
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.primary_mouse().is_some_and(|m| m.is_down(button))
    }

    pub fn was_mouse_pressed(&self, button: MouseButton) -> bool {
        self.primary_mouse().is_some_and(|m| m.was_pressed(button))
    }

    pub fn was_mouse_released(&self, button: MouseButton) -> bool {
        self.primary_mouse().is_some_and(|m| m.was_released(button))
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.primary_keyboard().is_some_and(|k| k.is_key_down(key))
    }

    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.primary_keyboard().is_some_and(|k| k.was_key_pressed(key))
    }

    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.primary_keyboard().is_some_and(|k| k.was_key_released(key))
    }

    pub fn is_joy_down(&self, button: usize) -> bool {
        self.primary(DeviceKind::Joystick).is_some_and(|j| j.is_button_down(button))
    }

    pub fn was_joy_pressed(&self, button: usize) -> bool {
        self.primary(DeviceKind::Joystick).is_some_and(|j| j.was_button_pressed(button))
    }

    pub fn was_joy_released(&self, button: usize) -> bool {
        self.primary(DeviceKind::Joystick).is_some_and(|j| j.was_button_released(button))
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn dispatcher(&mut self) -> Dispatcher<'_> {
        Dispatcher {
            devices: &self.devices,
            channels: &mut self.channels,
            handler: &mut self.handler,
        }
    }

    fn apply_grab(&mut self) {
        if let Some(grabbed) = self.focus.rederive() {
            info!(grabbed, "mouse grab changed");
            self.backend.set_mouse_grab(grabbed);
        }
    }

    /// `true` if events of `id` are reported under its own identity.
    fn is_reported(&self, id: DeviceId) -> bool {
        self.devices.routing_target(id, self.focus.multi_device_mode()) == id
    }

    /// Resolves a backend handle, promotes if appropriate, and picks the
    /// reporting device.  Returns `(own id, reporting id)`.
    fn route(&mut self, handle: DeviceHandle, kind: DeviceKind, promote: bool) -> Option<(DeviceId, DeviceId)> {
        let Some(mut id) = self.devices.index_of(handle) else {
            warn!(%handle, "input for unknown device ignored");
            return None;
        };
        let actual = self.devices.device(id).map(Device::kind);
        if actual != Some(kind) {
            warn!(%handle, expected = %kind, "input for device of another kind ignored");
            return None;
        }
        if promote && self.config.promotes(kind) {
            id = self.devices.promote(id);
        }
        Some((id, self.devices.routing_target(id, self.focus.multi_device_mode())))
    }

    /// Applies `update` to the device's own state and, when rerouted, to the
    /// reporting device.  Returns whether the reporting device changed.
    fn apply(&mut self, own: DeviceId, target: DeviceId, mut update: impl FnMut(&mut Device) -> bool) -> bool {
        let mut changed = self.devices.device_mut(own).map_or(false, &mut update);
        if target != own {
            changed = self.devices.device_mut(target).map_or(false, &mut update);
        }
        changed
    }

    fn handle_of(&self, id: DeviceId) -> Option<DeviceHandle> {
        self.devices.device(id).map(Device::handle)
    }

    fn is_first_update(&self, handle: DeviceHandle) -> bool {
        self.devices
            .index_of(handle)
            .and_then(|id| self.devices.device(id))
            .is_some_and(Device::is_first_update)
    }

    /// Re-issues the armed key as a release/press pair.
    fn repeat_key(&mut self, armed: ArmedKey) {
        let Some(id) = self.devices.index_of(armed.keyboard) else {
            self.key_repeat.disarm();
            return;
        };
        debug!(key = ?armed.key, "key repeat");
        let mut dispatcher = self.dispatcher();
        dispatcher.key(id, armed.key, armed.text, false);
        dispatcher.key(id, armed.key, armed.text, true);
    }

    /// Returns every device to neutral, reporting through the pipeline.
    fn release_all(&mut self) {
        self.key_repeat.disarm();

        for id in 0..self.devices.len() {
            let visible = self.is_reported(id);
            let Some(device) = self.devices.device(id) else {
                continue;
            };
            let kind = device.kind();
            let held: Vec<ControlId> = (0..device.num_buttons()).filter(|&b| device.is_button_down(b)).collect();
            let deflected: Vec<(ControlId, f32)> = match kind {
                DeviceKind::Joystick => (0..device.num_axes())
                    .map(|a| (a, device.axis_absolute(a)))
                    .filter(|&(_, v)| v != 0.0)
                    .collect(),
                DeviceKind::Mouse => Some(device.axis_absolute(MOUSE_AXIS_WHEEL))
                    .filter(|&v| v != 0.0)
                    .map(|v| vec![(MOUSE_AXIS_WHEEL, v)])
                    .unwrap_or_default(),
                DeviceKind::Keyboard => Vec::new(),
            };

            for button in held {
                if let Some(device) = self.devices.device_mut(id) {
                    device.set_button(button, false);
                    device.mark_previously_down(button);
                }
                if visible {
                    self.report_release(id, kind, button);
                }
            }

            for (axis, value) in deflected {
                if let Some(device) = self.devices.device_mut(id) {
                    device.set_axis(axis, 0.0);
                }
                if !visible {
                    continue;
                }
                match kind {
                    DeviceKind::Mouse => self.dispatcher().mouse_wheel(id, -value),
                    _ => self.dispatcher().joystick_axis(id, axis, 0.0),
                }
            }
        }
    }

    fn report_release(&mut self, id: DeviceId, kind: DeviceKind, button: ControlId) {
        let mut dispatcher = self.dispatcher();
        match kind {
            DeviceKind::Mouse => match MouseButton::from_index(button) {
                Some(b) => dispatcher.mouse_button(id, b, false),
                None => dispatcher.digital_event(id, button, false),
            },
            DeviceKind::Keyboard => match KeyCode::from_index(button) {
                Some(key) => dispatcher.key(id, key, None, false),
                None => dispatcher.digital_event(id, button, false),
            },
            DeviceKind::Joystick => dispatcher.joystick_button(id, button, false),
        }
    }
}

impl RawInputSink for InputSystem {
    fn mouse_button(&mut self, mouse: DeviceHandle, button: MouseButton, pressed: bool) {
        let Some((own, target)) = self.route(mouse, DeviceKind::Mouse, true) else {
            return;
        };
        if self.apply(own, target, |d| d.set_button(button.index(), pressed)) {
            self.dispatcher().mouse_button(target, button, pressed);
        }
    }

    fn mouse_moved(&mut self, mouse: DeviceHandle, motion: MouseMotion) {
        // The first absolute position only establishes where the cursor is.
        let initial_sync = matches!(motion, MouseMotion::Absolute { .. }) && self.is_first_update(mouse);
        let Some((own, target)) = self.route(mouse, DeviceKind::Mouse, !initial_sync) else {
            return;
        };
        let (moved_x, moved_y) = match motion {
            MouseMotion::Relative { dx, dy } => (
                self.apply(own, target, |d| d.add_axis(MOUSE_AXIS_X, dx)),
                self.apply(own, target, |d| d.add_axis(MOUSE_AXIS_Y, dy)),
            ),
            MouseMotion::Absolute { x, y } => (
                self.apply(own, target, |d| d.set_axis(MOUSE_AXIS_X, x)),
                self.apply(own, target, |d| d.set_axis(MOUSE_AXIS_Y, y)),
            ),
        };
        if initial_sync {
            return;
        }
        if moved_x || moved_y {
            self.dispatcher().mouse_moved(target, moved_x, moved_y);
        }
    }

    fn mouse_wheel(&mut self, mouse: DeviceHandle, delta: f32) {
        let Some((own, target)) = self.route(mouse, DeviceKind::Mouse, true) else {
            return;
        };
        if self.apply(own, target, |d| d.add_axis(MOUSE_AXIS_WHEEL, delta)) {
            self.dispatcher().mouse_wheel(target, delta);
        }
    }

    fn key(&mut self, keyboard: DeviceHandle, key: KeyCode, text: Option<char>, pressed: bool) {
        let Some((own, target)) = self.route(keyboard, DeviceKind::Keyboard, true) else {
            return;
        };
        if !self.apply(own, target, |d| d.set_button(key.index(), pressed)) {
            return;
        }
        if let Some(handle) = self.handle_of(target) {
            self.key_repeat.on_key(handle, key, text, pressed);
        }
        self.dispatcher().key(target, key, text, pressed);
    }

    fn joystick_button(&mut self, joystick: DeviceHandle, button: usize, pressed: bool) {
        let Some((own, target)) = self.route(joystick, DeviceKind::Joystick, true) else {
            return;
        };
        if self.apply(own, target, |d| d.set_button(button, pressed)) {
            self.dispatcher().joystick_button(target, button, pressed);
        }
    }

    fn joystick_axis(&mut self, joystick: DeviceHandle, axis: usize, value: f32) {
        let Some((own, target)) = self.route(joystick, DeviceKind::Joystick, true) else {
            return;
        };
        if self.apply(own, target, |d| d.set_axis(axis, value)) {
            self.dispatcher().joystick_axis(target, axis, value);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
