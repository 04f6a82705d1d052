//! The event pipeline shared by real and synthesized transitions.
//!
//! A [`Dispatcher`] borrows the pieces of the input system one pipeline run
//! needs.  By the time it is called the device state has already been
//! updated; the dispatcher only reads devices, calls the handler stages in
//! order, and finally re-evaluates channels.
//!
//! Routing and promotion happen before this point, so every method takes the
//! id of the device the event is reported under.

use tracing::trace;

use crate::channel::{ChannelChange, ChannelStore};
use crate::device::{ControlId, Device, DeviceId, MOUSE_AXIS_WHEEL, MOUSE_AXIS_X, MOUSE_AXIS_Y};
use crate::handler::{EventSource, InputHandler};
use crate::keycode::{KeyCode, MouseButton};
use crate::registry::DeviceRegistry;

pub(crate) struct Dispatcher<'a> {
    pub devices: &'a DeviceRegistry,
    pub channels: &'a mut ChannelStore,
    pub handler: &'a mut Option<Box<dyn InputHandler>>,
}

impl<'a> Dispatcher<'a> {
    pub fn mouse_button(&mut self, id: DeviceId, button: MouseButton, pressed: bool) {
        let Some(mouse) = self.devices.device(id).and_then(Device::as_mouse) else {
            return;
        };
        trace!(device = id, ?button, pressed, "mouse button");
        if let Some(handler) = self.handler.as_deref_mut() {
            if handler.on_mouse_button(mouse, button, pressed, self.channels).is_stop() {
                return;
            }
        }
        self.digital_event(id, button.index(), pressed);
    }

    /// Runs a pointer move; only axes that actually moved reach the analog stage.
    pub fn mouse_moved(&mut self, id: DeviceId, moved_x: bool, moved_y: bool) {
        let Some(mouse) = self.devices.device(id).and_then(Device::as_mouse) else {
            return;
        };
        let (x, y) = (mouse.x(), mouse.y());
        trace!(device = id, x, y, "mouse moved");
        if let Some(handler) = self.handler.as_deref_mut() {
            if handler.on_mouse_moved(mouse, x, y, self.channels).is_stop() {
                return;
            }
        }
        if moved_x {
            self.analog_event(id, MOUSE_AXIS_X, x);
        }
        if moved_y {
            self.analog_event(id, MOUSE_AXIS_Y, y);
        }
    }

    pub fn mouse_wheel(&mut self, id: DeviceId, delta: f32) {
        let Some(mouse) = self.devices.device(id).and_then(Device::as_mouse) else {
            return;
        };
        trace!(device = id, delta, "mouse wheel");
        if let Some(handler) = self.handler.as_deref_mut() {
            if handler.on_mouse_wheel(mouse, delta, self.channels).is_stop() {
                return;
            }
        }
        self.analog_event(id, MOUSE_AXIS_WHEEL, delta);
    }

    pub fn key(&mut self, id: DeviceId, key: KeyCode, text: Option<char>, pressed: bool) {
        let Some(keyboard) = self.devices.device(id).and_then(Device::as_keyboard) else {
            return;
        };
        trace!(device = id, ?key, pressed, "key");
        if let Some(handler) = self.handler.as_deref_mut() {
            if handler.on_key(keyboard, key, pressed, self.channels).is_stop() {
                return;
            }
            if let Some(text) = text.filter(|_| pressed) {
                if handler.on_unicode(keyboard, text, self.channels).is_stop() {
                    return;
                }
            }
        }
        self.digital_event(id, key.index(), pressed);
    }

    pub fn joystick_button(&mut self, id: DeviceId, button: usize, pressed: bool) {
        let Some(joystick) = self.devices.device(id).and_then(Device::as_joystick) else {
            return;
        };
        trace!(device = id, button, pressed, "joystick button");
        if let Some(handler) = self.handler.as_deref_mut() {
            if handler.on_joystick_button(joystick, button, pressed, self.channels).is_stop() {
                return;
            }
        }
        self.digital_event(id, button, pressed);
    }

    pub fn joystick_axis(&mut self, id: DeviceId, axis: usize, value: f32) {
        let Some(joystick) = self.devices.device(id).and_then(Device::as_joystick) else {
            return;
        };
        trace!(device = id, axis, value, "joystick axis");
        if let Some(handler) = self.handler.as_deref_mut() {
            if handler.on_joystick_axis(joystick, axis, value, self.channels).is_stop() {
                return;
            }
        }
        self.analog_event(id, axis, value);
    }

    pub fn digital_event(&mut self, device: DeviceId, control: ControlId, pressed: bool) {
        if let Some(handler) = self.handler.as_deref_mut() {
            let source = EventSource { device, control };
            if handler.on_digital_event(source, pressed, self.channels).is_stop() {
                return;
            }
        }
        self.update_channels(device, control, false);
    }

    pub fn analog_event(&mut self, device: DeviceId, control: ControlId, value: f32) {
        if let Some(handler) = self.handler.as_deref_mut() {
            let source = EventSource { device, control };
            if handler.on_analog_event(source, value, self.channels).is_stop() {
                return;
            }
        }
        self.update_channels(device, control, true);
    }

    fn update_channels(&mut self, device: DeviceId, control: ControlId, is_analog: bool) {
        let changes = self.channels.update(self.devices, device, control, is_analog);
        self.notify(changes);
    }

    /// Delivers channel-change notifications to the handler.
    pub fn notify(&mut self, changes: Vec<ChannelChange>) {
        let Some(handler) = self.handler.as_deref_mut() else {
            return;
        };
        for change in changes {
            match change {
                ChannelChange::Digital(channel) => {
                    trace!(channel = channel.id(), on = channel.is_on(), "digital channel changed");
                    handler.on_digital_channel(&channel, self.channels);
                }
                ChannelChange::Analog(channel) => {
                    trace!(channel = channel.id(), value = channel.absolute(), "analog channel changed");
                    handler.on_analog_channel(&channel, self.channels);
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
