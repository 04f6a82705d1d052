//! The application-facing event handler.
//!
//! Every raw transition runs through a fixed pipeline of handler callbacks.
//! Each stage may return [`Propagation::Stop`] to swallow the event; later
//! stages, including channel re-evaluation, then never see it.
//!
//! ```text
//! keyboard key   : on_key -> on_unicode (press with text only) -> on_digital_event -> channels
//! mouse button   : on_mouse_button  -> on_digital_event -> channels
//! mouse move     : on_mouse_moved   -> on_analog_event (axis 0 / 1) -> channels
//! mouse wheel    : on_mouse_wheel   -> on_analog_event (axis 2)     -> channels
//! joystick button: on_joystick_button -> on_digital_event -> channels
//! joystick axis  : on_joystick_axis   -> on_analog_event  -> channels
//! ```
//!
//! Channel callbacks (`on_digital_channel`, `on_analog_channel`) are pure
//! notifications.  Every callback receives the [`ChannelStore`] so handlers can
//! rebind channels while an event is being processed.
//!
//! All methods default to "not handled", so a handler implements only the
//! stages it cares about.

use crate::channel::{AnalogChannel, ChannelStore, DigitalChannel};
use crate::device::{ControlId, DeviceId, Joystick, Keyboard, Mouse};
use crate::keycode::{KeyCode, MouseButton};

/// Result of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Not handled; pass the event on to the next stage.
    #[default]
    Continue,
    /// Handled; suppress every later stage.
    Stop,
}

impl Propagation {
    pub fn is_stop(self) -> bool {
        self == Propagation::Stop
    }
}

/// The `{device, control}` pair identifying a control in the generic
/// digital/analog event stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventSource {
    pub device: DeviceId,
    pub control: ControlId,
}

/// Callbacks for every stage of the event pipeline.
#[allow(unused_variables)]
pub trait InputHandler {
    fn on_key(&mut self, keyboard: Keyboard<'_>, key: KeyCode, pressed: bool, channels: &mut ChannelStore) -> Propagation {
        Propagation::Continue
    }

    /// Text produced by a key press under the active keyboard layout.
    fn on_unicode(&mut self, keyboard: Keyboard<'_>, text: char, channels: &mut ChannelStore) -> Propagation {
        Propagation::Continue
    }

    /// `x` and `y` are the new absolute position.
    fn on_mouse_moved(&mut self, mouse: Mouse<'_>, x: f32, y: f32, channels: &mut ChannelStore) -> Propagation {
        Propagation::Continue
    }

    fn on_mouse_button(
        &mut self,
        mouse: Mouse<'_>,
        button: MouseButton,
        pressed: bool,
        channels: &mut ChannelStore,
    ) -> Propagation {
        Propagation::Continue
    }

    /// `delta` is the wheel movement of this single event.
    fn on_mouse_wheel(&mut self, mouse: Mouse<'_>, delta: f32, channels: &mut ChannelStore) -> Propagation {
        Propagation::Continue
    }

    fn on_joystick_button(
        &mut self,
        joystick: Joystick<'_>,
        button: usize,
        pressed: bool,
        channels: &mut ChannelStore,
    ) -> Propagation {
        Propagation::Continue
    }

    fn on_joystick_axis(
        &mut self,
        joystick: Joystick<'_>,
        axis: usize,
        value: f32,
        channels: &mut ChannelStore,
    ) -> Propagation {
        Propagation::Continue
    }

    /// Generic button stage shared by every device kind.
    fn on_digital_event(&mut self, source: EventSource, pressed: bool, channels: &mut ChannelStore) -> Propagation {
        Propagation::Continue
    }

    /// Generic axis stage shared by every device kind.  `value` is the new axis
    /// value, except for the mouse wheel where it is the delta of this event.
    fn on_analog_event(&mut self, source: EventSource, value: f32, channels: &mut ChannelStore) -> Propagation {
        Propagation::Continue
    }

    /// A digital channel flipped.  `channel` is its state at the moment of the change.
    fn on_digital_channel(&mut self, channel: &DigitalChannel, channels: &mut ChannelStore) {}

    /// An analog channel's value changed.  `channel` is its state at the moment of the change.
    fn on_analog_channel(&mut self, channel: &AnalogChannel, channels: &mut ChannelStore) {}
}
