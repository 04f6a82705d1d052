//! Handler that records channel notifications.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use inputmux_core::{AnalogChannel, ChannelId, ChannelStore, DigitalChannel, InputHandler, Keyboard, Propagation};
use serde::Serialize;
use tracing::debug;

/// One channel notification, tagged with the frame it happened in.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelEvent {
    Digital {
        frame: usize,
        channel: ChannelId,
        on: bool,
    },
    Analog {
        frame: usize,
        channel: ChannelId,
        value: f32,
        delta: f32,
    },
    /// Text typed on a keyboard, including key-repeat text.
    Text {
        frame: usize,
        device: usize,
        text: char,
    },
}

impl ChannelEvent {
    pub fn frame(&self) -> usize {
        match *self {
            ChannelEvent::Digital { frame, .. }
            | ChannelEvent::Analog { frame, .. }
            | ChannelEvent::Text { frame, .. } => frame,
        }
    }
}

impl fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChannelEvent::Digital { frame, channel, on } => {
                write!(f, "[{frame:>4}] digital {channel:<3} {}", if on { "on" } else { "off" })
            }
            ChannelEvent::Analog {
                frame,
                channel,
                value,
                delta,
            } => write!(f, "[{frame:>4}] analog  {channel:<3} {value:+.3} ({delta:+.3})"),
            ChannelEvent::Text { frame, device, text } => {
                write!(f, "[{frame:>4}] text    {device:<3} {text:?}")
            }
        }
    }
}

#[derive(Debug, Default)]
struct Log {
    frame: usize,
    events: Vec<ChannelEvent>,
}

/// Shared handle to what a [`ChannelRecorder`] saw.
///
/// The recorder itself is boxed into the input system; the log stays
/// reachable through this handle.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Log>>);

impl EventLog {
    /// Sets the frame number stamped on subsequent events.
    pub fn set_frame(&self, frame: usize) {
        self.0.borrow_mut().frame = frame;
    }

    pub fn len(&self) -> usize {
        self.0.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().events.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<ChannelEvent> {
        std::mem::take(&mut self.0.borrow_mut().events)
    }

    fn push(&self, make: impl FnOnce(usize) -> ChannelEvent) {
        let mut log = self.0.borrow_mut();
        let event = make(log.frame);
        debug!(%event, "recorded");
        log.events.push(event);
    }
}

/// Records channel flips, value changes and typed text.  Never stops propagation.
#[derive(Debug, Default)]
pub struct ChannelRecorder {
    log: EventLog,
}

impl ChannelRecorder {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl InputHandler for ChannelRecorder {
    fn on_unicode(&mut self, keyboard: Keyboard<'_>, text: char, _channels: &mut ChannelStore) -> Propagation {
        let device = keyboard.id();
        self.log.push(|frame| ChannelEvent::Text { frame, device, text });
        Propagation::Continue
    }

    fn on_digital_channel(&mut self, channel: &DigitalChannel, _channels: &mut ChannelStore) {
        let (id, on) = (channel.id(), channel.is_on());
        self.log.push(|frame| ChannelEvent::Digital { frame, channel: id, on });
    }

    fn on_analog_channel(&mut self, channel: &AnalogChannel, _channels: &mut ChannelStore) {
        let (id, value, delta) = (channel.id(), channel.absolute(), channel.relative());
        self.log.push(|frame| ChannelEvent::Analog {
            frame,
            channel: id,
            value,
            delta,
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
