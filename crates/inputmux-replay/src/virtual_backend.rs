//! In-memory platform backend.
//!
//! `VirtualBackend` satisfies the backend contract without any OS: it reports
//! a fixed device list and records every grab/ungrab request.  Raw events are
//! injected directly through `RawInputSink` on the `InputSystem`, which is what
//! a real backend's event pump does too.

use std::cell::RefCell;
use std::rc::Rc;

use inputmux_core::{DeviceDescriptor, InitError, PlatformBackend};
use tracing::debug;

/// Shared record of the grab requests a [`VirtualBackend`] received.
#[derive(Debug, Clone, Default)]
pub struct GrabLog(Rc<RefCell<Vec<bool>>>);

impl GrabLog {
    /// Every grab request so far, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.0.borrow().clone()
    }

    /// The most recent grab state, `false` before any request.
    pub fn is_grabbed(&self) -> bool {
        self.0.borrow().last().copied().unwrap_or(false)
    }

    fn push(&self, grabbed: bool) {
        self.0.borrow_mut().push(grabbed);
    }
}

/// Backend reporting a fixed set of virtual devices.
#[derive(Debug, Default)]
pub struct VirtualBackend {
    devices: Vec<DeviceDescriptor>,
    failure: Option<String>,
    grabs: GrabLog,
}

impl VirtualBackend {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            devices,
            failure: None,
            grabs: GrabLog::default(),
        }
    }

    /// A backend whose enumeration fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Handle to the grab history, usable after the backend moved into the system.
    pub fn grab_log(&self) -> GrabLog {
        self.grabs.clone()
    }
}

impl PlatformBackend for VirtualBackend {
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceDescriptor>, InitError> {
        if let Some(message) = self.failure.take() {
            return Err(InitError::Backend(message));
        }
        debug!(count = self.devices.len(), "enumerating virtual devices");
        Ok(self.devices.clone())
    }

    fn set_mouse_grab(&mut self, grabbed: bool) {
        debug!(grabbed, "virtual pointer grab");
        self.grabs.push(grabbed);
    }
}
