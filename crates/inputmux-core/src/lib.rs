//! # inputmux-core
//!
//! Platform-agnostic input core.  Platform backends enumerate keyboards, mice
//! and game controllers and feed raw transitions in; applications read
//! device state, bind physical controls to logical **channels**, and receive
//! events through an [`InputHandler`].
//!
//! This crate performs no OS calls and has no I/O.  Everything runs on the
//! caller's thread, inside the calls the application and backend make.
//!
//! # Module layout
//!
//! - [`device`]     – devices, typed mouse/keyboard/joystick views
//! - [`keycode`]    – keyboard scan codes and mouse button ids
//! - [`channel`]    – digital/analog channels and their sources
//! - [`handler`]    – the application callback trait
//! - [`key_repeat`] – the key-repeat timer
//! - [`registry`]   – device ordering, primaries and promotion
//! - [`focus`]      – focus and pointer-grab derivation
//! - [`backend`]    – what a platform backend provides and calls
//! - [`system`]     – [`InputSystem`], which ties the above together
//! - [`config`]     – [`InputConfig`]
//! - [`error`]      – [`InitError`]
//!
//! # Example
//!
//! ```
//! use inputmux_core::{
//!     DeviceDescriptor, InitError, InputConfig, InputSystem, KeyCode, PlatformBackend, RawInputSink,
//!     DeviceHandle,
//! };
//!
//! struct OneKeyboard;
//!
//! impl PlatformBackend for OneKeyboard {
//!     fn enumerate_devices(&mut self) -> Result<Vec<DeviceDescriptor>, InitError> {
//!         Ok(vec![DeviceDescriptor::keyboard("built-in")])
//!     }
//!     fn set_mouse_grab(&mut self, _grabbed: bool) {}
//! }
//!
//! let mut input = InputSystem::initialize(OneKeyboard, InputConfig::default())?;
//! input.get_digital(0).add_digital_source(0, KeyCode::Space.index());
//!
//! input.start_update();
//! input.key(DeviceHandle(0), KeyCode::Space, Some(' '), true);
//! input.end_update();
//!
//! assert!(input.channels().digital(0).map_or(false, |c| c.was_switched_on()));
//! # Ok::<(), InitError>(())
//! ```

pub mod backend;
pub mod channel;
pub mod config;
pub mod device;
mod dispatch;
pub mod error;
pub mod focus;
pub mod handler;
pub mod key_repeat;
pub mod keycode;
pub mod registry;
pub mod system;

pub use backend::{DeviceDescriptor, MouseMotion, PlatformBackend, RawInputSink};
pub use channel::{
    AnalogChannel, AnalogSource, AnalogSourceKind, ChannelChange, ChannelId, ChannelStore, DigitalChannel,
    DigitalSource,
};
pub use config::InputConfig;
pub use device::{
    ControlId, Device, DeviceHandle, DeviceId, DeviceKind, Joystick, Keyboard, Mouse, MOUSE_AXIS_COUNT,
    MOUSE_AXIS_WHEEL, MOUSE_AXIS_X, MOUSE_AXIS_Y,
};
pub use error::InitError;
pub use focus::FocusState;
pub use handler::{EventSource, InputHandler, Propagation};
pub use key_repeat::{ArmedKey, KeyRepeat, KeyRepeatConfig};
pub use keycode::{KeyCode, MouseButton, KEYBOARD_BUTTON_COUNT};
pub use registry::DeviceRegistry;
pub use system::InputSystem;
