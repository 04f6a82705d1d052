//! # inputmux-replay
//!
//! A virtual platform backend plus TOML tooling for exercising
//! `inputmux-core` without real hardware.
//!
//! - [`virtual_backend`] – [`VirtualBackend`], a fixed device list with a grab log
//! - [`profile`]         – devices, input settings and channel bindings
//! - [`script`]          – frames of raw input events
//! - [`recorder`]        – an [`InputHandler`](inputmux_core::InputHandler) that records channel events
//! - [`replay`]          – runs a script against a profile on a virtual clock
//!
//! # Example
//!
//! ```
//! use inputmux_replay::{replay, ChannelEvent, Profile, Script};
//!
//! let profile = Profile::from_toml_str(r#"
//!     [[devices]]
//!     kind = "keyboard"
//!
//!     [[digital]]
//!     channel = 7
//!     device = 0
//!     key = "Space"
//! "#)?;
//! let script = Script::from_toml_str(r#"
//!     [[frames]]
//!     events = [{ type = "key", device = 0, key = "Space", pressed = true }]
//! "#)?;
//!
//! let outcome = replay(&profile, &script)?;
//! assert_eq!(outcome.events, vec![ChannelEvent::Digital { frame: 0, channel: 7, on: true }]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod profile;
pub mod recorder;
pub mod replay;
pub mod script;
pub mod virtual_backend;

pub use profile::{load_profile, AnalogBinding, ConfigError, ControlRef, DeviceEntry, DigitalBinding, Profile};
pub use recorder::{ChannelEvent, ChannelRecorder, EventLog};
pub use replay::{replay, ReplayError, ReplayOutcome};
pub use script::{load_script, Frame, Script, ScriptError, ScriptEvent};
pub use virtual_backend::{GrabLog, VirtualBackend};
