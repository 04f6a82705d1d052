//! Key-repeat timer.
//!
//! While a key is held the timer re-issues it as a release/press pair, first
//! after `delay` seconds and then every `interval` seconds.  Only the most
//! recently pressed key repeats; pressing another key re-arms the timer for
//! that key, releasing the armed key stops it.
//!
//! # State machine
//!
//! ```text
//!            press (repeat enabled)
//!   Idle ───────────────────────────► Armed { ttr = delay }
//!    ▲                                  │  tick: ttr -= dt
//!    │ release of the armed key         │  ttr <= 0: fire, ttr = max(MIN_REARM, ttr + interval)
//!    └──────────────────────────────────┘
//! ```
//!
//! Elapsed time per tick is clamped to [`MAX_TICK_SECS`] so a debugger pause or
//! a stalled frame cannot produce a burst of repeats.  The interval is added to
//! the (negative) remainder rather than replacing it, which keeps the repeat
//! phase stable under uneven frame times.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::device::DeviceHandle;
use crate::keycode::KeyCode;

/// Upper bound for the elapsed time consumed by one tick.
pub const MAX_TICK_SECS: f32 = 0.1;

/// Floor for the time until the next repeat after one has fired.
const MIN_REARM: f32 = 0.000_01;

/// Key-repeat settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyRepeatConfig {
    /// Master switch; when `false` no key is ever armed.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds from the initial press to the first repeat.
    #[serde(default = "default_delay")]
    pub delay: f32,
    /// Seconds between subsequent repeats.
    #[serde(default = "default_interval")]
    pub interval: f32,
}

fn default_delay() -> f32 {
    0.7
}
fn default_interval() -> f32 {
    0.1
}

impl Default for KeyRepeatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay: default_delay(),
            interval: default_interval(),
        }
    }
}

/// The key that will be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedKey {
    /// Keyboard the press was reported under.
    pub keyboard: DeviceHandle,
    pub key: KeyCode,
    pub text: Option<char>,
}

/// Single-slot repeat timer.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    config: KeyRepeatConfig,
    armed: Option<ArmedKey>,
    time_till_repeat: f32,
    last_tick: Option<Instant>,
}

impl KeyRepeat {
    pub fn new(config: KeyRepeatConfig) -> Self {
        Self {
            config,
            armed: None,
            time_till_repeat: 0.0,
            last_tick: None,
        }
    }

    pub fn config(&self) -> KeyRepeatConfig {
        self.config
    }

    /// Replaces the settings; disabling repeat also disarms.
    pub fn set_config(&mut self, config: KeyRepeatConfig) {
        self.config = config;
        if !config.enabled {
            self.disarm();
        }
    }

    /// `true` while a key is armed.
    pub fn is_active(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed(&self) -> Option<&ArmedKey> {
        self.armed.as_ref()
    }

    /// Feeds a real key transition into the timer.
    pub fn on_key(&mut self, keyboard: DeviceHandle, key: KeyCode, text: Option<char>, pressed: bool) {
        if pressed {
            if self.config.enabled {
                self.armed = Some(ArmedKey { keyboard, key, text });
                self.time_till_repeat = self.config.delay;
            }
        } else if self.armed.is_some_and(|armed| armed.key == key) {
            self.disarm();
        }
    }

    pub fn disarm(&mut self) {
        self.armed = None;
        self.time_till_repeat = 0.0;
    }

    /// Advances by the wall time since the previous tick.
    ///
    /// The first tick only records the timestamp.  Returns the key to repeat
    /// if the timer fired.
    pub fn tick(&mut self, now: Instant) -> Option<ArmedKey> {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.advance(elapsed)
    }

    /// Advances by `elapsed` seconds (clamped to `[0, MAX_TICK_SECS]`).
    pub fn advance(&mut self, elapsed: f32) -> Option<ArmedKey> {
        let dt = elapsed.clamp(0.0, MAX_TICK_SECS);
        if self.time_till_repeat <= 0.0 {
            return None;
        }
        self.time_till_repeat -= dt;
        if self.time_till_repeat > 0.0 {
            return None;
        }
        self.time_till_repeat = (self.time_till_repeat + self.config.interval).max(MIN_REARM);
        self.armed
    }
}

impl Default for KeyRepeat {
    fn default() -> Self {
        Self::new(KeyRepeatConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
