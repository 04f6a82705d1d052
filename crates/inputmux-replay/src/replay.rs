//! Drives a script through an input system on a virtual clock.

use std::time::{Duration, Instant};

use inputmux_core::{InitError, InputSystem};
use thiserror::Error;
use tracing::{debug, info};

use crate::profile::{ConfigError, Profile};
use crate::recorder::{ChannelEvent, ChannelRecorder, EventLog};
use crate::script::{Script, ScriptError};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("profile error: {0}")]
    Profile(#[from] ConfigError),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("input system failed to initialise: {0}")]
    Init(#[from] InitError),
}

/// What a replay produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    /// Number of frames run.
    pub frames: usize,
    /// Every recorded channel event, in order.
    pub events: Vec<ChannelEvent>,
    /// Every grab request the backend received, including the release on shutdown.
    pub grab_history: Vec<bool>,
}

/// Runs `script` against a system built from `profile`.
///
/// Frame `n` starts at `n`'s cumulative `advance_ms` after the first
/// `start_update`, so key repeat behaves the same on every run.
pub fn replay(profile: &Profile, script: &Script) -> Result<ReplayOutcome, ReplayError> {
    script.validate(profile.devices.len())?;

    let backend = profile.backend();
    let grabs = backend.grab_log();
    let mut system = InputSystem::initialize(backend, profile.input)?;
    profile.apply_bindings(&mut system)?;

    let log = EventLog::default();
    system.set_handler(Box::new(ChannelRecorder::new(log.clone())));

    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    for (index, frame) in script.frames.iter().enumerate() {
        elapsed += Duration::from_millis(frame.advance_ms);
        log.set_frame(index);
        system.start_update_at(start + elapsed);
        for event in &frame.events {
            event.apply(&mut system);
        }
        system.end_update();
        debug!(frame = index, events = frame.events.len(), "frame done");
    }

    system.shutdown();

    let events = log.take();
    info!(frames = script.frames.len(), events = events.len(), "replay finished");
    Ok(ReplayOutcome {
        frames: script.frames.len(),
        events,
        grab_history: grabs.history(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
