//! Digital and analog channels: logical inputs bound to physical controls.
//!
//! A **channel** is an application-defined input ("Jump", "Steer", "Zoom")
//! identified by a numeric [`ChannelId`].  Each channel aggregates any number of
//! **sources**, each naming one control on one device plus a rule for how that
//! control contributes:
//!
//! | Channel | Source                          | Contribution                              |
//! |---------|---------------------------------|-------------------------------------------|
//! | digital | [`DigitalSource::Button`]       | on while the button is held               |
//! | digital | [`DigitalSource::Axis`]         | on while the axis is beyond the threshold |
//! | analog  | [`AnalogSource::Axis`]          | the raw axis value                        |
//! | analog  | [`AnalogSource::Button`]        | `magnitude` while the button is held      |
//! | analog  | [`AnalogSource::LimitedAxis`]   | `value * scale` while beyond the threshold |
//!
//! A digital channel is the logical OR of its sources; an analog channel is the
//! sum.  Both are recomputed **from scratch** over every source whenever one of
//! their sources reports a transition, so channel state is always a pure
//! function of current device state.
//!
//! # Threshold conventions
//!
//! A positive threshold means "beyond = greater than", a negative one means
//! "beyond = less than".  A zero threshold on a digital channel's axis source
//! means "any positive deflection"; a zero threshold on a limited analog source
//! means the gate is always open.
//!
//! Sources reference devices by id only.  A source whose device id does not
//! resolve contributes nothing.

use std::collections::BTreeMap;

use crate::device::{ControlId, DeviceId};
use crate::registry::DeviceRegistry;

/// Application-defined channel identifier.
pub type ChannelId = usize;

// ── Sources ───────────────────────────────────────────────────────────────────

/// One control feeding a [`DigitalChannel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DigitalSource {
    /// On while the button is held.
    Button { device: DeviceId, control: ControlId },
    /// On while the axis is beyond `threshold`.
    Axis {
        device: DeviceId,
        control: ControlId,
        threshold: f32,
    },
}

impl DigitalSource {
    pub fn device(&self) -> DeviceId {
        match *self {
            DigitalSource::Button { device, .. } | DigitalSource::Axis { device, .. } => device,
        }
    }

    pub fn control(&self) -> ControlId {
        match *self {
            DigitalSource::Button { control, .. } | DigitalSource::Axis { control, .. } => control,
        }
    }

    /// `true` if the source reads an axis rather than a button.
    pub fn is_analog(&self) -> bool {
        matches!(self, DigitalSource::Axis { .. })
    }

    fn key(&self) -> (DeviceId, ControlId, bool) {
        (self.device(), self.control(), self.is_analog())
    }

    fn is_on(&self, devices: &DeviceRegistry) -> bool {
        let Some(device) = devices.device(self.device()) else {
            return false;
        };
        match *self {
            DigitalSource::Button { control, .. } => device.is_button_down(control),
            DigitalSource::Axis { control, threshold, .. } => {
                let value = device.axis_absolute(control);
                if threshold < 0.0 {
                    value < threshold
                } else {
                    value > threshold
                }
            }
        }
    }
}

/// The contribution rule of an [`AnalogSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogSourceKind {
    Analog,
    Digital,
    LimitedAnalog,
}

/// One control feeding an [`AnalogChannel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalogSource {
    /// Contributes the raw axis value.
    Axis { device: DeviceId, control: ControlId },
    /// Contributes `magnitude` while the button is held.
    Button {
        device: DeviceId,
        control: ControlId,
        magnitude: f32,
    },
    /// Contributes `value * scale` while the axis is beyond `threshold`.
    LimitedAxis {
        device: DeviceId,
        control: ControlId,
        scale: f32,
        threshold: f32,
    },
}

impl AnalogSource {
    pub fn device(&self) -> DeviceId {
        match *self {
            AnalogSource::Axis { device, .. }
            | AnalogSource::Button { device, .. }
            | AnalogSource::LimitedAxis { device, .. } => device,
        }
    }

    pub fn control(&self) -> ControlId {
        match *self {
            AnalogSource::Axis { control, .. }
            | AnalogSource::Button { control, .. }
            | AnalogSource::LimitedAxis { control, .. } => control,
        }
    }

    pub fn kind(&self) -> AnalogSourceKind {
        match self {
            AnalogSource::Axis { .. } => AnalogSourceKind::Analog,
            AnalogSource::Button { .. } => AnalogSourceKind::Digital,
            AnalogSource::LimitedAxis { .. } => AnalogSourceKind::LimitedAnalog,
        }
    }

    /// `true` if the source reads an axis rather than a button.
    pub fn is_analog(&self) -> bool {
        self.kind() != AnalogSourceKind::Digital
    }

    fn key(&self) -> (DeviceId, ControlId, AnalogSourceKind) {
        (self.device(), self.control(), self.kind())
    }

    fn contribution(&self, devices: &DeviceRegistry) -> f32 {
        let Some(device) = devices.device(self.device()) else {
            return 0.0;
        };
        match *self {
            AnalogSource::Axis { control, .. } => device.axis_absolute(control),
            AnalogSource::Button { control, magnitude, .. } => {
                if device.is_button_down(control) {
                    magnitude
                } else {
                    0.0
                }
            }
            AnalogSource::LimitedAxis { control, scale, threshold, .. } => {
                let value = device.axis_absolute(control);
                let open = if threshold > 0.0 {
                    value > threshold
                } else if threshold < 0.0 {
                    value < threshold
                } else {
                    true
                };
                if open {
                    value * scale
                } else {
                    0.0
                }
            }
        }
    }
}

// ── Channels ──────────────────────────────────────────────────────────────────

/// A logical on/off input.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalChannel {
    id: ChannelId,
    sources: Vec<DigitalSource>,
    is_pressed: bool,
    is_modified: bool,
}

impl DigitalChannel {
    fn new(id: ChannelId) -> Self {
        Self {
            id,
            sources: Vec::new(),
            is_pressed: false,
            is_modified: false,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn sources(&self) -> &[DigitalSource] {
        &self.sources
    }

    /// `true` while any source is on.
    pub fn is_on(&self) -> bool {
        self.is_pressed
    }

    /// `true` if the state flipped during the current frame.
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn was_switched_on(&self) -> bool {
        self.is_pressed && self.is_modified
    }

    pub fn was_switched_off(&self) -> bool {
        !self.is_pressed && self.is_modified
    }

    /// Binds a button.  Ignored if this button is already bound.
    pub fn add_digital_source(&mut self, device: DeviceId, control: ControlId) {
        self.insert(DigitalSource::Button { device, control });
    }

    /// Binds an axis with an on-threshold.  Ignored if this axis is already
    /// bound, even with a different threshold.
    pub fn add_analog_source(&mut self, device: DeviceId, control: ControlId, threshold: f32) {
        self.insert(DigitalSource::Axis { device, control, threshold });
    }

    pub fn remove_digital_source(&mut self, device: DeviceId, control: ControlId) {
        self.sources.retain(|s| s.key() != (device, control, false));
    }

    pub fn remove_analog_source(&mut self, device: DeviceId, control: ControlId) {
        self.sources.retain(|s| s.key() != (device, control, true));
    }

    /// Drops every source without touching the current state.
    pub fn clear_all_assignments(&mut self) {
        self.sources.clear();
    }

    fn insert(&mut self, source: DigitalSource) {
        if !self.sources.iter().any(|s| s.key() == source.key()) {
            self.sources.push(source);
        }
    }

    fn listens_to(&self, device: DeviceId, control: ControlId, is_analog: bool) -> bool {
        self.sources.iter().any(|s| s.key() == (device, control, is_analog))
    }

    /// Recomputes the OR over all sources; returns `true` if the state flipped.
    fn reevaluate(&mut self, devices: &DeviceRegistry) -> bool {
        let pressed = self.sources.iter().any(|s| s.is_on(devices));
        let changed = pressed != self.is_pressed;
        self.is_pressed = pressed;
        self.is_modified = changed;
        changed
    }
}

/// A logical continuous input.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogChannel {
    id: ChannelId,
    sources: Vec<AnalogSource>,
    value: f32,
    diff: f32,
}

impl AnalogChannel {
    fn new(id: ChannelId) -> Self {
        Self {
            id,
            sources: Vec::new(),
            value: 0.0,
            diff: 0.0,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn sources(&self) -> &[AnalogSource] {
        &self.sources
    }

    /// Current sum over all sources.
    pub fn absolute(&self) -> f32 {
        self.value
    }

    /// Change of the value during the current frame.
    pub fn relative(&self) -> f32 {
        self.diff
    }

    /// Binds an axis as a raw passthrough.
    pub fn add_analog_source(&mut self, device: DeviceId, control: ControlId) {
        self.insert(AnalogSource::Axis { device, control });
    }

    /// Binds a button contributing `magnitude` while held.
    pub fn add_digital_source(&mut self, device: DeviceId, control: ControlId, magnitude: f32) {
        self.insert(AnalogSource::Button { device, control, magnitude });
    }

    /// Binds an axis contributing `value * scale`, gated by `threshold`.
    pub fn add_digitalized_analog_source(&mut self, device: DeviceId, control: ControlId, scale: f32, threshold: f32) {
        self.insert(AnalogSource::LimitedAxis {
            device,
            control,
            scale,
            threshold,
        });
    }

    pub fn remove_analog_source(&mut self, device: DeviceId, control: ControlId) {
        self.remove(device, control, AnalogSourceKind::Analog);
    }

    pub fn remove_digital_source(&mut self, device: DeviceId, control: ControlId) {
        self.remove(device, control, AnalogSourceKind::Digital);
    }

    pub fn remove_digitalized_analog_source(&mut self, device: DeviceId, control: ControlId) {
        self.remove(device, control, AnalogSourceKind::LimitedAnalog);
    }

    /// Drops every source without touching the current value.
    pub fn clear_all_assignments(&mut self) {
        self.sources.clear();
    }

    fn insert(&mut self, source: AnalogSource) {
        if !self.sources.iter().any(|s| s.key() == source.key()) {
            self.sources.push(source);
        }
    }

    fn remove(&mut self, device: DeviceId, control: ControlId, kind: AnalogSourceKind) {
        self.sources.retain(|s| s.key() != (device, control, kind));
    }

    fn listens_to(&self, device: DeviceId, control: ControlId, is_analog: bool) -> bool {
        self.sources
            .iter()
            .any(|s| s.device() == device && s.control() == control && s.is_analog() == is_analog)
    }

    /// Recomputes the sum over all sources; returns `true` if the value changed.
    fn reevaluate(&mut self, devices: &DeviceRegistry) -> bool {
        let value: f32 = self.sources.iter().map(|s| s.contribution(devices)).sum();
        let previous = self.value;
        self.diff += value - previous;
        self.value = value;
        value != previous
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// A channel whose state changed, captured at the moment of the change.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelChange {
    Digital(DigitalChannel),
    Analog(AnalogChannel),
}

/// Every channel the application has referenced, keyed by id.
#[derive(Debug, Default)]
pub struct ChannelStore {
    digital: BTreeMap<ChannelId, DigitalChannel>,
    analog: BTreeMap<ChannelId, AnalogChannel>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the digital channel `id`, creating an empty one on first use.
    pub fn get_digital(&mut self, id: ChannelId) -> &mut DigitalChannel {
        self.digital.entry(id).or_insert_with(|| DigitalChannel::new(id))
    }

    /// Returns the analog channel `id`, creating an empty one on first use.
    pub fn get_analog(&mut self, id: ChannelId) -> &mut AnalogChannel {
        self.analog.entry(id).or_insert_with(|| AnalogChannel::new(id))
    }

    /// Looks up a digital channel without creating it.
    pub fn digital(&self, id: ChannelId) -> Option<&DigitalChannel> {
        self.digital.get(&id)
    }

    /// Looks up an analog channel without creating it.
    pub fn analog(&self, id: ChannelId) -> Option<&AnalogChannel> {
        self.analog.get(&id)
    }

    /// Ids of every digital channel, ascending.
    pub fn digital_ids(&self) -> Vec<ChannelId> {
        self.digital.keys().copied().collect()
    }

    /// Ids of every analog channel, ascending.
    pub fn analog_ids(&self) -> Vec<ChannelId> {
        self.analog.keys().copied().collect()
    }

    pub fn digital_channels(&self) -> impl Iterator<Item = &DigitalChannel> {
        self.digital.values()
    }

    pub fn analog_channels(&self) -> impl Iterator<Item = &AnalogChannel> {
        self.analog.values()
    }

    /// Resets per-frame change tracking.
    pub(crate) fn begin_frame(&mut self) {
        for channel in self.digital.values_mut() {
            channel.is_modified = false;
        }
        for channel in self.analog.values_mut() {
            channel.diff = 0.0;
        }
    }

    /// Re-evaluates every channel bound to the control that just changed.
    ///
    /// Returns the channels whose state changed, in id order, digital first.
    pub(crate) fn update(
        &mut self,
        devices: &DeviceRegistry,
        device: DeviceId,
        control: ControlId,
        is_analog: bool,
    ) -> Vec<ChannelChange> {
        let mut changes = Vec::new();
        for channel in self.digital.values_mut() {
            if channel.listens_to(device, control, is_analog) && channel.reevaluate(devices) {
                changes.push(ChannelChange::Digital(channel.clone()));
            }
        }
        for channel in self.analog.values_mut() {
            if channel.listens_to(device, control, is_analog) && channel.reevaluate(devices) {
                changes.push(ChannelChange::Analog(channel.clone()));
            }
        }
        changes
    }

    /// Forces every channel to neutral and unbinds all sources.
    ///
    /// Channels that were on / non-zero are reported, captured before their
    /// sources were dropped.
    pub(crate) fn clear_assignments(&mut self) -> Vec<ChannelChange> {
        let mut changes = Vec::new();
        for channel in self.digital.values_mut() {
            if channel.is_pressed {
                channel.is_pressed = false;
                channel.is_modified = true;
                changes.push(ChannelChange::Digital(channel.clone()));
            }
            channel.clear_all_assignments();
        }
        for channel in self.analog.values_mut() {
            if channel.value != 0.0 {
                channel.diff = -channel.value;
                channel.value = 0.0;
                changes.push(ChannelChange::Analog(channel.clone()));
            }
            channel.clear_all_assignments();
        }
        changes
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DeviceDescriptor;

    /// Two mice (ids 0, 1) and a joystick with 4 buttons and 2 axes (id 2).
    fn registry() -> DeviceRegistry {
        let mut reg = DeviceRegistry::new();
        reg.register(&DeviceDescriptor::mouse("m0"));
        reg.register(&DeviceDescriptor::mouse("m1"));
        reg.register(&DeviceDescriptor::joystick("pad", 4, 2));
        reg
    }

    fn press(reg: &mut DeviceRegistry, device: DeviceId, button: ControlId, down: bool) {
        reg.device_mut(device).unwrap().set_button(button, down);
    }

    fn tilt(reg: &mut DeviceRegistry, device: DeviceId, axis: ControlId, value: f32) {
        reg.device_mut(device).unwrap().set_axis(axis, value);
    }

    #[test]
    fn test_get_digital_is_idempotent() {
        // Arrange
        let mut store = ChannelStore::new();

        // Act
        store.get_digital(7).add_digital_source(0, 1);
        let channel = store.get_digital(7);

        // Assert
        assert_eq!(channel.id(), 7);
        assert_eq!(channel.sources().len(), 1);
        assert_eq!(store.digital_ids(), vec![7]);
    }

    #[test]
    fn test_get_analog_creates_neutral_channel() {
        let mut store = ChannelStore::new();
        let channel = store.get_analog(3);
        assert_eq!(channel.id(), 3);
        assert_eq!(channel.absolute(), 0.0);
        assert_eq!(channel.relative(), 0.0);
        assert!(store.analog(4).is_none());
    }

    #[test]
    fn test_channel_ids_are_ascending() {
        let mut store = ChannelStore::new();
        store.get_digital(9);
        store.get_digital(2);
        store.get_digital(5);
        assert_eq!(store.digital_ids(), vec![2, 5, 9]);
    }

    #[test]
    fn test_duplicate_source_keeps_first() {
        // Arrange
        let mut store = ChannelStore::new();
        let channel = store.get_digital(0);

        // Act
        channel.add_analog_source(2, 0, 0.5);
        channel.add_analog_source(2, 0, -0.5);
        channel.add_digital_source(2, 0);

        // Assert – axis 0 and button 0 are distinct sources
        assert_eq!(
            channel.sources(),
            &[
                DigitalSource::Axis { device: 2, control: 0, threshold: 0.5 },
                DigitalSource::Button { device: 2, control: 0 },
            ]
        );
    }

    #[test]
    fn test_remove_missing_source_is_noop() {
        let mut store = ChannelStore::new();
        let channel = store.get_analog(0);
        channel.add_analog_source(0, 0);

        channel.remove_digital_source(0, 0);
        channel.remove_analog_source(5, 5);
        assert_eq!(channel.sources().len(), 1);

        channel.remove_analog_source(0, 0);
        assert!(channel.sources().is_empty());
    }

    #[test]
    fn test_digital_channel_is_or_over_devices() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        let fire = store.get_digital(1);
        fire.add_digital_source(0, 0);
        fire.add_digital_source(1, 0);

        // Act – first mouse presses
        press(&mut reg, 0, 0, true);
        let changes = store.update(&reg, 0, 0, false);
        assert_eq!(changes.len(), 1);
        assert!(store.digital(1).unwrap().was_switched_on());

        // Act – second mouse presses too: still on, no change
        press(&mut reg, 1, 0, true);
        assert!(store.update(&reg, 1, 0, false).is_empty());

        // Act – first releases: still on via the second
        press(&mut reg, 0, 0, false);
        assert!(store.update(&reg, 0, 0, false).is_empty());
        assert!(store.digital(1).unwrap().is_on());

        // Act – second releases: off, reported once
        press(&mut reg, 1, 0, false);
        let changes = store.update(&reg, 1, 0, false);

        // Assert
        assert_eq!(changes.len(), 1);
        let fire = store.digital(1).unwrap();
        assert!(!fire.is_on());
        assert!(fire.was_switched_off());
    }

    #[test]
    fn test_unchanged_reevaluation_clears_modified_flag() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_digital(0).add_digital_source(0, 0);
        store.get_digital(0).add_digital_source(1, 0);
        press(&mut reg, 0, 0, true);
        store.update(&reg, 0, 0, false);
        assert!(store.digital(0).unwrap().is_modified());

        // Act: the second source joins without flipping the channel
        press(&mut reg, 1, 0, true);
        store.update(&reg, 1, 0, false);

        // Assert
        let ch = store.digital(0).unwrap();
        assert!(ch.is_on());
        assert!(!ch.is_modified());
        assert!(!ch.was_switched_on());
    }

    #[test]
    fn test_digital_axis_threshold_signs() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_digital(0).add_analog_source(2, 0, 0.5);
        store.get_digital(1).add_analog_source(2, 0, -0.5);

        // Act / Assert
        tilt(&mut reg, 2, 0, 0.7);
        store.update(&reg, 2, 0, true);
        assert!(store.digital(0).unwrap().is_on());
        assert!(!store.digital(1).unwrap().is_on());

        tilt(&mut reg, 2, 0, -0.7);
        store.update(&reg, 2, 0, true);
        assert!(!store.digital(0).unwrap().is_on());
        assert!(store.digital(1).unwrap().is_on());

        tilt(&mut reg, 2, 0, 0.2);
        store.update(&reg, 2, 0, true);
        assert!(!store.digital(0).unwrap().is_on());
        assert!(!store.digital(1).unwrap().is_on());
    }

    #[test]
    fn test_digital_or_spans_axis_and_button_sources() {
        // Arrange – axis source listed first so a later off source cannot mask it
        let mut reg = registry();
        let mut store = ChannelStore::new();
        let right = store.get_digital(0);
        right.add_analog_source(2, 0, 0.5);
        right.add_digital_source(2, 1);

        // Act
        tilt(&mut reg, 2, 0, 0.9);
        store.update(&reg, 2, 0, true);

        // Assert
        assert!(store.digital(0).unwrap().is_on());
    }

    #[test]
    fn test_analog_channel_sums_axis_and_button() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        let throttle = store.get_analog(0);
        throttle.add_analog_source(2, 1);
        throttle.add_digital_source(2, 3, 1.0);

        // Act
        tilt(&mut reg, 2, 1, 0.25);
        store.update(&reg, 2, 1, true);
        press(&mut reg, 2, 3, true);
        let changes = store.update(&reg, 2, 3, false);

        // Assert
        assert_eq!(changes.len(), 1);
        let throttle = store.analog(0).unwrap();
        assert_eq!(throttle.absolute(), 1.25);
        assert_eq!(throttle.relative(), 1.25);
    }

    #[test]
    fn test_analog_diff_accumulates_within_frame() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_analog(0).add_analog_source(2, 0);

        // Act
        tilt(&mut reg, 2, 0, 0.5);
        store.update(&reg, 2, 0, true);
        tilt(&mut reg, 2, 0, 0.25);
        store.update(&reg, 2, 0, true);

        // Assert
        assert_eq!(store.analog(0).unwrap().relative(), 0.25);

        // Act – a new frame starts from zero
        store.begin_frame();
        assert_eq!(store.analog(0).unwrap().relative(), 0.0);
        assert_eq!(store.analog(0).unwrap().absolute(), 0.25);
    }

    #[test]
    fn test_limited_axis_gate() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_analog(0).add_digitalized_analog_source(2, 0, 2.0, 0.5);
        store.get_analog(1).add_digitalized_analog_source(2, 0, 2.0, 0.0);

        // Act – below threshold
        tilt(&mut reg, 2, 0, 0.25);
        store.update(&reg, 2, 0, true);

        // Assert – zero threshold is always open
        assert_eq!(store.analog(0).unwrap().absolute(), 0.0);
        assert_eq!(store.analog(1).unwrap().absolute(), 0.5);

        // Act – beyond threshold
        tilt(&mut reg, 2, 0, 0.75);
        store.update(&reg, 2, 0, true);
        assert_eq!(store.analog(0).unwrap().absolute(), 1.5);
    }

    #[test]
    fn test_update_ignores_unrelated_controls() {
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_digital(0).add_digital_source(0, 0);

        press(&mut reg, 0, 1, true);
        assert!(store.update(&reg, 0, 1, false).is_empty());
        // Same control index but analog: not the bound button
        assert!(store.update(&reg, 0, 0, true).is_empty());
    }

    #[test]
    fn test_dangling_device_contributes_nothing() {
        // Arrange
        let reg = registry();
        let mut store = ChannelStore::new();
        store.get_analog(0).add_digital_source(17, 0, 1.0);
        store.get_digital(0).add_digital_source(17, 0);

        // Act
        let changes = store.update(&reg, 17, 0, false);

        // Assert
        assert!(changes.is_empty());
        assert_eq!(store.analog(0).unwrap().absolute(), 0.0);
        assert!(!store.digital(0).unwrap().is_on());
    }

    #[test]
    fn test_clear_assignments_in_same_frame_sets_diff_to_negative_value() {
        // Arrange: the axis moves and is cleared without a frame boundary
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_analog(0).add_analog_source(2, 0);
        tilt(&mut reg, 2, 0, 0.5);
        store.update(&reg, 2, 0, true);

        // Act
        let changes = store.clear_assignments();

        // Assert
        assert_eq!(changes.len(), 1);
        match &changes[0] {
            ChannelChange::Analog(ch) => {
                assert_eq!(ch.absolute(), 0.0);
                assert_eq!(ch.relative(), -0.5);
            }
            other => panic!("expected analog change, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_assignments_reports_active_channels_once() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_digital(0).add_digital_source(0, 0);
        store.get_digital(1).add_digital_source(0, 1);
        store.get_analog(0).add_analog_source(2, 0);
        press(&mut reg, 0, 0, true);
        tilt(&mut reg, 2, 0, 0.5);
        store.update(&reg, 0, 0, false);
        store.update(&reg, 2, 0, true);
        store.begin_frame();

        // Act
        let changes = store.clear_assignments();

        // Assert
        assert_eq!(changes.len(), 2);
        match &changes[0] {
            ChannelChange::Digital(ch) => {
                assert_eq!(ch.id(), 0);
                assert!(ch.was_switched_off());
                assert_eq!(ch.sources().len(), 1, "captured before sources are dropped");
            }
            other => panic!("expected digital change, got {other:?}"),
        }
        match &changes[1] {
            ChannelChange::Analog(ch) => {
                assert_eq!(ch.absolute(), 0.0);
                assert_eq!(ch.relative(), -0.5);
            }
            other => panic!("expected analog change, got {other:?}"),
        }
        assert!(store.digital_channels().all(|c| c.sources().is_empty()));
        assert!(store.analog_channels().all(|c| c.sources().is_empty()));
    }

    #[test]
    fn test_clear_all_assignments_keeps_state() {
        // Arrange
        let mut reg = registry();
        let mut store = ChannelStore::new();
        store.get_digital(0).add_digital_source(0, 0);
        press(&mut reg, 0, 0, true);
        store.update(&reg, 0, 0, false);

        // Act
        store.get_digital(0).clear_all_assignments();

        // Assert
        let channel = store.digital(0).unwrap();
        assert!(channel.sources().is_empty());
        assert!(channel.is_on());
    }
}
