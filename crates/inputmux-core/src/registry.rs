//! Device registry and multi-device disambiguation.
//!
//! The registry owns every [`Device`] in enumeration order and answers two
//! questions for the input system:
//!
//! - **Who is primary?**  For each kind, the device at rank (`count`) 0.
//! - **Where does an event go?**  In multi-device mode every device reports under
//!   its own identity.  In single-device mode secondary mice and keyboards are
//!   merged into the primary one; see [`DeviceRegistry::routing_target`].
//!
//! # Promotion
//!
//! Enumeration order is arbitrary, so the primary device is decided
//! empirically: the first time a device shows real activity it is
//! **promoted**, swapping `{id, count}` and list position with the
//! lowest-ranked device of its kind ahead of it that has not shown activity yet.
//! Each device is considered exactly once.
//!
//! ```text
//! before: [kbd A (id 0, count 0)] [mouse (id 1)] [kbd B (id 2, count 1)]
//! user types on B
//! after:  [kbd B (id 0, count 0)] [mouse (id 1)] [kbd A (id 2, count 1)]
//! ```
//!
//! Channel sources refer to devices by id, so bindings made against
//! "keyboard id 0" follow whichever keyboard the user actually uses.

use tracing::debug;

use crate::backend::DeviceDescriptor;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceKind};

/// Every registered device plus per-kind ranking.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    counts: [usize; 3],
    primaries: [Option<DeviceId>; 3],
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device in enumeration order.
    ///
    /// The device receives `id = number of devices so far` and
    /// `count = number of devices of its kind so far`; its handle equals its id
    /// at registration.  The first device of a kind becomes that kind's primary.
    pub fn register(&mut self, descriptor: &DeviceDescriptor) -> DeviceId {
        let id = self.devices.len();
        let slot = descriptor.kind.slot();
        let count = self.counts[slot];
        self.counts[slot] += 1;
        if count == 0 {
            self.primaries[slot] = Some(id);
        }

        debug!(id, count, kind = %descriptor.kind, name = %descriptor.name, "registered device");
        self.devices.push(Device::new(DeviceHandle(id), id, count, descriptor));
        id
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.iter_mut()
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub(crate) fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(id)
    }

    /// Resolves a backend handle to the device's current id.
    pub fn index_of(&self, handle: DeviceHandle) -> Option<DeviceId> {
        self.devices.iter().position(|d| d.handle() == handle)
    }

    /// Returns the device of `kind` at rank `count`.
    pub fn by_count(&self, kind: DeviceKind, count: usize) -> Option<&Device> {
        self.devices.iter().find(|d| d.kind() == kind && d.count() == count)
    }

    /// Number of registered devices of `kind`.
    pub fn count_of(&self, kind: DeviceKind) -> usize {
        self.counts[kind.slot()]
    }

    /// Id of the rank-0 device of `kind`, if any device of that kind exists.
    pub fn primary(&self, kind: DeviceKind) -> Option<DeviceId> {
        self.primaries[kind.slot()]
    }

    /// Considers the device at `id` for promotion and returns its id afterwards.
    ///
    /// No-op (returning `id`) when the device was already considered, or when
    /// every device of its kind ahead of it has shown activity before.
    pub(crate) fn promote(&mut self, id: DeviceId) -> DeviceId {
        let Some(device) = self.devices.get_mut(id) else {
            return id;
        };
        if device.was_promoted() {
            return id;
        }
        device.set_promoted();
        let kind = device.kind();
        let count = device.count();

        let front = self
            .devices
            .iter()
            .filter(|d| d.kind() == kind && d.count() < count && !d.was_promoted())
            .min_by_key(|d| d.count())
            .map(|d| (d.id(), d.count()));
        let Some((front_id, front_count)) = front else {
            return id;
        };

        debug!(
            kind = %kind,
            from_id = id,
            from_count = count,
            to_id = front_id,
            to_count = front_count,
            "swapping devices due to activity"
        );

        self.devices[id].set_rank(front_id, front_count);
        self.devices[front_id].set_rank(id, count);
        self.devices.swap(id, front_id);

        if front_count == 0 {
            self.primaries[kind.slot()] = Some(front_id);
        }
        front_id
    }

    /// Decides which device an event from `id` is reported under.
    ///
    /// In single-device mode a secondary mouse or keyboard routes to the
    /// primary device of its kind.  Joysticks, and every device in
    /// multi-device mode, route to themselves.
    pub fn routing_target(&self, id: DeviceId, multi_device_mode: bool) -> DeviceId {
        if multi_device_mode {
            return id;
        }
        let Some(device) = self.devices.get(id) else {
            return id;
        };
        match device.kind() {
            DeviceKind::Mouse | DeviceKind::Keyboard => self.primary(device.kind()).unwrap_or(id),
            DeviceKind::Joystick => id,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
