//! ---
//! tfy_section: "02-fleet-state"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Fleet state stores and derived views."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use trackify_common::config::{DeviceSeed, DeviceStatus};

use crate::device::{Device, DeviceUpdate};

/// Result of flipping a device's SOS state.
#[derive(Debug, Clone)]
pub struct SosTransition {
    pub device_id: String,
    pub device_name: String,
    /// `true` when the device entered SOS, `false` when it cleared back to
    /// Online.
    pub engaged: bool,
}

/// Ordered collection of device records; the single source of truth for
/// position, speed, and status. Iteration order is seed order and stays
/// stable for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    devices: Vec<Device>,
}

impl TelemetryStore {
    pub fn from_seeds(seeds: &[DeviceSeed], now: DateTime<Utc>) -> Self {
        Self {
            devices: seeds.iter().map(|seed| Device::from_seed(seed, now)).collect(),
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Mutable access for the simulation driver's per-tick pass.
    pub fn devices_mut(&mut self) -> &mut [Device] {
        &mut self.devices
    }

    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Merge the present fields of `update` into the matching record.
    ///
    /// An unknown id is a silent no-op, not an error. Returns whether a
    /// record was touched.
    pub fn update(&mut self, id: &str, update: DeviceUpdate) -> bool {
        let Some(device) = self.devices.iter_mut().find(|device| device.id == id) else {
            return false;
        };
        if let Some(name) = update.name {
            device.name = name;
        }
        if let Some(sleep_mode) = update.sleep_mode {
            device.sleep_mode = sleep_mode;
        }
        if let Some(speed_limit) = update.speed_limit {
            device.speed_limit = speed_limit;
        }
        true
    }

    /// Flip a device between SOS and Online.
    ///
    /// Any non-SOS status (including Offline) engages SOS; clearing always
    /// lands on Online, never on the prior status. Pending a product
    /// decision on restoring the pre-SOS status, the asymmetry stands.
    pub fn toggle_sos(&mut self, id: &str) -> Option<SosTransition> {
        let device = self.devices.iter_mut().find(|device| device.id == id)?;
        let engaged = device.status != DeviceStatus::Sos;
        device.status = if engaged {
            DeviceStatus::Sos
        } else {
            DeviceStatus::Online
        };
        Some(SosTransition {
            device_id: device.id.clone(),
            device_name: device.name.clone(),
            engaged,
        })
    }
}
