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
use serde::{Deserialize, Serialize};
use trackify_common::config::{DeviceSeed, DeviceStatus, SignalQuality};

/// Live record for one tracked unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Instantaneous speed in km/h.
    pub speed: u32,
    /// Configured violation threshold in km/h.
    pub speed_limit: u32,
    #[serde(rename = "isSleepMode")]
    pub sleep_mode: bool,
    pub battery: u8,
    pub signal: SignalQuality,
    pub last_updated: DateTime<Utc>,
    pub status: DeviceStatus,
}

impl Device {
    pub fn from_seed(seed: &DeviceSeed, now: DateTime<Utc>) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            lat: seed.lat,
            lng: seed.lng,
            speed: seed.speed,
            speed_limit: seed.speed_limit,
            sleep_mode: seed.sleep_mode,
            battery: seed.battery,
            signal: seed.signal,
            last_updated: now,
            status: seed.status,
        }
    }

    /// A device excluded from simulated movement: asleep or unreachable.
    pub fn is_stationary(&self) -> bool {
        self.sleep_mode || self.status == DeviceStatus::Offline
    }
}

/// Partial field update applied through [`crate::TelemetryStore::update`].
///
/// Absent fields are left untouched on the target record.
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub sleep_mode: Option<bool>,
    pub speed_limit: Option<u32>,
}

impl DeviceUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn sleep_mode(enabled: bool) -> Self {
        Self {
            sleep_mode: Some(enabled),
            ..Self::default()
        }
    }

    pub fn speed_limit(limit: u32) -> Self {
        Self {
            speed_limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Abbreviated device fields shared with the insight service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDigest {
    pub name: String,
    pub status: DeviceStatus,
    pub battery: u8,
    pub speed: u32,
    pub speed_limit: u32,
}

impl From<&Device> for DeviceDigest {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name.clone(),
            status: device.status,
            battery: device.battery,
            speed: device.speed,
            speed_limit: device.speed_limit,
        }
    }
}
