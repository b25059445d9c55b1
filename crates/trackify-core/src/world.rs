//! ---
//! tfy_section: "02-fleet-state"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Fleet state stores and derived views."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};
use trackify_common::config::{DeviceSeed, DeviceStatus};
use trackify_common::time::clock_label;

use crate::alerts::{Alert, AlertKind, AlertLog, Severity};
use crate::device::{DeviceDigest, DeviceUpdate};
use crate::history::SpeedHistory;
use crate::telemetry::TelemetryStore;

/// Number of recent alerts shared with the insight service.
const SNAPSHOT_ALERTS: usize = 5;

/// Shared handle to the world; the simulation loop and the UI both hold one.
/// All mutation happens under the write lock, so readers never observe a
/// partial tick.
pub type SharedWorld = Arc<RwLock<FleetWorld>>;

/// Point-in-time view of the fleet handed to the insight adapter.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    pub devices: Vec<DeviceDigest>,
    pub alerts: Vec<Alert>,
}

/// Composition of the telemetry store, the alert log, and the velocity
/// history; every mutation funnels through here so derived state stays
/// consistent.
#[derive(Debug, Clone, Default)]
pub struct FleetWorld {
    telemetry: TelemetryStore,
    alerts: AlertLog,
    history: SpeedHistory,
}

impl FleetWorld {
    pub fn from_seeds(seeds: &[DeviceSeed], now: DateTime<Utc>) -> Self {
        let mut world = Self {
            telemetry: TelemetryStore::from_seeds(seeds, now),
            alerts: AlertLog::new(),
            history: SpeedHistory::default(),
        };
        world.record_sample(now);
        world
    }

    pub fn into_shared(self) -> SharedWorld {
        Arc::new(RwLock::new(self))
    }

    pub fn telemetry(&self) -> &TelemetryStore {
        &self.telemetry
    }

    /// Mutable store access for the simulation driver's tick pass.
    pub fn telemetry_mut(&mut self) -> &mut TelemetryStore {
        &mut self.telemetry
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn history(&self) -> &SpeedHistory {
        &self.history
    }

    /// Merge a partial field update into a device record; unknown ids are
    /// ignored. Used by rename, sleep-mode toggle, and speed-limit changes.
    pub fn update_device(&mut self, id: &str, update: DeviceUpdate, now: DateTime<Utc>) {
        if self.telemetry.update(id, update) {
            self.record_sample(now);
        }
    }

    /// Flip SOS for a device, raising the emergency alert on engagement.
    pub fn toggle_sos(&mut self, id: &str, now: DateTime<Utc>) {
        let Some(transition) = self.telemetry.toggle_sos(id) else {
            return;
        };
        if transition.engaged {
            warn!(device = %transition.device_id, "SOS engaged");
            self.alerts.raise(
                &transition.device_id,
                &transition.device_name,
                AlertKind::Sos,
                "EMERGENCY SOS SIGNAL RECEIVED!",
                Severity::High,
                now,
            );
        } else {
            info!(device = %transition.device_id, "SOS cleared");
        }
        self.record_sample(now);
    }

    /// Record a speed violation detected during a tick, using the freshly
    /// drawn speed value.
    pub fn raise_speed_violation(
        &mut self,
        device_id: &str,
        device_name: &str,
        speed: u32,
        limit: u32,
        now: DateTime<Utc>,
    ) {
        warn!(device = %device_id, speed, limit, "speed violation");
        self.alerts.raise(
            device_id,
            device_name,
            AlertKind::Speed,
            format!("Speed Violation: {speed}km/h (Limit: {limit})"),
            Severity::Medium,
            now,
        );
    }

    /// Append the tracked device's velocity to the history window. The
    /// tracked device is the first record in store order.
    pub fn record_sample(&mut self, now: DateTime<Utc>) {
        if let Some(device) = self.telemetry.devices().first() {
            self.history.record(clock_label(now), device.speed);
        }
    }

    /// Abbreviated devices plus the most recent alerts, for the advisor.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            devices: self.telemetry.devices().iter().map(DeviceDigest::from).collect(),
            alerts: self.alerts.recent(SNAPSHOT_ALERTS).to_vec(),
        }
    }

    /// Mean fleet speed in km/h, for the dashboard KPI row.
    pub fn average_speed(&self) -> u32 {
        let devices = self.telemetry.devices();
        if devices.is_empty() {
            return 0;
        }
        let total: u32 = devices.iter().map(|device| device.speed).sum();
        total / devices.len() as u32
    }

    /// Share of devices currently reachable (not Offline), in percent.
    pub fn online_ratio(&self) -> f64 {
        let devices = self.telemetry.devices();
        if devices.is_empty() {
            return 0.0;
        }
        let reachable = devices
            .iter()
            .filter(|device| device.status != DeviceStatus::Offline)
            .count();
        reachable as f64 * 100.0 / devices.len() as f64
    }

    /// Number of high-severity alerts retained; drives the critical badge.
    pub fn critical_alerts(&self) -> usize {
        self.alerts.critical_count()
    }
}
