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
use trackify_common::time::display_stamp;
use uuid::Uuid;

/// Maximum number of alert entries retained, newest first.
pub const MAX_ALERT_ENTRIES: usize = 10;

/// Alert priority tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Category of a raised alert. Only `Speed` and `Sos` are produced today;
/// `Geofence` and `Battery` are reserved wire labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertKind {
    Speed,
    #[serde(rename = "SOS")]
    Sos,
    Geofence,
    Battery,
}

/// One immutable entry of the alert history.
///
/// Device id and name are value copies taken at raise time; renaming the
/// device later must not rewrite historical alert text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub device_id: String,
    pub device_name: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    /// Display-formatted local time, e.g. `14:05:09`.
    pub timestamp: String,
    pub severity: Severity,
}

/// Bounded, insertion-ordered alert history. Newest entries sit at index 0.
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    entries: Vec<Alert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh alert at the head and truncate to the retention cap.
    pub fn raise(
        &mut self,
        device_id: &str,
        device_name: &str,
        kind: AlertKind,
        message: impl Into<String>,
        severity: Severity,
        at: DateTime<Utc>,
    ) -> &Alert {
        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            device_id: device_id.to_owned(),
            device_name: device_name.to_owned(),
            kind,
            message: message.into(),
            timestamp: display_stamp(at),
            severity,
        };
        self.entries.insert(0, alert);
        self.entries.truncate(MAX_ALERT_ENTRIES);
        &self.entries[0]
    }

    /// Read-only view of the full history, newest first.
    pub fn entries(&self) -> &[Alert] {
        &self.entries
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> &[Alert] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// Number of high-severity entries currently retained.
    pub fn critical_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|alert| alert.severity == Severity::High)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
