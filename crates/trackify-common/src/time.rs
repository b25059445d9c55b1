//! ---
//! tfy_section: "01-fleet-core"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Shared primitives and utilities for the fleet runtime."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use chrono::{DateTime, Local, Utc};

/// Capture the current wall-clock instant for telemetry stamps.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Display stamp used by alert records, e.g. `14:05:09`.
pub fn display_stamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Short label used by the velocity history axis, e.g. `14:05`.
pub fn clock_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}
