//! ---
//! tfy_section: "02-fleet-state"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Fleet state stores and derived views."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
//! In-memory fleet state for the Trackify runtime.
//!
//! Two stores own all mutable state: the [`TelemetryStore`] (device records)
//! and the [`AlertLog`] (bounded, newest-first alert history). [`FleetWorld`]
//! composes them, mediates every mutation, and derives the presentation
//! values the dashboard renders.

pub mod alerts;
pub mod device;
pub mod history;
pub mod telemetry;
pub mod world;

pub use alerts::{Alert, AlertKind, AlertLog, Severity, MAX_ALERT_ENTRIES};
pub use device::{Device, DeviceDigest, DeviceUpdate};
pub use history::{SpeedHistory, SpeedSample, MAX_HISTORY_SAMPLES};
pub use telemetry::{SosTransition, TelemetryStore};
pub use world::{FleetSnapshot, FleetWorld, SharedWorld};
