//! ---
//! tfy_section: "01-fleet-core"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Shared primitives and utilities for the fleet runtime."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
//! Core shared primitives for the Trackify workspace.
//! This crate exposes configuration loading, logging, and version
//! metadata utilities consumed across the workspace.

pub mod config;
pub mod logging;
pub mod time;
pub mod version;

pub use config::{
    AppConfig, DeviceSeed, DeviceStatus, InsightConfig, LoadedAppConfig, LoggingConfig,
    SignalQuality, SimulationConfig,
};
pub use logging::{init_file_tracing, init_tracing, LogFormat};
pub use version::VersionInfo;
