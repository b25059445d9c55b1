//! ---
//! tfy_section: "01-fleet-core"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Shared primitives and utilities for the fleet runtime."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

/// Lowest speed limit a device may be configured with, in km/h.
pub const SPEED_LIMIT_MIN: u32 = 20;
/// Highest speed limit a device may be configured with, in km/h.
pub const SPEED_LIMIT_MAX: u32 = 180;

fn default_tick_interval() -> Duration {
    Duration::from_millis(5000)
}

fn default_simulation_enabled() -> bool {
    true
}

fn default_random_seed() -> u64 {
    0xF1EE7u64
}

fn default_insight_enabled() -> bool {
    true
}

fn default_insight_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_owned()
}

fn default_insight_model() -> String {
    "gemini-3-flash-preview".to_owned()
}

fn default_api_key_env() -> String {
    "TRACKIFY_API_KEY".to_owned()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_battery() -> u8 {
    100
}

fn default_speed_limit() -> u32 {
    80
}

/// Primary configuration object for the Trackify runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub insight: InsightConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "seed_fleet")]
    pub devices: Vec<DeviceSeed>,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when the built-in defaults were used.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "TRACKIFY_CONFIG";

    /// Load configuration from disk, respecting the `TRACKIFY_CONFIG` override.
    ///
    /// Unlike a long-lived installation, the dashboard must come up with zero
    /// setup, so when no candidate file exists the built-in seed fleet and
    /// defaults are used instead of failing.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!("no configuration file found; using built-in defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.devices.is_empty() {
            return Err(anyhow!("configuration must declare at least one device"));
        }
        for (index, device) in self.devices.iter().enumerate() {
            device.validate(index)?;
        }
        let mut ids: Vec<&str> = self.devices.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.devices.len() {
            return Err(anyhow!("device ids must be unique"));
        }
        self.simulation.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            insight: InsightConfig::default(),
            logging: LoggingConfig::default(),
            devices: seed_fleet(),
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Simulation loop parameters.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_simulation_enabled")]
    pub enabled: bool,
    #[serde(default = "default_tick_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub tick_interval: Duration,
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(anyhow!("simulation tick_interval must be non-zero"));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: default_simulation_enabled(),
            tick_interval: default_tick_interval(),
            random_seed: default_random_seed(),
        }
    }
}

/// Settings for the external advisory-text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_insight_enabled")]
    pub enabled: bool,
    #[serde(default = "default_insight_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_insight_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            enabled: default_insight_enabled(),
            endpoint: default_insight_endpoint(),
            model: default_insight_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

/// Connectivity state reported by a tracked unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceStatus {
    Online,
    Offline,
    #[serde(rename = "SOS")]
    Sos,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "Online",
            DeviceStatus::Offline => "Offline",
            DeviceStatus::Sos => "SOS",
        }
    }
}

/// Reported signal quality category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SignalQuality {
    #[default]
    Strong,
    Weak,
    None,
}

impl SignalQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalQuality::Strong => "Strong",
            SignalQuality::Weak => "Weak",
            SignalQuality::None => "None",
        }
    }
}

/// One entry of the seed fleet the runtime starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSeed {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub speed: u32,
    #[serde(default = "default_speed_limit")]
    pub speed_limit: u32,
    #[serde(default)]
    pub sleep_mode: bool,
    #[serde(default = "default_battery")]
    pub battery: u8,
    #[serde(default)]
    pub signal: SignalQuality,
    #[serde(default = "default_device_status")]
    pub status: DeviceStatus,
}

fn default_device_status() -> DeviceStatus {
    DeviceStatus::Online
}

impl DeviceSeed {
    fn validate(&self, index: usize) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(anyhow!("device #{index} must declare a non-empty id"));
        }
        if self.battery > 100 {
            return Err(anyhow!(
                "device '{}' battery must be within 0..=100",
                self.id
            ));
        }
        if !(SPEED_LIMIT_MIN..=SPEED_LIMIT_MAX).contains(&self.speed_limit) {
            return Err(anyhow!(
                "device '{}' speed_limit must be within {}..={} km/h",
                self.id,
                SPEED_LIMIT_MIN,
                SPEED_LIMIT_MAX
            ));
        }
        Ok(())
    }
}

/// The historical three-unit demo fleet used when no configuration exists.
fn seed_fleet() -> Vec<DeviceSeed> {
    vec![
        DeviceSeed {
            id: "TRK-9901".to_owned(),
            name: "Logistics Truck A".to_owned(),
            lat: 40.7128,
            lng: -74.0060,
            speed: 65,
            speed_limit: 80,
            sleep_mode: false,
            battery: 88,
            signal: SignalQuality::Strong,
            status: DeviceStatus::Online,
        },
        DeviceSeed {
            id: "TRK-4421".to_owned(),
            name: "Service Van 4".to_owned(),
            lat: 40.7589,
            lng: -73.9851,
            speed: 12,
            speed_limit: 45,
            sleep_mode: false,
            battery: 42,
            signal: SignalQuality::Weak,
            status: DeviceStatus::Online,
        },
        DeviceSeed {
            id: "ASSET-220".to_owned(),
            name: "E-Bike Delivery".to_owned(),
            lat: 40.7484,
            lng: -73.9857,
            speed: 0,
            speed_limit: 25,
            sleep_mode: true,
            battery: 95,
            signal: SignalQuality::Strong,
            status: DeviceStatus::Offline,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_and_carry_seed_fleet() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.devices.len(), 3);
        assert_eq!(config.devices[0].id, "TRK-9901");
        assert_eq!(config.devices[2].status, DeviceStatus::Offline);
        assert_eq!(config.simulation.tick_interval, Duration::from_millis(5000));
    }

    #[test]
    fn parses_partial_config_with_defaults() {
        let config: AppConfig = r#"
            [simulation]
            tick_interval = 250
            random_seed = 42

            [[devices]]
            id = "VAN-1"
            name = "Courier Van"
            lat = 51.5074
            lng = -0.1278
        "#
        .parse()
        .unwrap();
        assert_eq!(config.simulation.tick_interval, Duration::from_millis(250));
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.devices[0].speed_limit, 80);
        assert_eq!(config.devices[0].status, DeviceStatus::Online);
        assert!(config.insight.enabled);
    }

    #[test]
    fn rejects_duplicate_device_ids() {
        let parsed = r#"
            [[devices]]
            id = "VAN-1"
            name = "A"
            lat = 0.0
            lng = 0.0

            [[devices]]
            id = "VAN-1"
            name = "B"
            lat = 0.0
            lng = 0.0
        "#
        .parse::<AppConfig>();
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_out_of_range_speed_limit() {
        let parsed = r#"
            [[devices]]
            id = "VAN-1"
            name = "A"
            lat = 0.0
            lng = 0.0
            speed_limit = 400
        "#
        .parse::<AppConfig>();
        assert!(parsed.is_err());
    }

    #[test]
    fn seed_fleet_round_trips_through_toml() {
        let config = AppConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        let reparsed: AppConfig = rendered.parse().unwrap();
        assert_eq!(reparsed.devices.len(), config.devices.len());
        assert_eq!(reparsed.devices[1].name, "Service Van 4");
        assert_eq!(reparsed.simulation.random_seed, config.simulation.random_seed);
    }

    #[test]
    fn loads_the_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackify.toml");
        std::fs::write(
            &path,
            r#"
                [simulation]
                random_seed = 7

                [[devices]]
                id = "VAN-1"
                name = "Courier Van"
                lat = 51.5074
                lng = -0.1278
            "#,
        )
        .unwrap();

        let missing = dir.path().join("absent.toml");
        let loaded = AppConfig::load_with_source(&[missing, path.clone()]).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.simulation.random_seed, 7);
    }

    #[test]
    fn falls_back_to_defaults_when_no_candidate_exists() {
        let dir = tempfile::tempdir().unwrap();
        let loaded =
            AppConfig::load_with_source(&[dir.path().join("absent.toml")]).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.devices.len(), 3);
    }

    #[test]
    fn status_serializes_with_historical_labels() {
        assert_eq!(
            serde_json::to_string(&DeviceStatus::Sos).unwrap(),
            "\"SOS\""
        );
        assert_eq!(
            serde_json::to_string(&SignalQuality::None).unwrap(),
            "\"None\""
        );
    }
}
