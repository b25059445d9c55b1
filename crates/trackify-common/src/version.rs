//! ---
//! tfy_section: "01-fleet-core"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Shared primitives and utilities for the fleet runtime."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Build metadata captured at compile time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub semver: String,
    pub build_timestamp: String,
    pub target: String,
    pub profile: String,
}

impl VersionInfo {
    /// Metadata for the running build, sourced from the vergen emitters.
    pub fn current() -> Self {
        Self {
            semver: env!("CARGO_PKG_VERSION").to_owned(),
            build_timestamp: option_env!("VERGEN_BUILD_TIMESTAMP")
                .unwrap_or("unknown")
                .to_owned(),
            target: option_env!("VERGEN_CARGO_TARGET_TRIPLE")
                .unwrap_or("unknown")
                .to_owned(),
            profile: if cfg!(debug_assertions) {
                "debug".to_owned()
            } else {
                "release".to_owned()
            },
        }
    }

    /// Single-line rendering for CLI banners.
    pub fn cli_string(&self) -> String {
        format!("trackify {} ({})", self.semver, self.profile)
    }

    /// Multi-line rendering for `--version` output.
    pub fn extended(&self) -> String {
        format!(
            "trackify {}\nbuilt: {}\ntarget: {}\nprofile: {}",
            self.semver, self.build_timestamp, self.target, self.profile
        )
    }
}
