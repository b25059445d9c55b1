//! ---
//! tfy_section: "02-fleet-state"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Fleet state stores and derived views."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Maximum number of velocity samples retained, oldest first.
pub const MAX_HISTORY_SAMPLES: usize = 10;

/// One velocity reading of the tracked device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeedSample {
    /// Display label, e.g. `14:05`.
    pub label: String,
    pub speed: u32,
}

/// Rolling window of velocity samples feeding the dashboard sparkline.
/// Derived state: appended on every telemetry change, never edited.
#[derive(Debug, Clone, Default)]
pub struct SpeedHistory {
    samples: Vec<SpeedSample>,
}

impl SpeedHistory {
    pub fn record(&mut self, label: String, speed: u32) {
        self.samples.push(SpeedSample { label, speed });
        if self.samples.len() > MAX_HISTORY_SAMPLES {
            let excess = self.samples.len() - MAX_HISTORY_SAMPLES;
            self.samples.drain(..excess);
        }
    }

    /// Samples in chronological order, oldest first.
    pub fn samples(&self) -> &[SpeedSample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&SpeedSample> {
        self.samples.last()
    }
}
