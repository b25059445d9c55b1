//! ---
//! tfy_section: "03-simulation"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Simulation driver and tick loop."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
//! Simulated telemetry for the Trackify fleet: a seeded perturbation
//! engine and the fixed-cadence loop that applies it to the shared world.

pub mod driver;
pub mod runner;

pub use driver::SimulationDriver;
pub use runner::{RateLimiter, SimulationRunner};
