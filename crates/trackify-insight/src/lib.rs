//! ---
//! tfy_section: "04-insight"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Advisory-text adapter and request sequencing."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
//! Advisory text for the dashboard: a one-shot call to an external
//! generative endpoint, recovered to a fixed fallback string at this
//! boundary, with explicit last-write-wins sequencing of completions.

pub mod advisor;
pub mod prompt;
pub mod session;

pub use advisor::{InsightAdvisor, InsightError, FALLBACK_TEXT};
pub use session::{InsightPanel, InsightSession};
