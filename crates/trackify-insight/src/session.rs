//! ---
//! tfy_section: "04-insight"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Advisory-text adapter and request sequencing."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Monotonic request sequence making the last-write-wins policy explicit:
/// a completion is applied only when it belongs to the newest issued
/// request.
#[derive(Debug, Default)]
pub struct InsightSession {
    issued: AtomicU64,
}

impl InsightSession {
    /// Claim the next sequence number for a request about to be sent.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `seq` still identifies the newest issued request.
    pub fn is_current(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }
}

/// Shared advisory-text slot rendered by the dashboard.
#[derive(Debug)]
pub struct InsightPanel {
    session: InsightSession,
    text: Mutex<String>,
}

impl InsightPanel {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            session: InsightSession::default(),
            text: Mutex::new(initial.into()),
        }
    }

    /// Start a refresh: show interim text and claim a sequence number the
    /// eventual completion must present.
    pub fn begin(&self, interim: impl Into<String>) -> u64 {
        *self.text.lock() = interim.into();
        self.session.issue()
    }

    /// Apply a completion; stale completions (an older sequence number) are
    /// discarded. Returns whether the text was accepted.
    pub fn apply(&self, seq: u64, text: impl Into<String>) -> bool {
        if !self.session.is_current(seq) {
            return false;
        }
        *self.text.lock() = text.into();
        true
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase_monotonically() {
        let session = InsightSession::default();
        let first = session.issue();
        let second = session.issue();
        assert!(second > first);
        assert!(session.is_current(second));
        assert!(!session.is_current(first));
    }

    #[test]
    fn stale_completions_are_discarded() {
        let panel = InsightPanel::new("Analyzing fleet data...");
        let first = panel.begin("Refreshing insights...");
        let second = panel.begin("Refreshing insights...");
        assert!(!panel.apply(first, "stale result"));
        assert_eq!(panel.text(), "Refreshing insights...");
        assert!(panel.apply(second, "fresh result"));
        assert_eq!(panel.text(), "fresh result");
    }

    #[test]
    fn newest_completion_wins_regardless_of_arrival_order() {
        let panel = InsightPanel::new("");
        let first = panel.begin("...");
        let second = panel.begin("...");
        assert!(panel.apply(second, "newest"));
        assert!(!panel.apply(first, "oldest"));
        assert_eq!(panel.text(), "newest");
    }
}
