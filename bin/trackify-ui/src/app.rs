//! ---
//! tfy_section: "05-binaries"
//! tfy_subsection: "binary"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Dashboard state and key handling for the terminal UI."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;
use trackify_common::config::{InsightConfig, SPEED_LIMIT_MAX, SPEED_LIMIT_MIN};
use trackify_common::time::now_utc;
use trackify_core::{DeviceUpdate, SharedWorld};
use trackify_insight::{InsightAdvisor, InsightPanel};

use crate::map::MarkerLayer;

/// Top-level dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Map,
    Alerts,
}

impl Tab {
    pub const TITLES: [&'static str; 3] = ["Dashboard", "Map", "Alerts"];

    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Map => 1,
            Tab::Alerts => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Map,
            Tab::Map => Tab::Alerts,
            Tab::Alerts => Tab::Dashboard,
        }
    }
}

/// Mutable UI state: current tab, device selection, rename buffer, and the
/// shared handles the views render from.
pub struct App {
    world: SharedWorld,
    panel: Arc<InsightPanel>,
    advisor: InsightAdvisor,
    insight_enabled: bool,
    runtime: tokio::runtime::Handle,
    pub tab: Tab,
    pub selected: usize,
    /// Rename buffer; `Some` while editing the selected device's name.
    pub editing: Option<String>,
    pub markers: MarkerLayer,
}

impl App {
    pub fn new(world: SharedWorld, insight: &InsightConfig, runtime: tokio::runtime::Handle) -> Self {
        let panel = if insight.enabled {
            InsightPanel::new("Analyzing fleet data...")
        } else {
            InsightPanel::new("AI advisor disabled by configuration.")
        };
        Self {
            world,
            panel: Arc::new(panel),
            advisor: InsightAdvisor::new(insight.clone()),
            insight_enabled: insight.enabled,
            runtime,
            tab: Tab::Dashboard,
            selected: 0,
            editing: None,
            markers: MarkerLayer::new(),
        }
    }

    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    pub fn insight_text(&self) -> String {
        self.panel.text()
    }

    pub fn selected_device_id(&self) -> Option<String> {
        self.world
            .read()
            .telemetry()
            .devices()
            .get(self.selected)
            .map(|device| device.id.clone())
    }

    /// Handle one key event; returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.editing.is_some() {
            self.handle_edit_key(key);
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::Dashboard,
            KeyCode::Char('2') => self.tab = Tab::Map,
            KeyCode::Char('3') => self.tab = Tab::Alerts,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Char('e') => self.begin_rename(),
            KeyCode::Char('s') => self.toggle_sleep(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_speed_limit(5),
            KeyCode::Char('-') => self.adjust_speed_limit(-5),
            KeyCode::Char('x') => self.toggle_sos(),
            KeyCode::Char('i') => self.refresh_insight("Refreshing insights..."),
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.commit_rename(),
            KeyCode::Esc => self.editing = None,
            KeyCode::Backspace => {
                if let Some(buffer) = self.editing.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.editing.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn select_next(&mut self) {
        let count = self.world.read().telemetry().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn begin_rename(&mut self) {
        let current = self
            .world
            .read()
            .telemetry()
            .devices()
            .get(self.selected)
            .map(|device| device.name.clone());
        if let Some(name) = current {
            self.editing = Some(name);
        }
    }

    fn commit_rename(&mut self) {
        let Some(name) = self.editing.take() else {
            return;
        };
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(id) = self.selected_device_id() {
            self.world
                .write()
                .update_device(&id, DeviceUpdate::rename(trimmed), now_utc());
        }
    }

    fn toggle_sleep(&mut self) {
        let Some(id) = self.selected_device_id() else {
            return;
        };
        let mut world = self.world.write();
        let Some(device) = world.telemetry().get(&id) else {
            return;
        };
        let sleeping = device.sleep_mode;
        world.update_device(&id, DeviceUpdate::sleep_mode(!sleeping), now_utc());
    }

    fn adjust_speed_limit(&mut self, delta: i32) {
        let Some(id) = self.selected_device_id() else {
            return;
        };
        let mut world = self.world.write();
        let Some(device) = world.telemetry().get(&id) else {
            return;
        };
        let next = (device.speed_limit as i64 + delta as i64)
            .clamp(SPEED_LIMIT_MIN as i64, SPEED_LIMIT_MAX as i64) as u32;
        world.update_device(&id, DeviceUpdate::speed_limit(next), now_utc());
    }

    fn toggle_sos(&mut self) {
        if let Some(id) = self.selected_device_id() {
            self.world.write().toggle_sos(&id, now_utc());
        }
    }

    /// Kick off an advisory fetch. Completions apply last-write-wins; a
    /// stale result never overwrites a newer request's text.
    pub fn refresh_insight(&mut self, interim: &str) {
        if !self.insight_enabled {
            return;
        }
        let seq = self.panel.begin(interim);
        let advisor = self.advisor.clone();
        let panel = self.panel.clone();
        let world = self.world.clone();
        self.runtime.spawn(async move {
            let snapshot = world.read().snapshot();
            let text = advisor.advise(&snapshot).await;
            if !panel.apply(seq, text) {
                debug!(seq, "stale insight completion discarded");
            }
        });
    }
}
