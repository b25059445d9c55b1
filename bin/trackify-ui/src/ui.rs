//! ---
//! tfy_section: "05-binaries"
//! tfy_subsection: "binary"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Frame rendering for the Trackify terminal UI."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Sparkline, Tabs, Wrap,
};
use ratatui::Frame;
use trackify_common::config::DeviceStatus;
use trackify_common::time::display_stamp;
use trackify_core::{Alert, Device, Severity, SpeedSample};

use crate::app::{App, Tab};

/// Immutable copy of the render inputs, taken under one short read lock.
struct FleetView {
    devices: Vec<Device>,
    alerts: Vec<Alert>,
    history: Vec<SpeedSample>,
    average_speed: u32,
    online_ratio: f64,
    critical: usize,
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let view = {
        let world = app.world().read();
        FleetView {
            devices: world.telemetry().devices().to_vec(),
            alerts: world.alerts().entries().to_vec(),
            history: world.history().samples().to_vec(),
            average_speed: world.average_speed(),
            online_ratio: world.online_ratio(),
            critical: world.critical_alerts(),
        }
    };
    let selected_id = app.selected_device_id();
    app.markers.sync(&view.devices, selected_id.as_deref());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_header(frame, layout[0], app, &view);
    match app.tab {
        Tab::Dashboard => draw_dashboard(frame, layout[1], app, &view),
        Tab::Map => draw_map(frame, layout[1], app, &view, selected_id.as_deref()),
        Tab::Alerts => draw_alert_history(frame, layout[1], &view),
    }
    draw_footer(frame, layout[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, view: &FleetView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(area);

    let tabs = Tabs::new(Tab::TITLES.to_vec())
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Indexed(99))
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Trackify Control Center"),
        );
    frame.render_widget(tabs, columns[0]);

    let (status_text, status_color) = if view.critical > 0 {
        (format!("{} CRITICAL ALERTS", view.critical), Color::Red)
    } else {
        ("All Systems Normal".to_owned(), Color::Green)
    };
    let summary = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color)),
        Span::raw(status_text),
        Span::styled(
            format!("  {} assets", view.devices.len()),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(summary, columns[1]);
}

fn draw_dashboard(frame: &mut Frame, area: Rect, app: &App, view: &FleetView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    draw_kpis(frame, rows[0], view);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(columns[0]);

    draw_sparkline(frame, left[0], view);
    draw_insights(frame, left[1], app);
    draw_live_alerts(frame, columns[1], view);
}

fn draw_kpis(frame: &mut Frame, area: Rect, view: &FleetView) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    kpi(frame, cells[0], "FLEET STATUS", format!("{:.1}%", view.online_ratio), Color::Green);
    kpi(
        frame,
        cells[1],
        "AVERAGE SPEED",
        format!("{} km/h", view.average_speed),
        Color::Indexed(99),
    );
    kpi(
        frame,
        cells[2],
        "TRACKED ASSETS",
        view.devices.len().to_string(),
        Color::Cyan,
    );
    let critical_color = if view.critical > 0 { Color::Red } else { Color::Gray };
    kpi(
        frame,
        cells[3],
        "CRITICAL ALERTS",
        view.critical.to_string(),
        critical_color,
    );
}

fn kpi(frame: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let text = vec![
        Line::from(Span::styled(
            label.to_owned(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_sparkline(frame: &mut Frame, area: Rect, view: &FleetView) {
    let data: Vec<u64> = view.history.iter().map(|sample| sample.speed as u64).collect();
    let title = match (view.devices.first(), view.history.last()) {
        (Some(device), Some(sample)) => format!(
            "Fleet Velocity History: {} ({} km/h at {})",
            device.name, sample.speed, sample.label
        ),
        _ => "Fleet Velocity History".to_owned(),
    };
    let sparkline = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Indexed(99)))
        .data(&data);
    frame.render_widget(sparkline, area);
}

fn draw_insights(frame: &mut Frame, area: Rect, app: &App) {
    let insights = Paragraph::new(app.insight_text())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Trackify AI Insights (i to refresh)")
                .border_style(Style::default().fg(Color::Indexed(99))),
        );
    frame.render_widget(insights, area);
}

fn draw_live_alerts(frame: &mut Frame, area: Rect, view: &FleetView) {
    let block = Block::default().borders(Borders::ALL).title("Live Alerts");
    if view.alerts.is_empty() {
        let empty = Paragraph::new("All assets operational.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = view.alerts.iter().map(alert_item).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn alert_item(alert: &Alert) -> ListItem<'static> {
    let color = severity_color(alert.severity);
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("▌ {}", alert.device_name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", alert.timestamp),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::raw(format!("  {}", alert.message))),
    ])
}

fn draw_map(frame: &mut Frame, area: Rect, app: &App, view: &FleetView, selected_id: Option<&str>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let viewport = app.markers.viewport();
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Live Map"))
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            for marker in app.markers.markers() {
                let color = status_color(marker.status);
                ctx.draw(&Points {
                    coords: &[(marker.lng, marker.lat)],
                    color,
                });
                let focused = selected_id == Some(marker.device_id.as_str());
                let style = if focused {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                ctx.print(
                    marker.lng,
                    marker.lat,
                    Line::styled(format!(" {}", marker.name), style),
                );
            }
        });
    frame.render_widget(canvas, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(9)])
        .split(columns[1]);

    draw_device_list(frame, side[0], app, view);
    draw_device_card(frame, side[1], app, view, selected_id);
}

fn draw_device_list(frame: &mut Frame, area: Rect, app: &App, view: &FleetView) {
    let items: Vec<ListItem> = view
        .devices
        .iter()
        .map(|device| {
            let color = status_color(device.status);
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::raw(device.name.clone()),
                Span::styled(
                    format!("  {}  {} km/h", device.status.as_str(), device.speed),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();
    let mut state = ListState::default();
    if !view.devices.is_empty() {
        state.select(Some(app.selected.min(view.devices.len() - 1)));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Fleet Overview"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_device_card(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    view: &FleetView,
    selected_id: Option<&str>,
) {
    let Some(device) = view
        .devices
        .iter()
        .find(|device| selected_id == Some(device.id.as_str()))
    else {
        frame.render_widget(
            Paragraph::new("No device selected")
                .block(Block::default().borders(Borders::ALL).title("Device")),
            area,
        );
        return;
    };

    let battery_color = if device.battery < 20 { Color::Red } else { Color::Gray };
    let mut lines = vec![
        Line::from(vec![
            Span::raw("ID: "),
            Span::styled(device.id.clone(), Style::default().fg(Color::Gray)),
            Span::raw("   "),
            Span::styled(
                device.status.as_str(),
                Style::default()
                    .fg(status_color(device.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("Battery: {}%", device.battery),
                Style::default().fg(battery_color),
            ),
            Span::raw(format!("   Signal: {}", device.signal.as_str())),
        ]),
        Line::from(format!(
            "Speed: {} km/h   Limit: {} km/h",
            device.speed, device.speed_limit
        )),
        Line::from(format!(
            "Sleep: {}   Pos: {:.4}, {:.4}",
            if device.sleep_mode { "on" } else { "off" },
            device.lat,
            device.lng
        )),
        Line::from(format!("Updated: {}", display_stamp(device.last_updated))),
    ];
    if let Some(buffer) = &app.editing {
        lines.push(Line::from(Span::styled(
            format!("Name: {buffer}▌"),
            Style::default().fg(Color::Yellow),
        )));
    }

    let title = if device.status == DeviceStatus::Sos {
        Span::styled(
            device.name.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(device.name.clone())
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_alert_history(frame: &mut Frame, area: Rect, view: &FleetView) {
    let block = Block::default().borders(Borders::ALL).title("Alert History");
    if view.alerts.is_empty() {
        let empty = Paragraph::new("No alerts recorded.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = view.alerts.iter().map(alert_item).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = if app.editing.is_some() {
        "typing device name…  Enter save  Esc cancel"
    } else {
        "Tab/1-3 views  ↑/↓ select  e rename  s sleep  +/- limit  x SOS  i insights  q quit"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn status_color(status: DeviceStatus) -> Color {
    match status {
        DeviceStatus::Online => Color::Green,
        DeviceStatus::Sos => Color::Red,
        DeviceStatus::Offline => Color::DarkGray,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Indexed(99),
    }
}
