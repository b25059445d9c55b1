//! ---
//! tfy_section: "06-testing"
//! tfy_subsection: "integration"
//! tfy_type: "source"
//! tfy_scope: "test"
//! tfy_description: "End-to-end checks of the simulated fleet lifecycle."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use trackify_common::config::{AppConfig, DeviceStatus};
use trackify_core::{AlertKind, DeviceUpdate, FleetWorld, Severity, MAX_ALERT_ENTRIES};
use trackify_sim::{SimulationDriver, SimulationRunner};

fn seeded_world() -> FleetWorld {
    FleetWorld::from_seeds(&AppConfig::default().devices, Utc::now())
}

#[test]
fn a_long_session_preserves_every_store_invariant() {
    let mut world = seeded_world();
    let mut driver = SimulationDriver::new(0xF1EE7);
    let asleep_before = world.telemetry().get("ASSET-220").unwrap().clone();

    for _ in 0..120 {
        driver.advance(&mut world, Utc::now());

        // Bounded log, newest first.
        assert!(world.alerts().len() <= MAX_ALERT_ENTRIES);
        for device in world.telemetry().devices() {
            assert!(device.speed <= 89);
        }
    }

    // The sleeping, offline e-bike never moved.
    let asleep_after = world.telemetry().get("ASSET-220").unwrap();
    assert_eq!(asleep_before.lat, asleep_after.lat);
    assert_eq!(asleep_before.lng, asleep_after.lng);
    assert_eq!(asleep_before.speed, asleep_after.speed);
    assert_eq!(asleep_before.last_updated, asleep_after.last_updated);

    // 120 ticks with limits of 80 and 45 make violations a near certainty;
    // every retained alert is a medium speed violation from a live unit.
    assert!(!world.alerts().is_empty());
    for alert in world.alerts().entries() {
        assert_eq!(alert.kind, AlertKind::Speed);
        assert_eq!(alert.severity, Severity::Medium);
        assert_ne!(alert.device_id, "ASSET-220");
        assert!(alert.message.starts_with("Speed Violation: "));
    }

    // Velocity history stays within its window, oldest first.
    assert_eq!(world.history().samples().len(), 10);
}

#[test]
fn renames_do_not_leak_into_recorded_alerts() {
    let mut world = seeded_world();
    let now = Utc::now();
    world.raise_speed_violation("TRK-9901", "Logistics Truck A", 85, 80, now);
    world.update_device("TRK-9901", DeviceUpdate::rename("Night Shift Truck"), now);

    assert_eq!(
        world.telemetry().get("TRK-9901").unwrap().name,
        "Night Shift Truck"
    );
    let head = &world.alerts().entries()[0];
    assert_eq!(head.device_name, "Logistics Truck A");
    assert_eq!(head.message, "Speed Violation: 85km/h (Limit: 80)");
}

#[test]
fn sos_lifecycle_matches_the_documented_quirk() {
    let mut world = seeded_world();
    let now = Utc::now();

    // Offline unit: engage lands on SOS, clear lands on Online.
    world.toggle_sos("ASSET-220", now);
    assert_eq!(
        world.telemetry().get("ASSET-220").unwrap().status,
        DeviceStatus::Sos
    );
    assert_eq!(world.alerts().len(), 1);
    assert_eq!(world.alerts().entries()[0].severity, Severity::High);
    assert_eq!(
        world.alerts().entries()[0].message,
        "EMERGENCY SOS SIGNAL RECEIVED!"
    );

    world.toggle_sos("ASSET-220", now);
    assert_eq!(
        world.telemetry().get("ASSET-220").unwrap().status,
        DeviceStatus::Online
    );
    // Clearing raises nothing.
    assert_eq!(world.alerts().len(), 1);
}

#[test]
fn sos_devices_keep_moving_unless_asleep() {
    let mut world = seeded_world();
    let now = Utc::now();
    world.toggle_sos("TRK-9901", now);
    let before = world.telemetry().get("TRK-9901").unwrap().clone();

    let mut driver = SimulationDriver::new(11);
    driver.advance(&mut world, Utc::now());

    let after = world.telemetry().get("TRK-9901").unwrap();
    // SOS is not Offline: the unit still reports movement.
    assert!(after.last_updated > before.last_updated || after.speed != before.speed);
    assert_eq!(after.status, DeviceStatus::Sos);
}

#[tokio::test(start_paused = true)]
async fn the_runner_advances_a_shared_world_on_cadence() {
    let world = seeded_world().into_shared();
    let (_tx, rx) = broadcast::channel(1);
    let handle = SimulationRunner::new(world.clone(), 21, Duration::from_millis(50))
        .with_max_ticks(Some(4))
        .spawn(rx);

    let ticks = handle.await.unwrap();
    assert_eq!(ticks, 4);

    let world = world.read();
    // Seed sample plus one per tick, still within the window.
    assert_eq!(world.history().samples().len(), 5);
    for device in world.telemetry().devices() {
        if !device.is_stationary() {
            assert!(device.speed <= 89);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn the_runner_stops_cleanly_on_shutdown() {
    let world = seeded_world().into_shared();
    let (tx, rx) = broadcast::channel(1);
    let handle = SimulationRunner::new(world, 21, Duration::from_secs(5)).spawn(rx);
    tx.send(()).unwrap();
    assert_eq!(handle.await.unwrap(), 0);
}
