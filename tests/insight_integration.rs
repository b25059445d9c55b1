//! ---
//! tfy_section: "06-testing"
//! tfy_subsection: "integration"
//! tfy_type: "source"
//! tfy_scope: "test"
//! tfy_description: "Advisory-text adapter behaviour against failing backends."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use chrono::Utc;
use trackify_common::config::{AppConfig, InsightConfig};
use trackify_core::FleetWorld;
use trackify_insight::{prompt, InsightAdvisor, InsightPanel, FALLBACK_TEXT};

fn busy_world() -> FleetWorld {
    let mut world = FleetWorld::from_seeds(&AppConfig::default().devices, Utc::now());
    let now = Utc::now();
    world.raise_speed_violation("TRK-4421", "Service Van 4", 52, 45, now);
    world.toggle_sos("TRK-9901", now);
    world
}

#[test]
fn the_prompt_embeds_the_abbreviated_snapshot() {
    let snapshot = busy_world().snapshot();
    let text = prompt::user_prompt(&snapshot);

    assert!(text.starts_with(prompt::USER_INSTRUCTION));
    // Abbreviated device fields only: name/status/battery/speed/speedLimit.
    assert!(text.contains("\"Service Van 4\""));
    assert!(text.contains("\"speedLimit\":45"));
    assert!(!text.contains("\"lat\""));
    // The five most recent alerts ride along verbatim.
    assert!(text.contains("EMERGENCY SOS SIGNAL RECEIVED!"));
    assert!(text.contains("Speed Violation: 52km/h (Limit: 45)"));
}

#[tokio::test]
async fn a_dead_backend_degrades_to_the_fixed_fallback() {
    std::env::set_var("TRACKIFY_ITEST_KEY", "integration-test-key");
    let advisor = InsightAdvisor::new(InsightConfig {
        endpoint: "http://127.0.0.1:9".to_owned(),
        api_key_env: "TRACKIFY_ITEST_KEY".to_owned(),
        ..InsightConfig::default()
    });

    let snapshot = busy_world().snapshot();
    assert_eq!(advisor.advise(&snapshot).await, FALLBACK_TEXT);
}

#[tokio::test]
async fn a_missing_api_key_never_reaches_the_network() {
    let advisor = InsightAdvisor::new(InsightConfig {
        api_key_env: "TRACKIFY_ITEST_KEY_ABSENT".to_owned(),
        ..InsightConfig::default()
    });
    let snapshot = busy_world().snapshot();
    assert_eq!(advisor.advise(&snapshot).await, FALLBACK_TEXT);
}

#[tokio::test]
async fn overlapping_refreshes_resolve_last_write_wins() {
    std::env::set_var("TRACKIFY_ITEST_KEY_RACE", "integration-test-key");
    let advisor = InsightAdvisor::new(InsightConfig {
        endpoint: "http://127.0.0.1:9".to_owned(),
        api_key_env: "TRACKIFY_ITEST_KEY_RACE".to_owned(),
        ..InsightConfig::default()
    });
    let panel = InsightPanel::new("Analyzing fleet data...");
    let snapshot = busy_world().snapshot();

    // Two requests in flight; the older completion must not clobber the
    // newer request's slot.
    let first = panel.begin("Refreshing insights...");
    let second = panel.begin("Refreshing insights...");

    let first_text = advisor.advise(&snapshot).await;
    let second_text = advisor.advise(&snapshot).await;

    assert!(panel.apply(second, second_text));
    assert!(!panel.apply(first, first_text));
    assert_eq!(panel.text(), FALLBACK_TEXT);
}
