//! End-to-end classification of decoded snapshots.

use hud_alerts::{AlertKind, AlertResource, compute_alerts, compute_display_alerts};
use hud_core::View;

fn vigoda_view() -> View {
    View::from_json(
        r#"{
        "Resources": [{
            "Name": "vigoda",
            "BuildHistory": [{
                "Edits": ["main.go", "cli.go"],
                "Error": "the build failed!",
                "Log": "...",
                "Warnings": [],
                "StartTime": "2026-02-08T14:23:40Z",
                "FinishTime": "2026-02-08T14:23:45Z"
            }],
            "CrashLog": "",
            "ResourceInfo": {
                "PodCreationTime": "2026-02-08T14:20:00Z",
                "PodStatus": "Running",
                "PodRestarts": 1
            }
        }]
    }"#,
    )
    .expect("valid view")
}

#[test]
fn test_vigoda_existence_set_is_restart_only() {
    let view = vigoda_view();
    let alerts = compute_alerts(&view.resources[0]);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::PodRestart);
    assert_eq!(alerts[0].title, "Restarts:1");
    assert_eq!(alerts[0].message, "");
}

#[test]
fn test_vigoda_display_set_is_restart_then_build() {
    let view = vigoda_view();
    let alerts = compute_display_alerts(&view.resources);
    let kinds: Vec<_> = alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::PodRestart, AlertKind::BuildFailed]);

    let build = &alerts[1];
    assert_eq!(build.title, "vigoda");
    assert_eq!(build.message, "...");
    assert_eq!(build.timestamp, "2026-02-08T14:23:45Z");
}

#[test]
fn test_failed_build_only_is_display_but_not_existence() {
    let view = View::from_json(
        r#"[{"Name": "api", "BuildHistory": [{"Error": "boom", "Log": "go: build failed"}]}]"#,
    )
    .unwrap();
    assert!(compute_alerts(&view.resources[0]).is_empty());

    let shown = compute_display_alerts(&view.resources);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, AlertKind::BuildFailed);
    assert_eq!(shown[0].message, "go: build failed");
}

#[test]
fn test_empty_build_error_is_shown_as_failure() {
    let view = View::from_json(
        r#"[{"Name": "api", "BuildHistory": [{"Error": "", "Log": "log"}]}]"#,
    )
    .unwrap();
    assert!(compute_alerts(&view.resources[0]).is_empty());

    let shown = compute_display_alerts(&view.resources);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, AlertKind::BuildFailed);
    assert_eq!(shown[0].message, "log");
}

#[test]
fn test_status_error_wins_over_restart_and_crash_rebuild() {
    let view = View::from_json(
        r#"[{
            "Name": "worker",
            "BuildHistory": [{"IsCrashRebuild": true}],
            "CrashLog": "stack trace",
            "ResourceInfo": {"PodStatus": "Error", "PodStatusMessage": "crashed", "PodRestarts": 2}
        }]"#,
    )
    .unwrap();
    let shown = compute_display_alerts(&view.resources);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, AlertKind::PodStatusError);
    // Error is a crash status, so the crash log is preferred.
    assert_eq!(shown[0].message, "stack trace");
}

#[test]
fn test_order_follows_resources_not_timestamps() {
    let view = View::from_json(
        r#"[
            {"Name": "b", "BuildHistory": [{"Warnings": ["late"], "FinishTime": "2026-02-09T00:00:00Z"}]},
            {"Name": "a", "BuildHistory": [{"Warnings": ["early"], "FinishTime": "2026-02-01T00:00:00Z"}]}
        ]"#,
    )
    .unwrap();
    let shown = compute_display_alerts(&view.resources);
    let names: Vec<_> = shown.iter().map(|a| a.resource_name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_alert_resource_reports_display_count() {
    let view = vigoda_view();
    let resource = AlertResource::new(view.resources[0].clone());
    assert_eq!(resource.alerts().len(), 1);
    assert_eq!(resource.number_of_alerts(), 2);
    assert!(resource.has_alert());
}

#[test]
fn test_alert_serializes_outbound_shape() {
    let view = vigoda_view();
    let alerts = compute_display_alerts(&view.resources);
    let json = serde_json::to_value(&alerts[1]).unwrap();
    assert_eq!(json["alertType"], "BuildError");
    assert_eq!(json["titleMsg"], "vigoda");
    assert_eq!(json["msg"], "...");
    assert_eq!(json["timestamp"], "2026-02-08T14:23:45Z");
}
