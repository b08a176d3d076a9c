//! End-to-end health projections against emulated printers and a fake
//! database.

mod common;

use std::time::Duration;

use serde_json::json;

use labeldesk_health::{Classification, Console, LatencyGrade, TargetKind};

use common::{FakeDb, Mode, closed_port, config_with_ports, emulator};

#[tokio::test]
async fn everything_up_is_healthy() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let z2 = emulator("ZEBRA-002", "ZT410").await;
    let cfg = config_with_ports(z1.local_addr().port(), z2.local_addr().port());
    let console = Console::with_database(cfg, FakeDb::new(Mode::Up));

    let live = console.live_health().await;
    assert_eq!(live.status, Classification::Healthy);
    assert!(live.uptime >= 0.0);
    assert!(live.timestamp.ends_with('Z'));
    assert_eq!(live.network.status, LatencyGrade::of(live.network.latency_ms));

    let detailed = serde_json::to_value(console.detailed_health().await).unwrap();
    assert_eq!(
        detailed,
        json!({
            "summary": {"overall_status": "HEALTHY"},
            "database": {"wapromag": {"success": true}},
            "printers": {"zebra-1": {"success": true}, "zebra-2": {"success": true}},
        })
    );

    let report = console.diagnostic_report().await;
    assert_eq!(report.summary.total_checks, 3);
    assert_eq!(report.summary.passed_checks, 3);
    assert!(report.recommendations.is_empty());

    let full = serde_json::to_value(console.full_diagnostics().await).unwrap();
    assert_eq!(full["database"], json!({"wapromag": true}));
    assert_eq!(full["printers"], json!({"zebra-1": true, "zebra-2": true}));
    assert!(full["network"]["latency_ms"].is_u64());
}

#[tokio::test]
async fn one_printer_down_degrades() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let cfg = config_with_ports(z1.local_addr().port(), closed_port().await);
    let console = Console::with_database(cfg, FakeDb::new(Mode::Up));

    let report = serde_json::to_value(console.diagnostic_report().await).unwrap();
    assert_eq!(report["summary"]["overall_status"], "DEGRADED");
    assert_eq!(report["summary"]["total_checks"], 3);
    assert_eq!(report["summary"]["passed_checks"], 2);
    assert_eq!(
        report["details"]["printers"],
        json!({
            "zebra-1": {"connection": {"success": true}},
            "zebra-2": {"connection": {"success": false}},
        })
    );
    assert_eq!(report["details"]["database"], json!({"wapromag": {"success": true}}));
}

#[tokio::test]
async fn hanging_database_resolves_at_the_bound() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let z2 = emulator("ZEBRA-002", "ZT410").await;
    let mut cfg = config_with_ports(z1.local_addr().port(), z2.local_addr().port());
    cfg.timeouts.detailed = Duration::from_millis(200);
    let console = Console::with_database(cfg, FakeDb::new(Mode::Hang));

    let started = std::time::Instant::now();
    let detailed = console.detailed_health().await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
    assert_eq!(detailed.summary.overall_status, Classification::Degraded);
    assert!(!detailed.database["wapromag"].success);
    assert!(detailed.printers.values().all(|c| c.success));
}

#[tokio::test]
async fn total_outage_is_still_well_formed() {
    let cfg = config_with_ports(closed_port().await, closed_port().await);
    let console = Console::with_database(cfg, FakeDb::new(Mode::Down));

    let full = serde_json::to_value(console.full_diagnostics().await).unwrap();
    assert_eq!(full["database"], json!({"wapromag": false}));
    assert_eq!(full["printers"], json!({"zebra-1": false, "zebra-2": false}));

    let live = console.live_health().await;
    assert_eq!(live.status, Classification::Degraded);
}

#[tokio::test]
async fn preflight_probes_the_configured_database() {
    let db = FakeDb::new(Mode::Up);
    let cfg = config_with_ports(closed_port().await, closed_port().await);
    let console = Console::with_database(cfg, db.clone());

    let snapshot = console.preflight().await;
    assert_eq!(snapshot.total(), 3);
    assert!(snapshot.get(TargetKind::Database, "wapromag").unwrap().success);
    assert!(!snapshot.get(TargetKind::Printer, "zebra-1").unwrap().success);
    assert_eq!(
        db.calls.lock().as_slice(),
        [("wapromag_test".to_string(), "PING".to_string())]
    );
}

#[tokio::test]
async fn probes_cover_database_then_printers() {
    let console = Console::with_database(config_with_ports(1, 2), FakeDb::new(Mode::Up));
    let targets: Vec<_> = console
        .probes()
        .iter()
        .map(|p| (p.kind(), p.target().to_string()))
        .collect();
    assert_eq!(
        targets,
        [
            (TargetKind::Database, "wapromag".to_string()),
            (TargetKind::Printer, "zebra-1".to_string()),
            (TargetKind::Printer, "zebra-2".to_string()),
        ]
    );
}
