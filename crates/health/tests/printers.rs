//! Printer service against emulated printers.

mod common;

use std::time::Duration;

use serde_json::json;

use labeldesk_health::{Console, ConsoleError, Presence};
use labeldesk_print_client::PrinterState;

use common::{FakeDb, Mode, closed_port, config_with_ports, emulator};

async fn console_with(zebra1: u16, zebra2: u16) -> Console {
    Console::with_database(config_with_ports(zebra1, zebra2), FakeDb::new(Mode::Up))
}

#[tokio::test]
async fn status_all_reports_config_and_connection() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let down = closed_port().await;
    let console = console_with(z1.local_addr().port(), down).await;

    let all = serde_json::to_value(console.printers().status_all().await).unwrap();
    assert_eq!(
        all,
        json!({
            "zebra-1": {
                "host": "127.0.0.1",
                "port": z1.local_addr().port(),
                "printer": "ZEBRA-001",
                "model": "ZT230",
                "connection": {"success": true},
            },
            "zebra-2": {
                "host": "127.0.0.1",
                "port": down,
                "printer": "ZEBRA-002",
                "model": "ZT410",
                "connection": {"success": false},
            },
        })
    );
}

#[tokio::test]
async fn test_and_status() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let console = console_with(z1.local_addr().port(), closed_port().await).await;
    let printers = console.printers();

    assert!(printers.test("zebra-1").await.unwrap().success);
    assert!(!printers.test("zebra-2").await.unwrap().success);

    let up = printers.status("zebra-1").await.unwrap();
    assert!(up.success);
    assert_eq!(up.status, Presence::Online);
    let down = serde_json::to_value(printers.status("zebra-2").await.unwrap()).unwrap();
    assert_eq!(down, json!({"success": true, "status": "offline"}));
}

#[tokio::test]
async fn test_print_completes_a_job() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let console = console_with(z1.local_addr().port(), closed_port().await).await;

    assert!(console.printers().test_print("zebra-1").await.unwrap().success);
    let mut jobs = 0;
    for _ in 0..50 {
        jobs = z1.emulator().snapshot().jobs_printed;
        if jobs == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(jobs, 1);

    assert!(!console.printers().test_print("zebra-2").await.unwrap().success);
}

#[tokio::test]
async fn send_command_captures_reply() {
    let z1 = emulator("ZEBRA-001", "ZT230").await;
    let console = console_with(z1.local_addr().port(), closed_port().await).await;
    let printers = console.printers();

    let pong = printers.send_command("zebra-1", "PING").await.unwrap();
    assert!(pong.success);
    assert_eq!(pong.response.as_deref(), Some("PONG"));

    let silent = printers.send_command("zebra-1", "^XA").await.unwrap();
    assert!(silent.success);
    assert_eq!(silent.response, None);
    assert_eq!(z1.emulator().snapshot().status, PrinterState::Printing);
    assert_eq!(serde_json::to_value(&silent).unwrap(), json!({"success": true}));

    let offline = printers.send_command("zebra-2", "~HS").await.unwrap();
    assert!(!offline.success);
}

#[tokio::test]
async fn request_errors() {
    let console = console_with(closed_port().await, closed_port().await).await;
    let printers = console.printers();

    let err = printers.send_command("zebra-9", "~HS").await.unwrap_err();
    assert!(matches!(err, ConsoleError::UnknownPrinter(ref id) if id == "zebra-9"));
    assert!(err.is_client_error());

    let err = printers.send_command("zebra-1", "   ").await.unwrap_err();
    assert!(matches!(err, ConsoleError::BadRequest(ref m) if m == "Empty command"));

    assert!(matches!(
        printers.test("nope").await,
        Err(ConsoleError::UnknownPrinter(_))
    ));
    assert!(matches!(
        printers.test_print("nope").await,
        Err(ConsoleError::UnknownPrinter(_))
    ));
}

#[tokio::test]
async fn info_reads_identity_status_and_settings() {
    let z2 = emulator("ZEBRA-002", "ZT410").await;
    let console = console_with(closed_port().await, z2.local_addr().port()).await;

    let info = console.printers().info("zebra-2").await.unwrap();
    assert_eq!(info.identity.name, "ZEBRA-002");
    assert_eq!(info.identity.model, "ZT410");
    assert!(info.status.is_ready());
    assert_eq!(info.settings.dpi, 203);

    let err = console.printers().info("zebra-1").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Printer { .. }));
    assert!(!err.is_client_error());
}

#[test]
fn catalogue_is_exposed() {
    let console = Console::with_database(config_with_ports(1, 2), FakeDb::new(Mode::Up));
    assert_eq!(console.printers().commands().host_status, "~HS");
}
