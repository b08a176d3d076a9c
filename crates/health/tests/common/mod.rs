//! Shared fixtures: an in-memory database and emulator-backed configs.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use labeldesk_health::{ConsoleConfig, DatabaseClient, DbError, PrinterEntry, QueryResult};
use labeldesk_print_client::{PrinterEmulator, RunningEmulator};

/// How the fake database behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Up,
    Down,
    Hang,
}

/// In-memory database that records every statement.
pub struct FakeDb {
    mode: Mode,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeDb {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: Mutex::new(Vec::new()),
        })
    }

    async fn behave(&self, database: &str) -> Result<(), DbError> {
        match self.mode {
            Mode::Up => Ok(()),
            Mode::Down => Err(DbError::Timeout {
                database: database.to_string(),
                timeout: Duration::from_millis(1),
            }),
            Mode::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl DatabaseClient for FakeDb {
    async fn ping(&self, database: &str) -> Result<(), DbError> {
        self.calls.lock().push((database.to_string(), "PING".into()));
        self.behave(database).await
    }

    async fn query(&self, database: &str, sql: &str) -> Result<QueryResult, DbError> {
        self.calls.lock().push((database.to_string(), sql.to_string()));
        self.behave(database).await?;
        let result = if sql.contains("information_schema.tables") {
            QueryResult {
                columns: vec!["table_schema".into(), "table_name".into(), "table_type".into()],
                rows: vec![
                    row(&["public", "orders", "BASE TABLE"]),
                    row(&["public", "products", "BASE TABLE"]),
                ],
            }
        } else if sql.contains("AS ok") {
            QueryResult {
                columns: vec!["ok".into()],
                rows: vec![vec![json!(1)]],
            }
        } else {
            QueryResult {
                columns: vec!["id".into(), "name".into()],
                rows: vec![vec![json!(7), json!("Widget")]],
            }
        };
        Ok(result)
    }
}

fn row(cells: &[&str]) -> Vec<Value> {
    cells.iter().map(|c| json!(c)).collect()
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub async fn emulator(name: &str, model: &str) -> RunningEmulator {
    PrinterEmulator::new(name, model)
        .spawn("127.0.0.1:0")
        .await
        .unwrap()
}

/// Default config with both printers pointed at loopback ports.
pub fn config_with_ports(zebra1: u16, zebra2: u16) -> ConsoleConfig {
    let mut cfg = ConsoleConfig::default();
    for (id, port) in [("zebra-1", zebra1), ("zebra-2", zebra2)] {
        let entry: &mut PrinterEntry = cfg.printers.get_mut(id).unwrap();
        entry.host = "127.0.0.1".into();
        entry.port = port;
    }
    cfg
}
