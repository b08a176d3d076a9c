//! Single-target reachability probes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use labeldesk_print_client::{PrintError, PrinterAddr, connect};
use serde::Serialize;

use crate::db::DatabaseClient;
use crate::target::{DatabaseTarget, PrinterTarget};

/// What kind of dependency a probe checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// The database server.
    Database,
    /// A label printer.
    Printer,
}

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Dependency kind.
    pub kind: TargetKind,
    /// Stable target key (database alias or printer id).
    pub target: String,
    /// Whether the target answered in time.
    pub success: bool,
    /// Wall time spent on the probe.
    pub latency_ms: u64,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A reachability check against one dependency.
///
/// `check` should honour `limit` itself; the aggregator enforces it again
/// regardless.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Dependency kind.
    fn kind(&self) -> TargetKind;

    /// Stable target key.
    fn target(&self) -> &str;

    /// Probe once. `Err` carries a human-readable reason.
    async fn check(&self, limit: Duration) -> Result<(), String>;
}

/// Opens and immediately closes a TCP connection to a printer.
#[derive(Debug, Clone)]
pub struct DeviceProbe {
    target: PrinterTarget,
}

impl DeviceProbe {
    /// Probe `target`.
    pub fn new(target: PrinterTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Probe for DeviceProbe {
    fn kind(&self) -> TargetKind {
        TargetKind::Printer
    }

    fn target(&self) -> &str {
        &self.target.id
    }

    async fn check(&self, limit: Duration) -> Result<(), String> {
        let addr = PrinterAddr::new(&self.target.host, self.target.port);
        connect(&addr, limit)
            .await
            .map(drop)
            .map_err(|e| describe(&e, limit))
    }
}

/// Elapsed bounds read the same for every probe kind.
fn describe(error: &PrintError, limit: Duration) -> String {
    if error.is_timeout() {
        timed_out(limit)
    } else {
        error.to_string()
    }
}

pub(crate) fn timed_out(limit: Duration) -> String {
    format!("timed out after {} ms", limit.as_millis())
}

/// Pings the configured database.
#[derive(Clone)]
pub struct DatabaseProbe {
    target: DatabaseTarget,
    client: Arc<dyn DatabaseClient>,
}

impl DatabaseProbe {
    /// Probe `target` through `client`.
    pub fn new(target: DatabaseTarget, client: Arc<dyn DatabaseClient>) -> Self {
        Self { target, client }
    }
}

#[async_trait]
impl Probe for DatabaseProbe {
    fn kind(&self) -> TargetKind {
        TargetKind::Database
    }

    fn target(&self) -> &str {
        &self.target.alias
    }

    async fn check(&self, limit: Duration) -> Result<(), String> {
        match tokio::time::timeout(limit, self.client.ping(&self.target.database)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(timed_out(limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer(host: &str) -> PrinterTarget {
        PrinterTarget {
            id: "zebra-1".into(),
            host: host.into(),
            port: 9100,
            display_name: "ZEBRA-001".into(),
            model: "ZT230".into(),
        }
    }

    #[test]
    fn connect_timeouts_read_like_database_timeouts() {
        let limit = Duration::from_millis(800);
        let e = PrintError::ConnectionTimeout {
            addr: "zebra-printer-1:9100".into(),
            timeout: limit,
        };
        assert_eq!(describe(&e, limit), "timed out after 800 ms");
    }

    #[test]
    fn other_failures_keep_their_message() {
        let e = PrintError::ConnectionRefused {
            addr: "127.0.0.1:9".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(describe(&e, Duration::from_millis(800)), "connection refused: 127.0.0.1:9");
    }

    #[tokio::test]
    async fn unknown_printer_host_is_a_lookup_failure() {
        let probe = DeviceProbe::new(printer("no-such-host.invalid"));
        let err = probe.check(Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, "no address found for hostname: no-such-host.invalid");
    }
}
