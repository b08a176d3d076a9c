//! The console facade: one shared configuration, one database client, and
//! every operator-facing operation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::aggregate::{HealthSnapshot, aggregate};
use crate::config::ConsoleConfig;
use crate::db::{DatabaseClient, PgClient};
use crate::metrics::MetricsSampler;
use crate::printers::PrinterService;
use crate::probe::{DatabaseProbe, DeviceProbe, Probe, TargetKind};
use crate::report::{DetailedHealth, DiagnosticReport, FullDiagnostics, LiveHealth};
use crate::sql::SqlService;

/// Entry point for health, printer, and SQL operations.
pub struct Console {
    config: Arc<ConsoleConfig>,
    db: Arc<dyn DatabaseClient>,
    metrics: MetricsSampler,
    printers: PrinterService,
    sql: SqlService,
}

impl Console {
    /// Console backed by Postgres pools built from `config`.
    pub fn new(config: ConsoleConfig) -> Self {
        let db = Arc::new(PgClient::new(
            config.database.clone(),
            config.timeouts.database,
        ));
        Self::with_database(config, db)
    }

    /// Console backed by an arbitrary database client.
    pub fn with_database(config: ConsoleConfig, db: Arc<dyn DatabaseClient>) -> Self {
        let config = Arc::new(config);
        Self {
            printers: PrinterService::new(Arc::clone(&config)),
            sql: SqlService::new(Arc::clone(&config), Arc::clone(&db)),
            metrics: MetricsSampler::new(),
            config,
            db,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Printer operations.
    pub fn printers(&self) -> &PrinterService {
        &self.printers
    }

    /// SQL console operations.
    pub fn sql(&self) -> &SqlService {
        &self.sql
    }

    /// The database probe first, then one probe per printer by id.
    pub fn probes(&self) -> Vec<Arc<dyn Probe>> {
        let mut probes: Vec<Arc<dyn Probe>> = vec![Arc::new(DatabaseProbe::new(
            self.config.database_target(),
            Arc::clone(&self.db),
        ))];
        probes.extend(
            self.config
                .printer_targets()
                .into_iter()
                .map(|t| Arc::new(DeviceProbe::new(t)) as Arc<dyn Probe>),
        );
        probes
    }

    /// Probe everything once, each probe bounded by `limit`.
    pub async fn snapshot(&self, limit: Duration) -> HealthSnapshot {
        aggregate(&self.probes(), limit).await
    }

    /// Classification, process metrics, and measured latency.
    pub async fn live_health(&self) -> LiveHealth {
        let snapshot = self.snapshot(self.config.timeouts.live).await;
        LiveHealth::from_snapshot(&snapshot, self.metrics.sample(), Utc::now())
    }

    /// Per-target pass/fail.
    pub async fn detailed_health(&self) -> DetailedHealth {
        let snapshot = self.snapshot(self.config.timeouts.detailed).await;
        DetailedHealth::from_snapshot(&snapshot)
    }

    /// Counts and per-target detail with a timestamp.
    pub async fn diagnostic_report(&self) -> DiagnosticReport {
        let snapshot = self.snapshot(self.config.timeouts.report).await;
        DiagnosticReport::from_snapshot(&snapshot, Utc::now())
    }

    /// Flat booleans and measured latency.
    pub async fn full_diagnostics(&self) -> FullDiagnostics {
        let snapshot = self.snapshot(self.config.timeouts.full).await;
        FullDiagnostics::from_snapshot(&snapshot)
    }

    /// Start-up check. The outcome is logged and returned, never raised.
    pub async fn preflight(&self) -> HealthSnapshot {
        let snapshot = self.snapshot(self.config.timeouts.preflight).await;
        let up = |kind, target: &str| snapshot.get(kind, target).is_some_and(|r| r.success);
        let printers: Vec<String> = snapshot
            .of_kind(TargetKind::Printer)
            .map(|r| format!("{}={}", r.target, r.success))
            .collect();
        info!(
            database = up(TargetKind::Database, &self.config.database.alias),
            printers = %printers.join(" "),
            status = ?snapshot.classification(),
            "preflight"
        );
        snapshot
    }
}
