//! Health aggregation and operator services for the labeldesk console.
//!
//! Probes the database and every configured printer concurrently, each
//! bounded by its own timeout, and folds the results into one
//! [`HealthSnapshot`]. Four projections (live, detailed, report, full) are
//! derived from a snapshot. The [`Console`] facade also carries the
//! printer and SQL console operations.
//!
//! Probe failures are data, never errors: every projection is well-formed
//! even when every dependency is down.

mod aggregate;
mod config;
mod console;
mod db;
mod error;
mod metrics;
mod printers;
mod probe;
mod report;
mod sql;
mod target;

// ── Convenience re-exports ──────────────────────────────────────────────

// Configuration
pub use config::{ConsoleConfig, DatabaseConfig, ENV_OVERRIDES, PrinterEntry, ProbeTimeouts};
pub use target::{DatabaseTarget, PrinterTarget, resolve_alias};

// Errors
pub use db::DbError;
pub use error::ConsoleError;

// Probing and aggregation
pub use aggregate::{Classification, HealthSnapshot, aggregate, classify};
pub use probe::{DatabaseProbe, DeviceProbe, Probe, ProbeResult, TargetKind};

// Projections
pub use metrics::{MemoryUsage, MetricsSampler, ProcessMetrics};
pub use report::{
    Check, DetailedHealth, DiagnosticReport, FullDiagnostics, Latency, LatencyGrade, LiveHealth,
    NetworkStatus, PrinterDetail, ReportDetails, ReportSummary, Summary,
};

// Services
pub use console::Console;
pub use db::{DatabaseClient, PgClient, QueryResult};
pub use printers::{CommandOutcome, Presence, PresenceReport, PrinterInfo, PrinterService, PrinterStatus};
pub use sql::{CONNECTION_TEST_SQL, LIST_TABLES_SQL, SqlOutcome, SqlService};
