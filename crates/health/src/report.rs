//! The four read-only health projections built from a [`HealthSnapshot`].
//!
//! Field names follow the console's JSON contract.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::aggregate::{Classification, HealthSnapshot};
use crate::metrics::{MemoryUsage, ProcessMetrics};
use crate::probe::TargetKind;

/// `{ "success": bool }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Whether the check passed.
    pub success: bool,
}

// ── Network ─────────────────────────────────────────────────────────────

/// Latency grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyGrade {
    /// Under 50 ms.
    Good,
    /// Under 100 ms.
    Warning,
    /// 100 ms or more.
    Poor,
}

impl LatencyGrade {
    /// Grade a latency in milliseconds.
    pub fn of(latency_ms: u64) -> Self {
        match latency_ms {
            0..50 => Self::Good,
            50..100 => Self::Warning,
            _ => Self::Poor,
        }
    }
}

/// Measured network latency with its grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkStatus {
    /// Milliseconds.
    pub latency_ms: u64,
    /// Grade of `latency_ms`.
    pub status: LatencyGrade,
}

impl NetworkStatus {
    /// Latency measured from `snapshot`.
    pub fn from_snapshot(snapshot: &HealthSnapshot) -> Self {
        let latency_ms = snapshot.latency_ms();
        Self {
            latency_ms,
            status: LatencyGrade::of(latency_ms),
        }
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn checks(snapshot: &HealthSnapshot, kind: TargetKind) -> BTreeMap<String, Check> {
    snapshot
        .of_kind(kind)
        .map(|r| (r.target.clone(), Check { success: r.success }))
        .collect()
}

fn flags(snapshot: &HealthSnapshot, kind: TargetKind) -> BTreeMap<String, bool> {
    snapshot
        .of_kind(kind)
        .map(|r| (r.target.clone(), r.success))
        .collect()
}

// ── Live ────────────────────────────────────────────────────────────────

/// Status, process metrics, and measured latency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveHealth {
    /// Overall verdict.
    pub status: Classification,
    /// Process uptime in seconds.
    pub uptime: f64,
    /// Process memory.
    pub memory: MemoryUsage,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    /// Measured latency.
    pub network: NetworkStatus,
}

impl LiveHealth {
    /// Project `snapshot` with a metrics sample taken at `now`.
    pub fn from_snapshot(
        snapshot: &HealthSnapshot,
        metrics: ProcessMetrics,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status: snapshot.classification(),
            uptime: metrics.uptime,
            memory: metrics.memory,
            timestamp: timestamp(now),
            network: NetworkStatus::from_snapshot(snapshot),
        }
    }
}

// ── Detailed ────────────────────────────────────────────────────────────

/// `{ "overall_status": .. }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Overall verdict.
    pub overall_status: Classification,
}

/// Per-target pass/fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedHealth {
    /// Verdict.
    pub summary: Summary,
    /// Database checks keyed by alias.
    pub database: BTreeMap<String, Check>,
    /// Printer checks keyed by id.
    pub printers: BTreeMap<String, Check>,
}

impl DetailedHealth {
    /// Project `snapshot`.
    pub fn from_snapshot(snapshot: &HealthSnapshot) -> Self {
        Self {
            summary: Summary {
                overall_status: snapshot.classification(),
            },
            database: checks(snapshot, TargetKind::Database),
            printers: checks(snapshot, TargetKind::Printer),
        }
    }
}

// ── Report ──────────────────────────────────────────────────────────────

/// Verdict with counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Overall verdict.
    pub overall_status: Classification,
    /// Number of probes.
    pub total_checks: usize,
    /// Number of successful probes.
    pub passed_checks: usize,
}

/// `{ "connection": { "success": .. } }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrinterDetail {
    /// TCP reachability.
    pub connection: Check,
}

/// Per-target detail of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDetails {
    /// Database checks keyed by alias.
    pub database: BTreeMap<String, Check>,
    /// Printer checks keyed by id.
    pub printers: BTreeMap<String, PrinterDetail>,
}

/// Summary, details, and a generation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    /// Verdict with counts.
    pub summary: ReportSummary,
    /// Per-target detail.
    pub details: ReportDetails,
    /// Always empty for now.
    pub recommendations: Vec<String>,
    /// RFC 3339, UTC, millisecond precision.
    pub generated: String,
}

impl DiagnosticReport {
    /// Project `snapshot`, stamped with `now`.
    pub fn from_snapshot(snapshot: &HealthSnapshot, now: DateTime<Utc>) -> Self {
        let printers = snapshot
            .of_kind(TargetKind::Printer)
            .map(|r| {
                (
                    r.target.clone(),
                    PrinterDetail {
                        connection: Check { success: r.success },
                    },
                )
            })
            .collect();
        Self {
            summary: ReportSummary {
                overall_status: snapshot.classification(),
                total_checks: snapshot.total(),
                passed_checks: snapshot.passed(),
            },
            details: ReportDetails {
                database: checks(snapshot, TargetKind::Database),
                printers,
            },
            recommendations: Vec::new(),
            generated: timestamp(now),
        }
    }
}

// ── Full ────────────────────────────────────────────────────────────────

/// `{ "latency_ms": .. }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Latency {
    /// Milliseconds.
    pub latency_ms: u64,
}

/// Flat booleans per target plus measured latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullDiagnostics {
    /// Database reachability keyed by alias.
    pub database: BTreeMap<String, bool>,
    /// Printer reachability keyed by id.
    pub printers: BTreeMap<String, bool>,
    /// Measured latency.
    pub network: Latency,
    /// Overall verdict; not part of the JSON shape.
    #[serde(skip)]
    pub status: Classification,
}

impl FullDiagnostics {
    /// Project `snapshot`.
    pub fn from_snapshot(snapshot: &HealthSnapshot) -> Self {
        Self {
            status: snapshot.classification(),
            database: flags(snapshot, TargetKind::Database),
            printers: flags(snapshot, TargetKind::Printer),
            network: Latency {
                latency_ms: snapshot.latency_ms(),
            },
        }
    }
}
