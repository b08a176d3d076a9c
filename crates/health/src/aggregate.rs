//! Concurrent fan-out of probes into one classified snapshot.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use crate::probe::{Probe, ProbeResult, TargetKind, timed_out};

/// Overall verdict of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Every probe succeeded.
    Healthy,
    /// At least one probe failed or timed out.
    Degraded,
}

/// HEALTHY iff every result succeeded.
pub fn classify(results: &[ProbeResult]) -> Classification {
    if results.iter().all(|r| r.success) {
        Classification::Healthy
    } else {
        Classification::Degraded
    }
}

/// Results of one fan-out, in probe order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    /// One entry per probe.
    pub results: Vec<ProbeResult>,
    /// Wall time of the whole fan-out.
    #[serde(skip)]
    pub elapsed: Duration,
}

impl HealthSnapshot {
    /// Verdict over all results.
    pub fn classification(&self) -> Classification {
        classify(&self.results)
    }

    /// Number of probes.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of successful probes.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Results of one kind, in probe order.
    pub fn of_kind(&self, kind: TargetKind) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(move |r| r.kind == kind)
    }

    /// The result for `target` of `kind`.
    pub fn get(&self, kind: TargetKind, target: &str) -> Option<&ProbeResult> {
        self.of_kind(kind).find(|r| r.target == target)
    }

    /// Mean latency of the successful probes, or the fan-out wall time if
    /// none succeeded.
    pub fn latency_ms(&self) -> u64 {
        let ok: Vec<u64> = self
            .results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.latency_ms)
            .collect();
        if ok.is_empty() {
            return millis(self.elapsed);
        }
        let sum: u64 = ok.iter().sum();
        (sum + ok.len() as u64 / 2) / ok.len() as u64
    }
}

/// Run every probe concurrently, each bounded by `limit`, and collect the
/// results. Returns once the slowest probe has finished or timed out.
pub async fn aggregate(probes: &[Arc<dyn Probe>], limit: Duration) -> HealthSnapshot {
    let started = Instant::now();
    let results = join_all(probes.iter().map(|p| run_probe(p.as_ref(), limit))).await;
    let snapshot = HealthSnapshot {
        results,
        elapsed: started.elapsed(),
    };
    debug!(
        total = snapshot.total(),
        passed = snapshot.passed(),
        elapsed_ms = millis(snapshot.elapsed),
        "health fan-out complete"
    );
    snapshot
}

async fn run_probe(probe: &dyn Probe, limit: Duration) -> ProbeResult {
    let started = Instant::now();
    let outcome = match timeout(limit, probe.check(limit)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(timed_out(limit)),
    };
    let latency_ms = millis(started.elapsed());
    let kind = probe.kind();
    let target = probe.target().to_string();
    match outcome {
        Ok(()) => {
            debug!(?kind, %target, latency_ms, "probe ok");
            ProbeResult {
                kind,
                target,
                success: true,
                latency_ms,
                error: None,
            }
        }
        Err(error) => {
            warn!(?kind, %target, latency_ms, %error, "probe failed");
            ProbeResult {
                kind,
                target,
                success: false,
                latency_ms,
                error: Some(error),
            }
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
