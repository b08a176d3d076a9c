//! Process uptime and memory, sampled for the live health view.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Memory held by this process, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    /// Resident set size.
    pub rss_bytes: u64,
    /// Virtual memory size.
    pub virtual_bytes: u64,
}

/// One sample of process metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessMetrics {
    /// Seconds since the process started.
    pub uptime: f64,
    /// Current memory usage.
    pub memory: MemoryUsage,
}

/// Samples the current process on demand.
pub struct MetricsSampler {
    started: Instant,
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl MetricsSampler {
    /// Uptime is anchored at process start, as reported by the OS.
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid().ok();
        let mut system = System::new();
        let age = pid
            .and_then(|pid| {
                system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                system.process(pid).map(|p| Duration::from_secs(p.run_time()))
            })
            .unwrap_or_default();
        Self::with_age(age, pid, system)
    }

    fn with_age(age: Duration, pid: Option<Pid>, system: System) -> Self {
        let now = Instant::now();
        Self {
            started: now.checked_sub(age).unwrap_or(now),
            pid,
            system: Mutex::new(system),
        }
    }

    /// Current uptime and memory. Memory reads as zero where the platform
    /// does not report it.
    pub fn sample(&self) -> ProcessMetrics {
        ProcessMetrics {
            uptime: self.started.elapsed().as_secs_f64(),
            memory: self.memory(),
        }
    }

    fn memory(&self) -> MemoryUsage {
        let Some(pid) = self.pid else {
            return MemoryUsage::default();
        };
        let mut system = self.system.lock();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system
            .process(pid)
            .map(|p| MemoryUsage {
                rss_bytes: p.memory(),
                virtual_bytes: p.virtual_memory(),
            })
            .unwrap_or_default()
    }
}

impl Default for MetricsSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_this_process() {
        let sampler = MetricsSampler::new();
        let m = sampler.sample();
        assert!(m.uptime >= 0.0);
        if cfg!(target_os = "linux") {
            assert!(m.memory.rss_bytes > 0);
        }
    }

    #[test]
    fn uptime_counts_from_process_start() {
        let sampler = MetricsSampler::with_age(Duration::from_secs(90), None, System::new());
        let m = sampler.sample();
        assert!(m.uptime >= 90.0, "{}", m.uptime);
        assert!(m.uptime < 95.0, "{}", m.uptime);
        assert_eq!(m.memory, MemoryUsage::default());
    }

    #[test]
    fn memory_field_names() {
        let v = serde_json::to_value(MemoryUsage {
            rss_bytes: 1,
            virtual_bytes: 2,
        })
        .unwrap();
        assert_eq!(v, serde_json::json!({"rss_bytes": 1, "virtual_bytes": 2}));
    }
}
