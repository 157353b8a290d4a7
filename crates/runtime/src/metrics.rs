use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Run-wide counters. Cloning shares the same counters, so a registry can be
/// handed to every source that takes part in a run.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    files_opened: AtomicU64,
    records_read: AtomicU64,
    reports_rendered: AtomicU64,
    reports_skipped: AtomicU64,
    fragments_written: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_files_opened(&self, delta: u64) {
        self.inner.files_opened.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_records_read(&self, delta: u64) {
        self.inner.records_read.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_reports_rendered(&self, delta: u64) {
        self.inner.reports_rendered.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_reports_skipped(&self, delta: u64) {
        self.inner.reports_skipped.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_fragments_written(&self, delta: u64) {
        self.inner.fragments_written.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_opened: self.inner.files_opened.load(Ordering::Relaxed),
            records_read: self.inner.records_read.load(Ordering::Relaxed),
            reports_rendered: self.inner.reports_rendered.load(Ordering::Relaxed),
            reports_skipped: self.inner.reports_skipped.load(Ordering::Relaxed),
            fragments_written: self.inner.fragments_written.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub files_opened: u64,
    pub records_read: u64,
    pub reports_rendered: u64,
    pub reports_skipped: u64,
    pub fragments_written: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct RunTimer {
    start: Instant,
}

impl RunTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsRegistry::default();
        let handle = metrics.clone();
        handle.inc_records_read(3);
        metrics.inc_files_opened(1);
        let snap = metrics.snapshot();
        assert_eq!(snap.records_read, 3);
        assert_eq!(snap.files_opened, 1);
    }

    #[test]
    fn json_line_flattens_counters() {
        let metrics = MetricsRegistry::default();
        metrics.inc_reports_rendered(2);
        let line = metrics.snapshot().to_json_line("plot", Some(Duration::from_millis(5)));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["label"], "plot");
        assert_eq!(value["reports_rendered"], 2);
        assert_eq!(value["elapsed_ms"], 5);
    }
}
