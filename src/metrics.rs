// Lifecycle metrics
//
// Counters for resolve/load outcomes, logged on shutdown.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Outcome counters shared between the control loop and the binary.
///
/// Atomics, so a single `Arc<Metrics>` can be read from any thread.
#[derive(Debug)]
pub struct Metrics {
    pub resolves_succeeded: AtomicUsize,
    pub resolves_failed: AtomicUsize,
    pub loads_succeeded: AtomicUsize,
    pub loads_failed: AtomicUsize,

    /// Loads refused by the modded-version guard (also counted in `loads_failed`)
    pub modded_rejections: AtomicUsize,

    /// Repaint notifications sent to the shell
    pub repaints: AtomicU64,

    /// Total time spent between scheduling a resolve and its completion
    pub total_resolve_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            resolves_succeeded: AtomicUsize::new(0),
            resolves_failed: AtomicUsize::new(0),
            loads_succeeded: AtomicUsize::new(0),
            loads_failed: AtomicUsize::new(0),
            modded_rejections: AtomicUsize::new(0),
            repaints: AtomicU64::new(0),
            total_resolve_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_resolve(&self, succeeded: bool, elapsed: Duration) {
        if succeeded {
            self.resolves_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.resolves_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.total_resolve_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_load_succeeded(&self) {
        self.loads_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failed(&self) {
        self.loads_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_modded_rejection(&self) {
        self.modded_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repaint(&self) {
        self.repaints.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average resolve time in milliseconds over all finished resolves.
    pub fn avg_resolve_time_ms(&self) -> f64 {
        let total = self.total_resolve_time_ms.load(Ordering::Relaxed);
        let count = self.resolves_succeeded.load(Ordering::Relaxed)
            + self.resolves_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Profile Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Resolves: {} succeeded, {} failed (avg: {:.2}ms)",
            self.resolves_succeeded.load(Ordering::Relaxed),
            self.resolves_failed.load(Ordering::Relaxed),
            self.avg_resolve_time_ms()
        );
        tracing::info!(
            "Loads: {} succeeded, {} failed ({} modded rejections)",
            self.loads_succeeded.load(Ordering::Relaxed),
            self.loads_failed.load(Ordering::Relaxed),
            self.modded_rejections.load(Ordering::Relaxed)
        );
        tracing::info!("Repaints: {}", self.repaints.load(Ordering::Relaxed));
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
