// Performance metrics module
//
// Provides lightweight metrics tracking for the cross-thread protocol

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Per-bridge protocol metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Counters are bumped on both the engine and UI sides of the protocol and
/// can be logged on shutdown for analysis.
#[derive(Debug)]
pub struct Metrics {
    /// Runs in which the user confirmed and the engine proceeded
    pub runs_confirmed: AtomicUsize,

    /// Runs cancelled before the transaction started
    pub runs_cancelled: AtomicUsize,

    /// Runs that reached a clean shutdown
    pub runs_completed: AtomicUsize,

    /// Envelopes relayed from the engine thread to the UI thread
    pub messages_relayed: AtomicU64,

    /// Relay faults answered with the safe default response
    pub relay_defaults: AtomicU64,

    /// Lifecycle notifications hopped onto the UI thread
    pub ui_notifications: AtomicU64,

    /// Bridge construction time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            runs_confirmed: AtomicUsize::new(0),
            runs_cancelled: AtomicUsize::new(0),
            runs_completed: AtomicUsize::new(0),
            messages_relayed: AtomicU64::new(0),
            relay_defaults: AtomicU64::new(0),
            ui_notifications: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_run_confirmed(&self) {
        self.runs_confirmed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run_cancelled(&self) {
        self.runs_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_message_relayed(&self) {
        self.messages_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_relay_default(&self) {
        self.relay_defaults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ui_notification(&self) {
        self.ui_notifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the bridge was constructed
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log a metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Embedded UI Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Runs: {} confirmed, {} cancelled, {} completed",
            self.runs_confirmed.load(Ordering::Relaxed),
            self.runs_cancelled.load(Ordering::Relaxed),
            self.runs_completed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Messages: {} relayed, {} answered with the safe default",
            self.messages_relayed.load(Ordering::Relaxed),
            self.relay_defaults.load(Ordering::Relaxed)
        );
        tracing::info!(
            "UI notifications: {}",
            self.ui_notifications.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.runs_confirmed.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.messages_relayed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_run_outcomes() {
        let metrics = Metrics::new();

        metrics.record_run_confirmed();
        metrics.record_run_completed();
        metrics.record_run_cancelled();

        assert_eq!(metrics.runs_confirmed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.runs_completed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.runs_cancelled.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_record_relay_counters() {
        let metrics = Metrics::new();

        metrics.record_message_relayed();
        metrics.record_message_relayed();
        metrics.record_relay_default();
        metrics.record_ui_notification();

        assert_eq!(metrics.messages_relayed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.relay_defaults.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.ui_notifications.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
