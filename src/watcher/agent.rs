//! The agent loop orchestrating scan, diff, build and delivery.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::matcher;
use super::tracker::ChangeTracker;
use crate::config::Config;
use crate::delivery::ReportSink;
use crate::observability::spans;
use crate::report::{Extractor, ReportBuilder};
use crate::Result;

/// Counters for agent activity.
#[derive(Debug, Default)]
pub struct AgentStats {
    pub files_matched: AtomicU64,
    pub files_new: AtomicU64,
    pub reports_delivered: AtomicU64,
    pub extraction_failures: AtomicU64,
    pub delivery_failures: AtomicU64,
    pub scan_errors: AtomicU64,
}

impl AgentStats {
    /// Create a new stats tracker.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get a snapshot of current stats.
    #[must_use]
    pub fn snapshot(&self) -> AgentStatsSnapshot {
        AgentStatsSnapshot {
            files_matched: self.files_matched.load(Ordering::Relaxed),
            files_new: self.files_new.load(Ordering::Relaxed),
            reports_delivered: self.reports_delivered.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            scan_errors: self.scan_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of agent stats.
#[derive(Debug, Clone, Copy)]
pub struct AgentStatsSnapshot {
    pub files_matched: u64,
    pub files_new: u64,
    pub reports_delivered: u64,
    pub extraction_failures: u64,
    pub delivery_failures: u64,
    pub scan_errors: u64,
}

/// The watcher agent: one sequential loop over scan → diff → process → sleep.
///
/// Every stage failure is logged and non-fatal; the loop only exits on
/// shutdown. The known set lives here and nowhere else.
pub struct Agent<E, S> {
    config: Config,
    builder: ReportBuilder<E>,
    sink: S,
    tracker: ChangeTracker,
    stats: Arc<AgentStats>,
}

impl<E: Extractor, S: ReportSink> Agent<E, S> {
    /// Create an agent from a validated config, an extractor and a sink.
    pub fn new(config: Config, extractor: E, sink: S) -> Self {
        let builder = ReportBuilder::new(
            extractor,
            config.camp_id.clone(),
            config.uploader_id.clone(),
            config.stat_range(),
        );

        Self {
            config,
            builder,
            sink,
            tracker: ChangeTracker::new(),
            stats: AgentStats::new(),
        }
    }

    /// Get the stats tracker.
    #[must_use]
    pub fn stats(&self) -> Arc<AgentStats> {
        Arc::clone(&self.stats)
    }

    /// Run the agent until `shutdown` is cancelled.
    ///
    /// A cancellation observed mid-cycle lets the cycle finish; the loop
    /// exits at the next sleep point.
    ///
    /// # Errors
    ///
    /// Currently infallible at runtime; the signature leaves room for fatal
    /// setup errors surfaced by callers.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        tracing::info!(
            root = %self.config.watch_root.display(),
            "Save watcher active"
        );
        tracing::info!(
            camp = %self.config.camp_id,
            uploader = %self.config.uploader_id,
            "Target camp"
        );

        let mut cycle: u64 = 0;

        loop {
            cycle += 1;
            self.run_cycle().instrument(spans::cycle_span(cycle)).await;

            tokio::select! {
                () = tokio::time::sleep(self.config.poll_interval) => {}
                () = shutdown.cancelled() => {
                    tracing::info!(cycles = cycle, "Shutdown requested, watcher exiting");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run one scan → diff → process cycle.
    pub async fn run_cycle(&mut self) {
        let current = match matcher::scan_async(&self.config.watch_root).await {
            Ok(set) => set,
            Err(e) => {
                self.stats.scan_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Scan failed, sleeping until next cycle");
                return;
            }
        };

        self.stats
            .files_matched
            .fetch_add(current.len() as u64, Ordering::Relaxed);

        let new_paths = self.tracker.diff(current);
        if new_paths.is_empty() {
            tracing::debug!("No new saves");
            return;
        }

        self.stats
            .files_new
            .fetch_add(new_paths.len() as u64, Ordering::Relaxed);

        for path in new_paths {
            self.process(&path).await;
        }
    }

    /// Build and submit the report for one newly detected save.
    ///
    /// Failures are logged and skip only this path; under the reference
    /// policy the path stays known, so a failed delivery is never retried.
    async fn process(&mut self, path: &Path) {
        tracing::info!(path = %path.display(), "New save detected");

        let report = match self.builder.build(path) {
            Ok(report) => report,
            Err(e) => {
                self.stats
                    .extraction_failures
                    .fetch_add(1, Ordering::Relaxed);
                tracing::error!(path = %path.display(), error = %e, "Failed to build report");
                return;
            }
        };

        let span = spans::submit_span(&self.config.collection, &report.filename);
        match self.sink.submit(&report).instrument(span).await {
            Ok(id) => {
                self.stats.reports_delivered.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    path = %path.display(),
                    id = %id,
                    camp = %report.camp_id,
                    "Report uploaded"
                );
            }
            Err(e) => {
                self.stats.delivery_failures.fetch_add(1, Ordering::Relaxed);
                if self.config.retry_failed && e.is_transient() {
                    self.tracker.forget(path);
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Delivery failed, will retry next cycle"
                    );
                } else {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "Delivery failed, report dropped"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::ReportSink;
    use crate::error::DeliveryError;
    use crate::report::{MockExtractor, Report, ReportId};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Sink recording submissions, optionally failing the first N of them.
    #[derive(Default)]
    struct RecordingSink {
        submitted: Mutex<Vec<Report>>,
        fail_first: Mutex<Vec<DeliveryError>>,
    }

    impl RecordingSink {
        fn failing_once(error: DeliveryError) -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                fail_first: Mutex::new(vec![error]),
            }
        }

        fn submitted(&self) -> Vec<Report> {
            self.submitted.lock().unwrap().clone()
        }
    }

    impl ReportSink for RecordingSink {
        async fn submit(&self, report: &Report) -> std::result::Result<ReportId, DeliveryError> {
            if let Some(error) = self.fail_first.lock().unwrap().pop() {
                return Err(error);
            }
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(report.clone());
            Ok(ReportId(format!("doc_{}", submitted.len())))
        }
    }

    fn test_config(root: &std::path::Path) -> Config {
        Config {
            watch_root: root.to_path_buf(),
            camp_id: "camp_123".to_string(),
            ..Default::default()
        }
    }

    fn test_agent(
        config: Config,
        sink: Arc<RecordingSink>,
    ) -> Agent<MockExtractor, Arc<RecordingSink>> {
        let extractor = MockExtractor::new(config.stat_range());
        Agent::new(config, extractor, sink)
    }

    #[tokio::test]
    async fn test_new_save_is_reported_once() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let mut agent = test_agent(test_config(tmp.path()), Arc::clone(&sink));

        // Empty root: nothing to report.
        agent.run_cycle().await;
        assert!(sink.submitted().is_empty());

        fs::write(tmp.path().join("a.lsv"), vec![0u8; 1_048_576]).unwrap();
        agent.run_cycle().await;

        let submitted = sink.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].filename, "a.lsv");
        assert_eq!(submitted[0].meta.size, "1.0 MB");

        // Unchanged filesystem: quiet cycle.
        agent.run_cycle().await;
        assert_eq!(sink.submitted().len(), 1);

        let stats = agent.stats().snapshot();
        assert_eq!(stats.files_new, 1);
        assert_eq!(stats.reports_delivered, 1);
    }

    #[tokio::test]
    async fn test_scan_error_is_non_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let sink = Arc::new(RecordingSink::default());
        let mut agent = test_agent(test_config(&missing), Arc::clone(&sink));

        agent.run_cycle().await;

        assert_eq!(agent.stats().snapshot().scan_errors, 1);
        assert!(sink.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delivery_not_retried_by_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.lsv"), b"save").unwrap();

        let sink = Arc::new(RecordingSink::failing_once(DeliveryError::transient(
            "connection reset",
        )));
        let mut agent = test_agent(test_config(tmp.path()), Arc::clone(&sink));

        agent.run_cycle().await;
        assert!(sink.submitted().is_empty());

        // b.lsv is still present but already known: no re-attempt.
        agent.run_cycle().await;
        assert!(sink.submitted().is_empty());
        assert_eq!(agent.stats().snapshot().delivery_failures, 1);
    }

    #[tokio::test]
    async fn test_transient_failure_retried_when_enabled() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.lsv"), b"save").unwrap();

        let sink = Arc::new(RecordingSink::failing_once(DeliveryError::transient(
            "connection reset",
        )));
        let config = Config {
            retry_failed: true,
            ..test_config(tmp.path())
        };
        let mut agent = test_agent(config, Arc::clone(&sink));

        agent.run_cycle().await;
        assert!(sink.submitted().is_empty());

        agent.run_cycle().await;
        assert_eq!(sink.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_permanent_failure_never_retried() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.lsv"), b"save").unwrap();

        let sink = Arc::new(RecordingSink::failing_once(DeliveryError::permanent(
            "401 unauthorized",
        )));
        let config = Config {
            retry_failed: true,
            ..test_config(tmp.path())
        };
        let mut agent = test_agent(config, Arc::clone(&sink));

        agent.run_cycle().await;
        agent.run_cycle().await;
        assert!(sink.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_run_exits_on_shutdown() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let agent = test_agent(test_config(tmp.path()), sink);

        let shutdown = CancellationToken::new();
        shutdown.cancel();

        // Pre-cancelled token: one cycle runs, then the loop exits.
        agent.run(shutdown).await.unwrap();
    }
}
