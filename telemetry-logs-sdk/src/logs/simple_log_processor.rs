//! # Simple Log Processor
//! The `SimpleLogProcessor` is one implementation of the `LogProcessor` interface.
//!
//! It forwards each log record to the exporter as soon as it is emitted, as a
//! batch of one. This processor is **synchronous**: the export runs on the
//! thread that emitted the record, and concurrent emitters wait for each
//! other. It is meant for debugging, tests and low-volume pipelines.
//!
//! ## Diagram
//!
//! ```ascii
//!   +-----+---------------+   +-----------------------+   +-------------------+
//!   |     |               |   |                       |   |                   |
//!   | SDK | Logger.emit() +---> (Simple)LogProcessor  +--->  LogExporter      |
//!   +-----+---------------+   +-----------------------+   +-------------------+
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use telemetry_logs::global::{self, DiagnosticRegistry};
use telemetry_logs::logs::LogRecord;
use telemetry_logs::{diag_debug, diag_error, diag_info, diag_warn};

use crate::error::{ExportError, SdkError, SdkResult, ShutdownError};
use crate::logs::{LogBatch, LogExporter, LogProcessor};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::suppression::SuppressionGuard;

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A [`LogProcessor`] that immediately exports log records as they are
/// emitted, in the same thread that emits them.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use telemetry_logs::logs::LoggerProvider;
/// use telemetry_logs_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider, SimpleLogProcessor};
/// use telemetry_logs_sdk::retry::RetryPolicy;
///
/// let exporter = InMemoryLogExporter::default();
/// let processor = SimpleLogProcessor::new(exporter.clone())
///     .with_retry_policy(RetryPolicy::exponential());
/// let provider = SdkLoggerProvider::builder()
///     .with_log_processor(processor)
///     .build();
///
/// provider.logger("app").log("started");
/// ```
#[derive(Debug)]
pub struct SimpleLogProcessor<T: LogExporter> {
    exporter: Mutex<T>,
    is_shutdown: AtomicBool,
    shutdown_result: OnceLock<SdkResult>,
    retry_policy: RetryPolicy,
    diagnostics: Arc<DiagnosticRegistry>,
}

impl<T: LogExporter> SimpleLogProcessor<T> {
    /// Creates a processor exporting through `exporter` with a single
    /// attempt per record, reporting to the global diagnostic registry.
    pub fn new(exporter: T) -> Self {
        SimpleLogProcessor {
            exporter: Mutex::new(exporter),
            is_shutdown: AtomicBool::new(false),
            shutdown_result: OnceLock::new(),
            retry_policy: RetryPolicy::default(),
            diagnostics: Arc::clone(global::diagnostics()),
        }
    }

    /// Retry exports that fail with a retryable error.
    pub fn with_retry_policy(self, retry_policy: RetryPolicy) -> Self {
        SimpleLogProcessor {
            retry_policy,
            ..self
        }
    }

    /// Report failures to `diagnostics` instead of the global registry.
    pub fn with_diagnostics(self, diagnostics: Arc<DiagnosticRegistry>) -> Self {
        SimpleLogProcessor {
            diagnostics,
            ..self
        }
    }

    fn export(&self, exporter: &T, record: LogRecord) -> Result<(), ExportError> {
        if self.retry_policy.attempts() == 1 {
            return exporter.export(LogBatch::from(record));
        }
        retry_with_backoff(
            &self.retry_policy,
            None,
            || {
                exporter.export(LogBatch::from(record.clone())).map_err(|err| {
                    if err.is_retryable() {
                        diag_debug!(
                            registry: self.diagnostics,
                            "SimpleLogProcessor.Export.Retrying",
                            error = err.to_string()
                        );
                    }
                    err
                })
            },
            ExportError::is_retryable,
        )
    }

    // Waits for an in-flight export to release the exporter.
    fn lock_exporter_within(&self, timeout: Duration) -> Result<MutexGuard<'_, T>, SdkError> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            match self.exporter.try_lock() {
                Ok(exporter) => return Ok(exporter),
                Err(TryLockError::Poisoned(err)) => return Err(err.into()),
                Err(TryLockError::WouldBlock) => {
                    let now = Instant::now();
                    let wait = match deadline {
                        Some(deadline) if now >= deadline => {
                            return Err(SdkError::Timeout(timeout));
                        }
                        Some(deadline) => LOCK_POLL_INTERVAL.min(deadline - now),
                        None => LOCK_POLL_INTERVAL,
                    };
                    thread::sleep(wait);
                }
            }
        }
    }

    fn shutdown_exporter(&self, exporter: &T, remaining: Duration, timeout: Duration) -> SdkResult {
        match exporter.shutdown_with_timeout(remaining) {
            Ok(()) => Ok(()),
            // the caller's budget, not what was left of it
            Err(ShutdownError::Timeout(_)) => Err(SdkError::Timeout(timeout)),
            Err(err) => Err(err.into()),
        }
    }
}

impl<T: LogExporter> LogProcessor for SimpleLogProcessor<T> {
    fn emit(&self, record: LogRecord) {
        // Anything the exporter or a diagnostic handler logs on this thread
        // is dropped instead of waiting on the exporter lock held below.
        let _suppressed = SuppressionGuard::enter();

        // noop after shutdown
        if self.is_shutdown.load(Ordering::Relaxed) {
            diag_warn!(
                registry: self.diagnostics,
                "SimpleLogProcessor.Emit.ProcessorShutdown: log record dropped"
            );
            return;
        }

        let result = {
            let Ok(exporter) = self.exporter.lock() else {
                diag_debug!(registry: self.diagnostics, "SimpleLogProcessor.Emit.MutexPoisoning");
                return;
            };
            self.export(&exporter, record)
        };
        if let Err(err) = result {
            diag_error!(
                registry: self.diagnostics,
                format!("SimpleLogProcessor.Emit.ExportError: {err}"),
                attempts = self.retry_policy.attempts()
            );
        }
    }

    fn force_flush_with_timeout(&self, timeout: Duration) -> SdkResult {
        if self.is_shutdown.load(Ordering::Relaxed) {
            return Err(SdkError::AlreadyShutdown);
        }
        // Nothing is buffered; once the exporter is free every record emitted
        // before this call has been handed over.
        self.lock_exporter_within(timeout).map(drop)
    }

    /// Stops accepting records and shuts the exporter down.
    ///
    /// The first outcome of the exporter shutdown is returned by every later
    /// call. A call that times out waiting for an in-flight export is not
    /// remembered: the exporter is still running and a later call shuts it
    /// down.
    fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult {
        if let Some(result) = self.shutdown_result.get() {
            return result.clone();
        }
        let _suppressed = SuppressionGuard::enter();
        self.is_shutdown.store(true, Ordering::Relaxed);

        let start = Instant::now();
        let mut first = false;
        let result = {
            let exporter = self.lock_exporter_within(timeout)?;
            self.shutdown_result
                .get_or_init(|| {
                    first = true;
                    let remaining = timeout.saturating_sub(start.elapsed());
                    self.shutdown_exporter(&exporter, remaining, timeout)
                })
                .clone()
        };
        if first {
            match &result {
                Ok(()) => diag_info!(registry: self.diagnostics, "SimpleLogProcessor.Shutdown"),
                Err(err) => diag_debug!(
                    registry: self.diagnostics,
                    "SimpleLogProcessor.ShutdownError",
                    error = err.to_string()
                ),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExportResult, ShutdownResult};
    use crate::logs::{InMemoryLogExporter, InMemoryLogExporterBuilder, SdkLoggerProvider};
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use telemetry_logs::global::{DiagnosticHandler, DiagnosticLevel, SourceLocation};
    use telemetry_logs::logs::{Logger, LoggerProvider, Severity};
    use telemetry_logs::KeyValue;

    #[derive(Debug, Default)]
    struct CapturingHandler {
        messages: Mutex<Vec<(DiagnosticLevel, String)>>,
    }

    impl DiagnosticHandler for CapturingHandler {
        fn handle(
            &self,
            level: DiagnosticLevel,
            _location: Option<SourceLocation>,
            message: Option<&str>,
            _attributes: &[KeyValue],
        ) {
            self.messages
                .lock()
                .unwrap()
                .push((level, message.unwrap_or_default().to_owned()));
        }
    }

    fn capturing_registry() -> (Arc<DiagnosticRegistry>, Arc<CapturingHandler>) {
        let registry = Arc::new(DiagnosticRegistry::new());
        registry.set_level(DiagnosticLevel::Warning);
        let handler = Arc::new(CapturingHandler::default());
        registry.set_handler(handler.clone());
        (registry, handler)
    }

    /// Fails the first `failures` exports with `error`, then succeeds.
    #[derive(Debug)]
    struct FlakyExporter {
        failures: usize,
        error: ExportError,
        calls: Arc<AtomicUsize>,
    }

    impl LogExporter for FlakyExporter {
        fn export(&self, _batch: LogBatch) -> ExportResult {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(())
            }
        }
    }

    #[derive(Debug)]
    struct StuckShutdownExporter;

    impl LogExporter for StuckShutdownExporter {
        fn export(&self, _batch: LogBatch) -> ExportResult {
            Ok(())
        }

        fn shutdown_with_timeout(&self, timeout: Duration) -> ShutdownResult {
            Err(ShutdownError::Timeout(timeout))
        }
    }

    /// Blocks inside `export` until released.
    #[derive(Debug)]
    struct BlockingExporter {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
        shutdowns: Arc<AtomicUsize>,
    }

    impl BlockingExporter {
        fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
            let (entered_tx, entered_rx) = mpsc::channel();
            let (release_tx, release_rx) = mpsc::channel();
            let exporter = BlockingExporter {
                entered: Mutex::new(entered_tx),
                release: Mutex::new(release_rx),
                shutdowns: Arc::new(AtomicUsize::new(0)),
            };
            (exporter, entered_rx, release_tx)
        }
    }

    impl LogExporter for BlockingExporter {
        fn export(&self, _batch: LogBatch) -> ExportResult {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(())
        }

        fn shutdown_with_timeout(&self, _timeout: Duration) -> ShutdownResult {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Logs through its own provider from inside `export`.
    #[derive(Debug, Clone, Default)]
    struct ReentrantLogExporter {
        logger: Arc<Mutex<Option<Arc<dyn Logger>>>>,
        exported: Arc<AtomicUsize>,
    }

    impl ReentrantLogExporter {
        fn set_logger(&self, logger: Arc<dyn Logger>) {
            *self.logger.lock().unwrap() = Some(logger);
        }
    }

    impl LogExporter for ReentrantLogExporter {
        fn export(&self, batch: LogBatch) -> ExportResult {
            self.exported.fetch_add(batch.len(), Ordering::SeqCst);
            if let Some(logger) = self.logger.lock().unwrap().as_ref() {
                logger.log_with_severity(Severity::Error, "logged while exporting");
            }
            Ok(())
        }
    }

    /// Forwards every diagnostic into a logger of the pipeline it watches.
    #[derive(Debug, Default)]
    struct ForwardingHandler {
        logger: Mutex<Option<Arc<dyn Logger>>>,
        forwarded: AtomicUsize,
    }

    impl DiagnosticHandler for ForwardingHandler {
        fn handle(
            &self,
            _level: DiagnosticLevel,
            _location: Option<SourceLocation>,
            message: Option<&str>,
            _attributes: &[KeyValue],
        ) {
            self.forwarded.fetch_add(1, Ordering::SeqCst);
            if let Some(logger) = self.logger.lock().unwrap().as_ref() {
                logger.log(message.unwrap_or_default());
            }
        }
    }

    fn fast_retry_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            jitter: Duration::ZERO,
        }
    }

    #[test]
    fn emit_exports_immediately() {
        let exporter = InMemoryLogExporter::default();
        let processor = SimpleLogProcessor::new(exporter.clone());

        processor.emit(LogRecord::new().with_body("one"));
        processor.emit(LogRecord::new().with_body("two"));

        let logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].body, "one");
        assert_eq!(logs[1].body, "two");
    }

    #[test]
    fn emit_after_shutdown_is_dropped_and_reported() {
        let (registry, handler) = capturing_registry();
        let exporter = InMemoryLogExporterBuilder::new()
            .keep_records_on_shutdown()
            .build();
        let processor = SimpleLogProcessor::new(exporter.clone()).with_diagnostics(registry);

        processor.shutdown().unwrap();
        processor.emit(LogRecord::new());

        assert!(exporter.get_emitted_logs().unwrap().is_empty());
        let messages = handler.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, DiagnosticLevel::Warning);
        assert!(messages[0].1.contains("ProcessorShutdown"));
    }

    #[test]
    fn export_failure_is_reported_as_error() {
        let (registry, handler) = capturing_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = SimpleLogProcessor::new(FlakyExporter {
            failures: usize::MAX,
            error: ExportError::Failed("rejected".into()),
            calls: calls.clone(),
        })
        .with_diagnostics(registry);

        processor.emit(LogRecord::new());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let messages = handler.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, DiagnosticLevel::Error);
        assert!(messages[0].1.contains("rejected"));
    }

    #[test]
    fn retryable_failures_are_retried() {
        let (registry, handler) = capturing_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = SimpleLogProcessor::new(FlakyExporter {
            failures: 2,
            error: ExportError::Transient("busy".into()),
            calls: calls.clone(),
        })
        .with_retry_policy(fast_retry_policy())
        .with_diagnostics(registry);

        processor.emit(LogRecord::new());

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(handler.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn non_retryable_failures_are_not_retried() {
        let (registry, _handler) = capturing_registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = SimpleLogProcessor::new(FlakyExporter {
            failures: 1,
            error: ExportError::Failed("bad".into()),
            calls: calls.clone(),
        })
        .with_retry_policy(fast_retry_policy())
        .with_diagnostics(registry);

        processor.emit(LogRecord::new());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let exporter = InMemoryLogExporter::default();
        let processor = SimpleLogProcessor::new(exporter.clone());

        assert!(processor.shutdown().is_ok());
        assert!(exporter.is_shutdown());
        assert!(processor.shutdown().is_ok());
        assert!(matches!(
            processor.force_flush(),
            Err(SdkError::AlreadyShutdown)
        ));
    }

    #[test]
    fn second_shutdown_repeats_first_outcome() {
        let processor = SimpleLogProcessor::new(StuckShutdownExporter);
        let timeout = Duration::from_millis(20);

        assert!(matches!(
            processor.shutdown_with_timeout(timeout),
            Err(SdkError::Timeout(t)) if t == timeout
        ));
        assert!(matches!(
            processor.shutdown_with_timeout(Duration::from_secs(1)),
            Err(SdkError::Timeout(t)) if t == timeout
        ));
    }

    #[test]
    fn flush_times_out_while_export_in_flight() {
        let (exporter, entered, release) = BlockingExporter::new();
        let processor = Arc::new(SimpleLogProcessor::new(exporter));

        let emitter = {
            let processor = Arc::clone(&processor);
            thread::spawn(move || processor.emit(LogRecord::new()))
        };
        entered.recv().unwrap();

        let timeout = Duration::from_millis(20);
        assert!(matches!(
            processor.force_flush_with_timeout(timeout),
            Err(SdkError::Timeout(t)) if t == timeout
        ));

        release.send(()).unwrap();
        emitter.join().unwrap();
        assert!(processor.force_flush().is_ok());
    }

    #[test]
    fn shutdown_timed_out_on_busy_exporter_can_be_retried() {
        let (exporter, entered, release) = BlockingExporter::new();
        let shutdowns = Arc::clone(&exporter.shutdowns);
        let processor = Arc::new(SimpleLogProcessor::new(exporter));

        let emitter = {
            let processor = Arc::clone(&processor);
            thread::spawn(move || processor.emit(LogRecord::new()))
        };
        entered.recv().unwrap();

        let timeout = Duration::from_millis(20);
        assert!(matches!(
            processor.shutdown_with_timeout(timeout),
            Err(SdkError::Timeout(t)) if t == timeout
        ));
        assert_eq!(shutdowns.load(Ordering::SeqCst), 0);

        release.send(()).unwrap();
        emitter.join().unwrap();

        assert!(processor.shutdown().is_ok());
        assert!(processor.shutdown().is_ok());
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exporter_logging_through_its_provider_does_not_deadlock() {
        let exporter = ReentrantLogExporter::default();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        exporter.set_logger(provider.logger("exporter-logger"));

        let logger = provider.logger("app");
        let worker = thread::spawn(move || logger.log("outer"));
        worker.join().unwrap();

        // the record logged from inside export is dropped
        assert_eq!(exporter.exported.load(Ordering::SeqCst), 1);

        // the thread is no longer suppressed once emit returns
        provider.logger("app").log("again");
        assert_eq!(exporter.exported.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn handler_forwarding_export_errors_into_the_pipeline_does_not_recurse() {
        let registry = Arc::new(DiagnosticRegistry::new());
        registry.set_level(DiagnosticLevel::Warning);
        let handler = Arc::new(ForwardingHandler::default());
        registry.set_handler(handler.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let provider = SdkLoggerProvider::builder()
            .with_diagnostics(registry)
            .with_simple_exporter(FlakyExporter {
                failures: usize::MAX,
                error: ExportError::Failed("rejected".into()),
                calls: calls.clone(),
            })
            .build();
        *handler.logger.lock().unwrap() = Some(provider.logger("diagnostics"));

        provider.logger("app").log("outer");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(handler.forwarded.load(Ordering::SeqCst), 1);
    }
}
