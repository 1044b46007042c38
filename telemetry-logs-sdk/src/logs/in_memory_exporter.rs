use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use telemetry_logs::logs::LogRecord;

use crate::error::{ExportError, ExportResult, ShutdownResult};
use crate::logs::{LogBatch, LogExporter};

/// An in-memory logs exporter that stores exported records.
///
/// This exporter is useful for testing and debugging purposes. Clones share
/// the same storage, so a clone kept by the test observes what the pipeline
/// exported.
///
/// # Example
/// ```
/// use telemetry_logs::logs::LoggerProvider;
/// use telemetry_logs_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider};
///
/// let exporter = InMemoryLogExporter::default();
/// let provider = SdkLoggerProvider::builder()
///     .with_simple_exporter(exporter.clone())
///     .build();
///
/// provider.logger("app").log("hello");
/// provider.force_flush().unwrap();
///
/// let emitted = exporter.get_emitted_logs().unwrap();
/// assert_eq!(emitted[0].body, "hello");
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryLogExporter {
    logs: Arc<Mutex<Vec<LogRecord>>>,
    is_shutdown: Arc<AtomicBool>,
    should_reset_on_shutdown: bool,
}

impl Default for InMemoryLogExporter {
    fn default() -> Self {
        InMemoryLogExporterBuilder::new().build()
    }
}

/// Builder for [`InMemoryLogExporter`].
#[derive(Debug, Clone)]
pub struct InMemoryLogExporterBuilder {
    reset_on_shutdown: bool,
}

impl Default for InMemoryLogExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogExporterBuilder {
    /// Creates a builder whose exporter forgets its records on shutdown.
    pub fn new() -> Self {
        Self {
            reset_on_shutdown: true,
        }
    }

    /// Keep exported records readable after shutdown.
    pub fn keep_records_on_shutdown(self) -> Self {
        Self {
            reset_on_shutdown: false,
        }
    }

    /// Creates a new instance of `InMemoryLogExporter`.
    pub fn build(&self) -> InMemoryLogExporter {
        InMemoryLogExporter {
            logs: Arc::new(Mutex::new(Vec::new())),
            is_shutdown: Arc::new(AtomicBool::new(false)),
            should_reset_on_shutdown: self.reset_on_shutdown,
        }
    }
}

impl InMemoryLogExporter {
    /// Returns the records exported so far, in export order.
    pub fn get_emitted_logs(&self) -> Result<Vec<LogRecord>, ExportError> {
        self.logs
            .lock()
            .map(|logs| logs.clone())
            .map_err(|e| ExportError::Failed(format!("failed to lock logs: {e}")))
    }

    /// Clears the stored records.
    pub fn reset(&self) {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether [`LogExporter::shutdown`] was called on any clone.
    pub fn is_shutdown(&self) -> bool {
        self.is_shutdown.load(Ordering::Relaxed)
    }
}

impl LogExporter for InMemoryLogExporter {
    fn export(&self, batch: LogBatch) -> ExportResult {
        if self.is_shutdown() {
            return Err(ExportError::AlreadyShutdown);
        }
        let mut logs = self
            .logs
            .lock()
            .map_err(|e| ExportError::Failed(format!("failed to lock logs for export: {e}")))?;
        logs.extend(batch);
        Ok(())
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> ShutdownResult {
        self.is_shutdown.store(true, Ordering::Relaxed);
        if self.should_reset_on_shutdown {
            self.reset();
        }
        Ok(())
    }
}
