//! Log exporters
use std::fmt::Debug;
use std::time::Duration;

use telemetry_logs::logs::LogRecord;

use crate::error::{ExportResult, ShutdownResult};

/// Upper bound on the attempts an exporter or processor makes for one batch.
pub const MAX_EXPORT_ATTEMPTS: u32 = 3;

/// Timeout used by [`LogExporter::shutdown`].
pub const DEFAULT_EXPORTER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// An owned, ordered group of log records handed to a [`LogExporter`].
///
/// The exporter becomes the final owner of the records and must not keep
/// them past [`LogExporter::export`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBatch {
    records: Vec<LogRecord>,
}

impl LogBatch {
    /// Creates a batch from records in emission order.
    pub fn new(records: Vec<LogRecord>) -> Self {
        LogBatch { records }
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }
}

impl From<Vec<LogRecord>> for LogBatch {
    fn from(records: Vec<LogRecord>) -> Self {
        LogBatch::new(records)
    }
}

impl From<LogRecord> for LogBatch {
    fn from(record: LogRecord) -> Self {
        LogBatch::new(vec![record])
    }
}

impl IntoIterator for LogBatch {
    type Item = LogRecord;
    type IntoIter = std::vec::IntoIter<LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a LogBatch {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// `LogExporter` defines the interface that log exporters should implement.
///
/// An exporter moves to its shut down state once, and from then on every
/// [`export`](LogExporter::export) must fail with
/// [`ExportError::AlreadyShutdown`](crate::error::ExportError::AlreadyShutdown)
/// without touching its sink. Making repeated shutdowns harmless is up to the
/// implementation.
pub trait LogExporter: Send + Sync + Debug {
    /// Exports a batch of log records.
    ///
    /// Called by at most one thread at a time when driven by the SDK's
    /// processors. An implementation may retry internally, up to
    /// [`MAX_EXPORT_ATTEMPTS`] attempts.
    fn export(&self, batch: LogBatch) -> ExportResult;

    /// Shuts down the exporter, waiting at most `timeout`.
    fn shutdown_with_timeout(&self, _timeout: Duration) -> ShutdownResult {
        Ok(())
    }

    /// Shuts down the exporter with [`DEFAULT_EXPORTER_SHUTDOWN_TIMEOUT`].
    fn shutdown(&self) -> ShutdownResult {
        self.shutdown_with_timeout(DEFAULT_EXPORTER_SHUTDOWN_TIMEOUT)
    }
}

impl<T: LogExporter + ?Sized> LogExporter for Box<T> {
    fn export(&self, batch: LogBatch) -> ExportResult {
        (**self).export(batch)
    }

    fn shutdown_with_timeout(&self, timeout: Duration) -> ShutdownResult {
        (**self).shutdown_with_timeout(timeout)
    }
}
