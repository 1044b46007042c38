//! # Log Processor Interface
//!
//! The `LogProcessor` interface sits between the SDK's `Logger` and a
//! `LogExporter`. Every record a logger emits is handed to the provider's
//! processor, which decides when and how it reaches the exporter.
//!
//! ## Diagram
//!
//! ```ascii
//!   +-----+---------------+   +-----------------------+   +-------------------+
//!   |     |               |   |                       |   |                   |
//!   | SDK | Logger.emit() +---> (Simple)LogProcessor  +--->  LogExporter      |
//!   +-----+---------------+   +-----------------------+   +-------------------+
//! ```
//!
//! A processor is either active or shut down. Shutdown is final: later
//! records are dropped and reported through the diagnostic registry.

use std::fmt::Debug;
use std::time::Duration;

use telemetry_logs::logs::LogRecord;

use crate::error::SdkResult;

/// Timeout used by [`LogProcessor::force_flush`] and
/// [`LogProcessor::shutdown`].
pub const DEFAULT_PROCESSOR_TIMEOUT: Duration = Duration::from_secs(5);

/// The interface for plugging into a [`SdkLogger`].
///
/// [`SdkLogger`]: crate::logs::SdkLogger
pub trait LogProcessor: Send + Sync + Debug {
    /// Called when a log record is ready to be processed and exported.
    ///
    /// The processor takes ownership of the record. It must not block
    /// indefinitely and must never panic. Failures are reported through the
    /// diagnostic registry, not to the caller. After shutdown this is a no-op.
    fn emit(&self, record: LogRecord);

    /// Exports every record received so far, waiting at most `timeout`.
    ///
    /// Returns `Ok` only when all of them were accepted by the exporter.
    fn force_flush_with_timeout(&self, timeout: Duration) -> SdkResult;

    /// Same as [`force_flush_with_timeout`](Self::force_flush_with_timeout)
    /// with [`DEFAULT_PROCESSOR_TIMEOUT`].
    fn force_flush(&self) -> SdkResult {
        self.force_flush_with_timeout(DEFAULT_PROCESSOR_TIMEOUT)
    }

    /// Flushes, then shuts down the processor and its exporter, waiting at
    /// most `timeout`.
    ///
    /// Calling it again has no further effect and returns the outcome of
    /// the first call.
    fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult;

    /// Same as [`shutdown_with_timeout`](Self::shutdown_with_timeout) with
    /// [`DEFAULT_PROCESSOR_TIMEOUT`].
    fn shutdown(&self) -> SdkResult {
        self.shutdown_with_timeout(DEFAULT_PROCESSOR_TIMEOUT)
    }
}
