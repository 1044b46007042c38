//! Result and error types returned by exporters, processors and the provider.
use std::io;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use thiserror::Error;

/// Outcome of [`LogExporter::export`](crate::logs::LogExporter::export).
pub type ExportResult = Result<(), ExportError>;

/// Outcome of [`LogExporter::shutdown`](crate::logs::LogExporter::shutdown).
pub type ShutdownResult = Result<(), ShutdownError>;

/// Outcome of processor and provider flush and shutdown operations.
pub type SdkResult = Result<(), SdkError>;

/// Why an export did not succeed.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum ExportError {
    /// The exporter was shut down before the call.
    #[error("exporter is already shut down")]
    AlreadyShutdown,

    /// The sink rejected the write.
    #[error("I/O error while exporting: {0}")]
    Io(#[source] Arc<io::Error>),

    /// A failure that may go away if the same batch is exported again.
    #[error("transient export failure: {0}")]
    Transient(String),

    /// Any other failure. Retrying will not help.
    #[error("export failed: {0}")]
    Failed(String),
}

impl ExportError {
    /// Whether exporting the same batch again could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExportError::Transient(_) => true,
            ExportError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            ExportError::AlreadyShutdown | ExportError::Failed(_) => false,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(Arc::new(err))
    }
}

/// Why an exporter shutdown did not succeed.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum ShutdownError {
    /// Shutdown did not finish before the deadline.
    #[error("shutdown timed out after {0:?}")]
    Timeout(Duration),

    /// The exporter was already shut down.
    #[error("exporter is already shut down")]
    AlreadyShutdown,

    /// Shutdown failed and cannot be retried.
    #[error("shutdown failed: {0}")]
    Failed(String),
}

/// Why a processor or provider operation did not succeed.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum SdkError {
    /// The component was already shut down.
    #[error("already shut down")]
    AlreadyShutdown,

    /// The operation did not finish before the deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Buffered records could not be exported.
    #[error(transparent)]
    ExportFailed(#[from] ExportError),

    /// The exporter failed to shut down.
    #[error(transparent)]
    Shutdown(ShutdownError),

    /// A broken internal invariant, such as a poisoned lock.
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl From<ShutdownError> for SdkError {
    fn from(err: ShutdownError) -> Self {
        match err {
            ShutdownError::Timeout(timeout) => SdkError::Timeout(timeout),
            ShutdownError::AlreadyShutdown => SdkError::AlreadyShutdown,
            other => SdkError::Shutdown(other),
        }
    }
}

impl<T> From<PoisonError<T>> for SdkError {
    fn from(err: PoisonError<T>) -> Self {
        SdkError::InternalFailure(format!("lock poisoned: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(io::ErrorKind::Interrupted, true)]
    #[case(io::ErrorKind::TimedOut, true)]
    #[case(io::ErrorKind::WouldBlock, true)]
    #[case(io::ErrorKind::BrokenPipe, false)]
    #[case(io::ErrorKind::PermissionDenied, false)]
    fn io_errors_retryable_by_kind(#[case] kind: io::ErrorKind, #[case] retryable: bool) {
        let err = ExportError::from(io::Error::new(kind, "sink"));
        assert_eq!(err.is_retryable(), retryable);
    }

    #[test]
    fn terminal_export_errors_are_not_retryable() {
        assert!(!ExportError::AlreadyShutdown.is_retryable());
        assert!(!ExportError::Failed("bad payload".into()).is_retryable());
        assert!(ExportError::Transient("busy".into()).is_retryable());
    }

    #[test]
    fn shutdown_timeout_maps_to_sdk_timeout() {
        let timeout = Duration::from_millis(10);
        assert!(matches!(
            SdkError::from(ShutdownError::Timeout(timeout)),
            SdkError::Timeout(t) if t == timeout
        ));
        assert!(matches!(
            SdkError::from(ShutdownError::Failed("x".into())),
            SdkError::Shutdown(ShutdownError::Failed(_))
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ExportError::AlreadyShutdown.to_string(),
            "exporter is already shut down"
        );
        assert_eq!(
            SdkError::from(ExportError::Failed("boom".into())).to_string(),
            "export failed: boom"
        );
    }
}
