//! Process-wide state: the global [`LoggerProvider`] and the SDK
//! self-diagnostics registry.
//!
//! ## Global logger provider
//!
//! Applications install their provider once at startup and libraries look
//! loggers up by name from anywhere:
//!
//! ```
//! use std::sync::Arc;
//! use telemetry_logs::global;
//! use telemetry_logs::logs::NoopLoggerProvider;
//!
//! let _previous = global::set_logger_provider(Arc::new(NoopLoggerProvider::new()));
//! global::logger("my-component").log("started");
//! ```
//!
//! ## Self-diagnostics
//!
//! SDK components report their own failures through a [`DiagnosticRegistry`].
//! The global registry starts out with the [`DefaultDiagnosticHandler`],
//! which prints to stdout. Replace it before building any provider:
//!
//! ```
//! use std::sync::Arc;
//! use telemetry_logs::global::{self, NoopDiagnosticHandler};
//!
//! global::set_diagnostic_handler(Arc::new(NoopDiagnosticHandler::new()));
//! ```
//!
//! The threshold is read once from [`OTEL_LOG_LEVEL`] (`error`, `warn`,
//! `info` or `debug`; `warn` when unset) and can be changed with
//! [`DiagnosticRegistry::set_level`]. The most verbose level compiled in is
//! chosen with the `max-level-*` cargo features.
//!
//! [`LoggerProvider`]: crate::logs::LoggerProvider
use std::sync::Arc;

use once_cell::sync::Lazy;

mod diagnostics;
mod internal_logging;
mod logs;

#[cfg(feature = "internal-logs")]
pub use diagnostics::TracingDiagnosticHandler;
pub use diagnostics::{
    DefaultDiagnosticHandler, DiagnosticHandler, DiagnosticLevel, DiagnosticRegistry,
    NoopDiagnosticHandler, SourceLocation, OTEL_LOG_LEVEL, OTEL_LOG_LEVEL_DEFAULT,
    STATIC_MAX_LEVEL,
};
pub use logs::{logger, logger_provider, set_logger_provider};

static GLOBAL_DIAGNOSTICS: Lazy<Arc<DiagnosticRegistry>> =
    Lazy::new(|| Arc::new(DiagnosticRegistry::new()));

/// The process-wide [`DiagnosticRegistry`].
pub fn diagnostics() -> &'static Arc<DiagnosticRegistry> {
    &GLOBAL_DIAGNOSTICS
}

/// The handler currently installed in the global registry.
pub fn diagnostic_handler() -> Arc<dyn DiagnosticHandler> {
    diagnostics().handler()
}

/// Install `handler` in the global registry.
pub fn set_diagnostic_handler(handler: Arc<dyn DiagnosticHandler>) {
    diagnostics().set_handler(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_registry_is_a_singleton() {
        assert!(Arc::ptr_eq(diagnostics(), diagnostics()));
    }

    #[test]
    fn default_global_handler_accepts_absent_message() {
        let handler = diagnostic_handler();
        handler.handle(DiagnosticLevel::Error, None, None, &[]);
        handler.handle(
            DiagnosticLevel::Warning,
            Some(SourceLocation::new(file!(), line!())),
            Some("global handler smoke test"),
            &[crate::KeyValue::new("attempt", 1)],
        );
    }
}
