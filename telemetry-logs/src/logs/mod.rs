//! # Logs API
//!
//! The record model and the traits a logs SDK implements. Applications obtain
//! a [`Logger`] from a [`LoggerProvider`] and emit [`LogRecord`]s through it.
mod logger;
mod noop;
mod record;

pub use logger::{Logger, LoggerProvider};
pub use noop::{NoopLogger, NoopLoggerProvider, NOOP_LOGGER_NAME};
pub use record::{AnyValue, LogRecord, Severity};
