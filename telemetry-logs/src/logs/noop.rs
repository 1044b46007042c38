use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::logs::{LogRecord, Logger, LoggerProvider};

/// Name reported by every [`NoopLogger`].
pub const NOOP_LOGGER_NAME: &str = "noop logger";

static NOOP_LOGGER: Lazy<Arc<NoopLogger>> = Lazy::new(|| Arc::new(NoopLogger(())));

/// A no-op implementation of a [`LoggerProvider`].
#[derive(Clone, Debug, Default)]
pub struct NoopLoggerProvider(());

impl NoopLoggerProvider {
    /// Create a new no-op logger provider.
    pub fn new() -> Self {
        NoopLoggerProvider(())
    }
}

impl LoggerProvider for NoopLoggerProvider {
    fn logger_with_args(&self, _name: &str, _args: &[&str]) -> Arc<dyn Logger> {
        NoopLogger::shared()
    }
}

/// A no-op implementation of a [`Logger`]. Every emitted record is dropped.
#[derive(Clone, Debug)]
pub struct NoopLogger(());

impl NoopLogger {
    /// The process-wide shared no-op logger.
    pub fn shared() -> Arc<dyn Logger> {
        NOOP_LOGGER.clone()
    }
}

impl Logger for NoopLogger {
    fn name(&self) -> &str {
        NOOP_LOGGER_NAME
    }

    fn emit(&self, _record: LogRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_provider_hands_out_the_shared_instance() {
        let provider = NoopLoggerProvider::new();
        let a = provider.logger("a");
        let b = provider.logger_with_args("b", &["ignored"]);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), NOOP_LOGGER_NAME);
        a.log("dropped");
    }
}
