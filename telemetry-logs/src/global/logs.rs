use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::logs::{Logger, LoggerProvider, NoopLoggerProvider};

static GLOBAL_LOGGER_PROVIDER: Lazy<RwLock<Arc<dyn LoggerProvider>>> =
    Lazy::new(|| RwLock::new(Arc::new(NoopLoggerProvider::new())));

/// Returns the currently configured global [`LoggerProvider`].
///
/// Until [`set_logger_provider`] is called this is a
/// [`NoopLoggerProvider`].
pub fn logger_provider() -> Arc<dyn LoggerProvider> {
    GLOBAL_LOGGER_PROVIDER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Returns the logger registered under `name` by the global
/// [`LoggerProvider`].
pub fn logger(name: &str) -> Arc<dyn Logger> {
    logger_provider().logger(name)
}

/// Sets the given [`LoggerProvider`] as the current global provider,
/// returning the provider that was previously set.
///
/// Loggers handed out by the previous provider keep working against it.
pub fn set_logger_provider(new_provider: Arc<dyn LoggerProvider>) -> Arc<dyn LoggerProvider> {
    let mut provider = GLOBAL_LOGGER_PROVIDER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *provider, new_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::{LogRecord, NOOP_LOGGER_NAME};

    #[derive(Debug)]
    struct NamedLogger(String);

    impl Logger for NamedLogger {
        fn name(&self) -> &str {
            &self.0
        }

        fn emit(&self, _record: LogRecord) {}
    }

    #[derive(Debug)]
    struct NamingProvider;

    impl LoggerProvider for NamingProvider {
        fn logger_with_args(&self, name: &str, _args: &[&str]) -> Arc<dyn Logger> {
            Arc::new(NamedLogger(format!("named:{name}")))
        }
    }

    #[test]
    fn set_and_restore_global_provider() {
        let previous = set_logger_provider(Arc::new(NamingProvider));
        assert_eq!(logger("orders").name(), "named:orders");

        let replaced = set_logger_provider(previous);
        assert_eq!(replaced.logger("x").name(), "named:x");
        assert_eq!(logger("orders").name(), NOOP_LOGGER_NAME);
    }
}
