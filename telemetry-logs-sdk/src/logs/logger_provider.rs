use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use telemetry_logs::global::{self, DiagnosticRegistry};
use telemetry_logs::logs::{Logger, LoggerProvider, NoopLogger};
use telemetry_logs::{diag_debug, diag_info, diag_warn};

use super::config::Config;
use super::{LogExporter, LogProcessor, SdkLogger, SimpleLogProcessor, DEFAULT_PROCESSOR_TIMEOUT};
use crate::error::{SdkError, SdkResult};

#[derive(Debug, Clone)]
/// Handles the creation and coordination of [`Logger`]s.
///
/// Loggers are cached by name: asking twice for the same name returns the
/// same instance. The cache holds at most
/// [`max_logger_count`](Self::max_logger_count) loggers; once it is full,
/// requests for new names get the shared [`NoopLogger`] instead.
///
/// All loggers created by a `SdkLoggerProvider` hand their records to the
/// provider's current [`LogProcessor`]. This is a clonable handle: cloning it
/// creates a new reference, not a new provider. Dropping the last reference
/// shuts the provider down, which can also be done explicitly with
/// [`shutdown`](SdkLoggerProvider::shutdown).
///
/// ```
/// use std::sync::Arc;
/// use telemetry_logs::logs::{Logger, LoggerProvider};
/// use telemetry_logs_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider};
///
/// let provider = SdkLoggerProvider::builder()
///     .with_simple_exporter(InMemoryLogExporter::default())
///     .build();
///
/// let a = provider.logger("orders");
/// let b = provider.logger_with_args("orders", &["ignored"]);
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct SdkLoggerProvider {
    inner: Arc<LoggerProviderInner>,
}

impl LoggerProvider for SdkLoggerProvider {
    fn logger_with_args(&self, name: &str, _args: &[&str]) -> Arc<dyn Logger> {
        // If the provider is shutdown, new loggers are no-ops.
        if self.inner.is_shutdown() {
            diag_debug!(
                registry: self.inner.diagnostics,
                "LoggerProvider.NoOpLoggerReturned: provider is shut down",
                logger_name = name.to_owned()
            );
            return NoopLogger::shared();
        }

        let mut cache = self
            .inner
            .loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(logger) = cache.get(name) {
            return logger;
        }
        if cache.len() >= self.inner.max_logger_count {
            drop(cache);
            diag_debug!(
                registry: self.inner.diagnostics,
                "LoggerProvider.LoggerCacheFull: returning no-op logger",
                logger_name = name.to_owned(),
                max_logger_count = self.inner.max_logger_count
            );
            return NoopLogger::shared();
        }

        let logger = Arc::new(SdkLogger::new(name, Arc::downgrade(&self.inner)));
        cache.insert(name, Arc::clone(&logger));
        drop(cache);
        diag_debug!(
            registry: self.inner.diagnostics,
            "LoggerProvider.NewLoggerReturned",
            logger_name = name.to_owned()
        );
        logger
    }
}

impl SdkLoggerProvider {
    /// Create a new `LoggerProvider` builder.
    pub fn builder() -> LoggerProviderBuilder {
        LoggerProviderBuilder::default()
    }

    /// Replaces the processor. Loggers already handed out use the new
    /// processor for their next record.
    ///
    /// A provider that is already shut down keeps its old processor and
    /// shuts `processor` down right away.
    pub fn set_processor(&self, processor: Arc<dyn LogProcessor>) {
        if self.inner.is_shutdown() {
            diag_warn!(
                registry: self.inner.diagnostics,
                "LoggerProvider.SetProcessor.AlreadyShutdown: processor shut down instead"
            );
            let _ = processor.shutdown();
            return;
        }
        *self
            .inner
            .processor
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(processor);
    }

    /// The current processor, or `None` if none was ever set.
    pub fn processor(&self) -> Option<Arc<dyn LogProcessor>> {
        self.inner.processor()
    }

    /// Number of loggers in the cache.
    pub fn logger_count(&self) -> usize {
        self.inner
            .loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Capacity of the logger cache.
    pub fn max_logger_count(&self) -> usize {
        self.inner.max_logger_count
    }

    /// Flushes the processor, waiting at most `timeout`.
    pub fn force_flush_with_timeout(&self, timeout: Duration) -> SdkResult {
        match self.processor() {
            Some(processor) => processor.force_flush_with_timeout(timeout),
            None => Ok(()),
        }
    }

    /// Flushes the processor with the default timeout.
    pub fn force_flush(&self) -> SdkResult {
        self.force_flush_with_timeout(DEFAULT_PROCESSOR_TIMEOUT)
    }

    /// Shuts down this `LoggerProvider` and its processor, waiting at most
    /// `timeout`. A second call returns [`SdkError::AlreadyShutdown`].
    pub fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult {
        diag_debug!(
            registry: self.inner.diagnostics,
            "LoggerProvider.ShutdownInvokedByUser"
        );
        if self
            .inner
            .is_shutdown
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.inner.shutdown_processor(timeout)
        } else {
            Err(SdkError::AlreadyShutdown)
        }
    }

    /// Shuts down this `LoggerProvider` with the default timeout.
    pub fn shutdown(&self) -> SdkResult {
        self.shutdown_with_timeout(DEFAULT_PROCESSOR_TIMEOUT)
    }
}

/// Name-keyed arena of loggers. Entries are never evicted.
#[derive(Debug, Default)]
struct LoggerCache {
    arena: Vec<Arc<SdkLogger>>,
    index: HashMap<String, usize>,
}

impl LoggerCache {
    fn get(&self, name: &str) -> Option<Arc<dyn Logger>> {
        let slot = *self.index.get(name)?;
        let logger: Arc<dyn Logger> = self.arena[slot].clone();
        Some(logger)
    }

    fn insert(&mut self, name: &str, logger: Arc<SdkLogger>) {
        self.index.insert(name.to_owned(), self.arena.len());
        self.arena.push(logger);
    }

    fn len(&self) -> usize {
        self.arena.len()
    }
}

#[derive(Debug)]
pub(crate) struct LoggerProviderInner {
    processor: RwLock<Option<Arc<dyn LogProcessor>>>,
    loggers: Mutex<LoggerCache>,
    max_logger_count: usize,
    is_shutdown: AtomicBool,
    diagnostics: Arc<DiagnosticRegistry>,
}

impl LoggerProviderInner {
    pub(crate) fn processor(&self) -> Option<Arc<dyn LogProcessor>> {
        self.processor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn diagnostics(&self) -> &DiagnosticRegistry {
        &self.diagnostics
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.is_shutdown.load(Ordering::Relaxed)
    }

    fn shutdown_processor(&self, timeout: Duration) -> SdkResult {
        let Some(processor) = self.processor() else {
            return Ok(());
        };
        let result = processor.shutdown_with_timeout(timeout);
        if let Err(err) = &result {
            diag_debug!(
                registry: self.diagnostics,
                "LoggerProvider.ShutdownError",
                error = err.to_string()
            );
        }
        result
    }
}

impl Drop for LoggerProviderInner {
    fn drop(&mut self) {
        if !self.is_shutdown.swap(true, Ordering::SeqCst) {
            diag_info!(
                registry: self.diagnostics,
                "LoggerProvider.Drop: last reference dropped, initiating shutdown"
            );
            let _ = self.shutdown_processor(DEFAULT_PROCESSOR_TIMEOUT);
        } else {
            diag_debug!(
                registry: self.diagnostics,
                "LoggerProvider.Drop.AlreadyShutdown"
            );
        }
    }
}

#[derive(Debug, Default)]
/// Builder for [`SdkLoggerProvider`].
pub struct LoggerProviderBuilder {
    processor: Option<Arc<dyn LogProcessor>>,
    max_logger_count: Option<usize>,
    diagnostics: Option<Arc<DiagnosticRegistry>>,
}

impl LoggerProviderBuilder {
    /// Uses a [`SimpleLogProcessor`] exporting through `exporter`.
    ///
    /// The processor reports to the registry given to
    /// [`with_diagnostics`](Self::with_diagnostics) if that was called first,
    /// to the global one otherwise.
    pub fn with_simple_exporter<T: LogExporter + 'static>(self, exporter: T) -> Self {
        let processor =
            SimpleLogProcessor::new(exporter).with_diagnostics(self.diagnostics_or_global());
        self.with_log_processor(processor)
    }

    /// Uses `processor` for every logger of the provider. A processor set
    /// later replaces it.
    pub fn with_log_processor<T: LogProcessor + 'static>(self, processor: T) -> Self {
        LoggerProviderBuilder {
            processor: Some(Arc::new(processor)),
            ..self
        }
    }

    /// Capacity of the logger cache. Overrides `OTEL_LOGS_MAX_LOGGER_COUNT`.
    pub fn with_max_logger_count(self, max_logger_count: usize) -> Self {
        LoggerProviderBuilder {
            max_logger_count: Some(max_logger_count),
            ..self
        }
    }

    /// Report the provider's diagnostics to `diagnostics` instead of the
    /// global registry.
    pub fn with_diagnostics(self, diagnostics: Arc<DiagnosticRegistry>) -> Self {
        LoggerProviderBuilder {
            diagnostics: Some(diagnostics),
            ..self
        }
    }

    fn diagnostics_or_global(&self) -> Arc<DiagnosticRegistry> {
        self.diagnostics
            .clone()
            .unwrap_or_else(|| Arc::clone(global::diagnostics()))
    }

    /// Create a new provider from this configuration.
    pub fn build(self) -> SdkLoggerProvider {
        let diagnostics = self.diagnostics_or_global();
        let max_logger_count = self
            .max_logger_count
            .unwrap_or_else(|| Config::default().max_logger_count);

        let logger_provider = SdkLoggerProvider {
            inner: Arc::new(LoggerProviderInner {
                processor: RwLock::new(self.processor),
                loggers: Mutex::new(LoggerCache::default()),
                max_logger_count,
                is_shutdown: AtomicBool::new(false),
                diagnostics,
            }),
        };

        diag_debug!(
            registry: logger_provider.inner.diagnostics,
            "LoggerProvider.Built",
            max_logger_count = max_logger_count
        );
        logger_provider
    }
}
