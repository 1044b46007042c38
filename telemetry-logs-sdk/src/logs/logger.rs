use std::sync::Weak;

use telemetry_logs::diag_debug;
use telemetry_logs::logs::{LogRecord, Logger};

use super::logger_provider::LoggerProviderInner;
use crate::suppression;

#[derive(Debug)]
/// The object for emitting [`LogRecord`]s, handed out by
/// [`SdkLoggerProvider`](super::SdkLoggerProvider).
///
/// A logger does not keep its provider alive. Records emitted after the
/// provider is dropped or shut down are discarded, and so are records
/// emitted on a thread inside a
/// [`SuppressionGuard`](crate::suppression::SuppressionGuard).
pub struct SdkLogger {
    name: String,
    provider: Weak<LoggerProviderInner>,
}

impl SdkLogger {
    pub(crate) fn new(name: &str, provider: Weak<LoggerProviderInner>) -> Self {
        SdkLogger {
            name: name.to_owned(),
            provider,
        }
    }
}

impl Logger for SdkLogger {
    fn name(&self) -> &str {
        &self.name
    }

    /// Hands the record to the provider's current processor.
    fn emit(&self, record: LogRecord) {
        let Some(provider) = self.provider.upgrade() else {
            return;
        };
        if provider.is_shutdown() {
            return;
        }
        if suppression::is_suppressed() {
            suppression::report_suppressed_drop(|| {
                diag_debug!(
                    registry: provider.diagnostics(),
                    "SdkLogger.Emit.Suppressed: record emitted during export dropped",
                    logger_name = self.name.clone()
                );
            });
            return;
        }
        if let Some(processor) = provider.processor() {
            processor.emit(record);
        }
    }
}
