//! # Log SDK
//!
//! [`SdkLoggerProvider`] hands out cached [`SdkLogger`]s whose records flow to
//! a [`LogProcessor`], which forwards them to a [`LogExporter`].
mod config;
mod export;
mod in_memory_exporter;
mod log_processor;
mod logger;
mod logger_provider;
mod simple_log_processor;

pub use config::{Config, MAX_LOGGER_COUNT, OTEL_LOGS_MAX_LOGGER_COUNT};
pub use export::{LogBatch, LogExporter, DEFAULT_EXPORTER_SHUTDOWN_TIMEOUT, MAX_EXPORT_ATTEMPTS};
pub use in_memory_exporter::{InMemoryLogExporter, InMemoryLogExporterBuilder};
pub use log_processor::{LogProcessor, DEFAULT_PROCESSOR_TIMEOUT};
pub use logger::SdkLogger;
pub use logger_provider::{LoggerProviderBuilder, SdkLoggerProvider};
pub use simple_log_processor::SimpleLogProcessor;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use telemetry_logs::logs::{AnyValue, LogRecord, Logger, LoggerProvider, Severity};
    use telemetry_logs::{KeyValue, SpanId, TraceFlags, TraceId};

    #[derive(Debug)]
    struct ContextLogger(std::sync::Arc<dyn Logger>);

    impl ContextLogger {
        fn log_in_span(&self, body: &'static str) {
            self.0.emit(
                LogRecord::new()
                    .with_body(body)
                    .with_trace_context(
                        TraceId::from(0x5f46_7fe7_bf42_676c_05e2_0ba4_a90e_448e),
                        SpanId::from(0x4c72_1bf3_3e3c_af8f),
                        TraceFlags::SAMPLED,
                    ),
            );
        }
    }

    #[test]
    fn logging_sdk_test() {
        let exporter = InMemoryLogExporterBuilder::new()
            .keep_records_on_shutdown()
            .build();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();

        let logger = provider.logger("test-logger");
        let ts = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        logger.log_with_timestamp(Severity::Error, "message1", ts);
        logger.log_with_attributes(
            Severity::Warn,
            "event",
            vec![
                KeyValue::new("k1", "v1"),
                KeyValue::new("k2", 2),
            ],
        );
        ContextLogger(provider.logger("test-logger")).log_in_span("traced");

        provider.shutdown().unwrap();

        let logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 3);

        assert_eq!(logs[0].severity, Severity::Error);
        assert_eq!(logs[0].body, "message1");
        assert_eq!(logs[0].timestamp, ts);
        assert!(!logs[0].has_trace_context());

        assert_eq!(logs[1].name, "event");
        assert_eq!(logs[1].attributes[1].value, AnyValue::Int(2));

        assert!(logs[2].has_trace_context());
        assert_eq!(logs[2].trace_flags, TraceFlags::SAMPLED);
    }
}
