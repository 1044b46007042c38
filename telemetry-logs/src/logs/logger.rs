use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::SystemTime;

use crate::logs::{LogRecord, Severity};
use crate::KeyValue;

/// The interface for emitting [`LogRecord`]s.
///
/// All convenience methods build a record and funnel it through
/// [`Logger::emit`]. None of them report failures to the caller.
pub trait Logger: Send + Sync + Debug {
    /// The name this logger was created with.
    fn name(&self) -> &str;

    /// Emit a [`LogRecord`].
    fn emit(&self, record: LogRecord);

    /// Log an unstructured message at the default severity.
    fn log(&self, message: &str) {
        self.log_with_severity(Severity::default(), message);
    }

    /// Log an unstructured message at the given severity.
    fn log_with_severity(&self, severity: Severity, message: &str) {
        self.emit(
            LogRecord::new()
                .with_severity(severity)
                .with_body(Cow::Owned(message.to_owned())),
        );
    }

    /// Log an unstructured message with an explicit event time.
    fn log_with_timestamp(&self, severity: Severity, message: &str, timestamp: SystemTime) {
        self.emit(
            LogRecord::new()
                .with_severity(severity)
                .with_body(Cow::Owned(message.to_owned()))
                .with_timestamp(timestamp),
        );
    }

    /// Log a named, structured event.
    fn log_with_attributes(&self, severity: Severity, name: &str, attributes: Vec<KeyValue>) {
        let mut record = LogRecord::new()
            .with_severity(severity)
            .with_name(Cow::Owned(name.to_owned()));
        record.attributes = attributes;
        self.emit(record);
    }
}

/// Interfaces that can create [`Logger`] instances.
pub trait LoggerProvider: Send + Sync + Debug {
    /// Returns the logger registered under `name`.
    ///
    /// `args` are accepted for forward compatibility and do not take part in
    /// the identity of a logger.
    fn logger_with_args(&self, name: &str, args: &[&str]) -> Arc<dyn Logger>;

    /// Returns the logger registered under `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use telemetry_logs::logs::{LoggerProvider, NoopLoggerProvider};
    ///
    /// let provider = NoopLoggerProvider::new();
    /// let logger = provider.logger("my_app");
    /// logger.log("hello");
    /// ```
    fn logger(&self, name: &str) -> Arc<dyn Logger> {
        self.logger_with_args(name, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, UNIX_EPOCH};

    #[derive(Debug, Default)]
    struct CapturingLogger {
        records: Mutex<Vec<LogRecord>>,
    }

    impl Logger for CapturingLogger {
        fn name(&self) -> &str {
            "capturing"
        }

        fn emit(&self, record: LogRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    #[test]
    fn convenience_methods_build_records() {
        let logger = CapturingLogger::default();
        let ts = UNIX_EPOCH + Duration::from_secs(1);

        logger.log("plain");
        logger.log_with_severity(Severity::Warn, "warned");
        logger.log_with_timestamp(Severity::Debug, "timed", ts);
        logger.log_with_attributes(
            Severity::Error,
            "structured",
            vec![KeyValue::new("code", 500)],
        );

        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].severity, Severity::Info);
        assert_eq!(records[0].body, "plain");
        assert_eq!(records[1].severity, Severity::Warn);
        assert_eq!(records[2].timestamp, ts);
        assert_eq!(records[3].name, "structured");
        assert_eq!(records[3].attributes.len(), 1);
    }
}
