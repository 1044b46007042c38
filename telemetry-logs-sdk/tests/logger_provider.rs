use std::collections::HashSet;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use telemetry_logs::global::{
    DiagnosticHandler, DiagnosticLevel, DiagnosticRegistry, SourceLocation,
};
use telemetry_logs::logs::{Logger, LoggerProvider, NOOP_LOGGER_NAME};
use telemetry_logs::KeyValue;
use telemetry_logs_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider};

#[derive(Debug, Default)]
struct CapturingHandler {
    messages: Mutex<Vec<(DiagnosticLevel, String)>>,
}

impl DiagnosticHandler for CapturingHandler {
    fn handle(
        &self,
        level: DiagnosticLevel,
        _location: Option<SourceLocation>,
        message: Option<&str>,
        _attributes: &[KeyValue],
    ) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.unwrap_or_default().to_owned()));
    }
}

#[test]
fn concurrent_lookups_never_exceed_capacity() {
    const THREADS: usize = 8;
    const CAPACITY: usize = 20;

    let provider = SdkLoggerProvider::builder()
        .with_max_logger_count(CAPACITY)
        .build();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let provider = provider.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..CAPACITY)
                    .map(|i| {
                        // half the names are shared between all threads
                        let name = if i % 2 == 0 {
                            format!("shared-{i}")
                        } else {
                            format!("thread-{t}-{i}")
                        };
                        (name.clone(), provider.logger(&name))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<(String, Arc<dyn Logger>)> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(provider.logger_count(), CAPACITY);

    let real: HashSet<&str> = results
        .iter()
        .filter(|(_, logger)| logger.name() != NOOP_LOGGER_NAME)
        .map(|(name, logger)| {
            assert_eq!(name, logger.name());
            name.as_str()
        })
        .collect();
    assert!(real.len() <= CAPACITY);

    // every real logger is the single cached instance for its name
    for (name, logger) in &results {
        if logger.name() != NOOP_LOGGER_NAME {
            assert!(Arc::ptr_eq(logger, &provider.logger(name)));
        }
    }
}

#[test]
fn cache_overflow_is_reported_at_debug() {
    let registry = Arc::new(DiagnosticRegistry::new());
    registry.set_level(DiagnosticLevel::Debug);
    let handler = Arc::new(CapturingHandler::default());
    registry.set_handler(handler.clone());

    let provider = SdkLoggerProvider::builder()
        .with_diagnostics(registry)
        .with_max_logger_count(1)
        .build();
    let _first = provider.logger("first");
    let overflow = provider.logger("second");
    assert_eq!(overflow.name(), NOOP_LOGGER_NAME);

    // Debug reports only survive builds compiled with `max-level-debug`.
    if DiagnosticLevel::Debug.is_statically_enabled() {
        let messages = handler.messages.lock().unwrap();
        assert!(messages
            .iter()
            .any(|(level, msg)| *level == DiagnosticLevel::Debug && msg.contains("LoggerCacheFull")));
    }
}

#[test]
fn records_from_many_threads_all_arrive() {
    let exporter = InMemoryLogExporter::default();
    let provider = SdkLoggerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = provider.logger(&format!("worker-{t}"));
            thread::spawn(move || {
                for i in 0..25 {
                    logger.log(&format!("record {i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    provider.force_flush().unwrap();
    assert_eq!(exporter.get_emitted_logs().unwrap().len(), 100);
}
