/*
    Stress test results:
    Run with `cargo run --release --bin logs`, stop with Ctrl-C.
    Measures the cost of a logger emit through the provider when the
    processor does nothing.
*/

use std::time::Duration;

use telemetry_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
use telemetry_logs::KeyValue;
use telemetry_logs_sdk::error::SdkResult;
use telemetry_logs_sdk::logs::{LogProcessor, SdkLoggerProvider};

mod throughput;

#[derive(Debug)]
struct NoOpLogProcessor;

impl LogProcessor for NoOpLogProcessor {
    fn emit(&self, _record: LogRecord) {}

    fn force_flush_with_timeout(&self, _timeout: Duration) -> SdkResult {
        Ok(())
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> SdkResult {
        Ok(())
    }
}

fn main() {
    let provider = SdkLoggerProvider::builder()
        .with_log_processor(NoOpLogProcessor)
        .build();
    let logger = provider.logger("stress");

    throughput::test_throughput(move || test_log(logger.as_ref()));

    let _ = provider.shutdown();
}

fn test_log(logger: &dyn Logger) {
    logger.log_with_attributes(
        Severity::Error,
        "CheckoutFailed",
        vec![
            KeyValue::new("product_id", 12345),
            KeyValue::new("product_name", "Wallet"),
            KeyValue::new("price", 9.99),
        ],
    );
}
