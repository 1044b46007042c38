//! run with `$ cargo run --example basic`

use std::sync::Arc;

use telemetry_logs::global;
use telemetry_logs::logs::Severity;
use telemetry_logs::KeyValue;
use telemetry_logs_ostream::OStreamLogExporter;
use telemetry_logs_sdk::logs::SdkLoggerProvider;

fn init_logs() -> SdkLoggerProvider {
    let provider = SdkLoggerProvider::builder()
        .with_simple_exporter(OStreamLogExporter::default())
        .build();
    let _ = global::set_logger_provider(Arc::new(provider.clone()));
    provider
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = init_logs();

    let logger = global::logger("basic");
    logger.log("service started");
    logger.log_with_severity(Severity::Warn, "disk usage above 80%");
    logger.log_with_attributes(
        Severity::Error,
        "CheckoutFailed",
        vec![KeyValue::new("order_id", 4521)],
    );

    provider.shutdown()?;

    // dropped without output once the provider is shut down
    logger.log("never printed");
    Ok(())
}
