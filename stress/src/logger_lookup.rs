/*
    Stress test results:
    Run with `cargo run --release --bin logger_lookup`, stop with Ctrl-C.
    Half of the lookups hit cached loggers, the other half overflow the
    cache and fall back to the no-op logger.
*/

use std::sync::atomic::{AtomicUsize, Ordering};

use telemetry_logs::logs::LoggerProvider;
use telemetry_logs_sdk::logs::SdkLoggerProvider;

mod throughput;

const CACHED: usize = 64;

static NEXT: AtomicUsize = AtomicUsize::new(0);

fn main() {
    let provider = SdkLoggerProvider::builder()
        .with_max_logger_count(CACHED)
        .build();
    let names: Vec<String> = (0..CACHED * 2).map(|i| format!("component-{i}")).collect();
    for name in &names[..CACHED] {
        let _ = provider.logger(name);
    }

    let lookup_provider = provider.clone();
    throughput::test_throughput(move || {
        let i = NEXT.fetch_add(1, Ordering::Relaxed) % names.len();
        let _ = lookup_provider.logger(&names[i]);
    });

    let _ = provider.shutdown();
}
