//! # Stream Log Exporter
//!
//! [`OStreamLogExporter`] renders each [`LogRecord`] as a fixed text block
//! and writes it to its configured sink. By default it writes to [`Stdout`].
//!
//! [`LogRecord`]: telemetry_logs::logs::LogRecord
//! [`Stdout`]: std::io::Stdout
mod exporter;
pub use exporter::OStreamLogExporter;
