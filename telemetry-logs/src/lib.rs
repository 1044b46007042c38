//! The instrumentation-facing half of a structured logging pipeline.
//!
//! *[Supported Rust Versions](#supported-rust-versions)*
//!
//! # Overview
//!
//! This crate defines what a log record is and how code obtains a logger to
//! emit one. It ships no processing or exporting: the
//! [`telemetry-logs-sdk`] crate provides the provider, processors and
//! exporter contract, and [`telemetry-logs-ostream`] provides a text exporter.
//! Library authors should depend on this crate *only*.
//!
//! ## What does this crate contain?
//!
//! - **[`logs`]:** the [`LogRecord`](logs::LogRecord) model, the
//!   [`Logger`](logs::Logger) and [`LoggerProvider`](logs::LoggerProvider)
//!   traits and their no-op implementations.
//! - **[`global`]:** the process-wide logger provider and the SDK
//!   self-diagnostics registry with its `diag_*!` macros.
//! - **Trace context:** [`TraceId`], [`SpanId`] and [`TraceFlags`] carried by
//!   every record.
//!
//! # Getting Started
//!
//! ```
//! use telemetry_logs::global;
//! use telemetry_logs::logs::Severity;
//! use telemetry_logs::KeyValue;
//!
//! let logger = global::logger("checkout");
//! logger.log("order received");
//! logger.log_with_severity(Severity::Warn, "payment slow");
//! logger.log_with_attributes(
//!     Severity::Error,
//!     "payment_failed",
//!     vec![KeyValue::new("order_id", 42)],
//! );
//! ```
//!
//! Without an installed provider the global logger is a no-op.
//!
//! # Feature Flags
//!
//! * `internal-logs` (enabled by default): provides
//!   [`TracingDiagnosticHandler`](global::TracingDiagnosticHandler), which
//!   forwards SDK diagnostics to `tracing`.
//! * `max-level-error`, `max-level-warn` (default), `max-level-info`,
//!   `max-level-debug`: the most verbose SDK diagnostic compiled in.
//!
//! # Supported Rust Versions
//!
//! This crate is built against the latest stable release. The minimum
//! supported version is 1.75. Increasing it is not considered a semver
//! breaking change.
//!
//! [`telemetry-logs-sdk`]: https://crates.io/crates/telemetry-logs-sdk
//! [`telemetry-logs-ostream`]: https://crates.io/crates/telemetry-logs-ostream
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(
    docsrs,
    feature(doc_cfg, doc_auto_cfg),
    deny(rustdoc::broken_intra_doc_links)
)]

pub mod global;

mod common;

pub use common::{Key, KeyValue};

pub mod logs;

mod trace_context;

pub use trace_context::{SpanId, TraceFlags, TraceId};

#[doc(hidden)]
pub mod time {
    use std::time::SystemTime;

    #[doc(hidden)]
    pub fn now() -> SystemTime {
        SystemTime::now()
    }
}
