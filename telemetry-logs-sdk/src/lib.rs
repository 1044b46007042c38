//! # Log SDK
//!
//! The processing half of the logging pipeline: an implementation of the
//! [`LoggerProvider`](telemetry_logs::logs::LoggerProvider) API with a
//! bounded logger cache, the [`LogProcessor`](logs::LogProcessor) and
//! [`LogExporter`](logs::LogExporter) contracts, and a synchronous
//! [`SimpleLogProcessor`](logs::SimpleLogProcessor).
//!
//! ## Getting Started
//!
//! ```
//! use std::sync::Arc;
//! use telemetry_logs::global;
//! use telemetry_logs::logs::Severity;
//! use telemetry_logs_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider};
//!
//! let exporter = InMemoryLogExporter::default();
//! let provider = SdkLoggerProvider::builder()
//!     .with_simple_exporter(exporter.clone())
//!     .build();
//! let _previous = global::set_logger_provider(Arc::new(provider.clone()));
//!
//! global::logger("checkout").log_with_severity(Severity::Warn, "payment slow");
//!
//! provider.force_flush().unwrap();
//! assert_eq!(exporter.get_emitted_logs().unwrap().len(), 1);
//! ```
//!
//! Components never panic and never return errors from `emit`; failures
//! are reported through the diagnostic registry of
//! [`telemetry_logs::global`].
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

pub mod error;
pub mod logs;
pub mod retry;
pub mod suppression;
