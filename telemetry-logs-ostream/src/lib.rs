//! Export log records as plain text to stdout or any shared writer.
//!
//! # Examples
//!
//! ```no_run
//! use telemetry_logs::logs::LoggerProvider;
//! use telemetry_logs_ostream::OStreamLogExporter;
//! use telemetry_logs_sdk::logs::SdkLoggerProvider;
//!
//! let provider = SdkLoggerProvider::builder()
//!     .with_simple_exporter(OStreamLogExporter::default())
//!     .build();
//!
//! provider.logger("checkout").log("order received");
//!
//! // {
//! //     timestamp   : 1700000000000000000
//! //     severity    : 9
//! //     name        :
//! //     body        : order received
//! //     ...
//! // }
//! ```
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

mod logs;
pub use logs::*;
