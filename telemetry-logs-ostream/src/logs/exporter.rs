use core::fmt;
use std::fmt::Write as _;
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use telemetry_logs::diag_error;
use telemetry_logs::global::{self, DiagnosticRegistry};
use telemetry_logs::logs::LogRecord;
use telemetry_logs_sdk::error::{ExportError, ExportResult, ShutdownResult};
use telemetry_logs_sdk::logs::{LogBatch, LogExporter};

/// A [`LogExporter`] that writes each record as a fixed text block to a
/// shared sink:
///
/// ```text
/// {
///     timestamp   : 1700000000000000000
///     severity    : 9
///     name        : checkout
///     body        : order received
///     trace_id    : 00000000000000000000000000000000
///     span_id     : 0000000000000000
///     trace_flags : 00
/// }
/// ```
///
/// `timestamp` is in nanoseconds since the UNIX epoch and `severity` is the
/// severity number. Resource and attributes are not rendered.
///
/// The sink is anything whose shared reference implements [`Write`], such
/// as [`Stdout`] or [`File`](std::fs::File). Each record is written with a
/// single call, but the exporter takes no lock of its own: callers sharing
/// one sink between several exporters may see blocks interleave.
pub struct OStreamLogExporter<W = Stdout> {
    sink: Arc<W>,
    is_shutdown: AtomicBool,
    diagnostics: Arc<DiagnosticRegistry>,
}

impl Default for OStreamLogExporter<Stdout> {
    fn default() -> Self {
        OStreamLogExporter::new(Arc::new(io::stdout()))
    }
}

impl<W> fmt::Debug for OStreamLogExporter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OStreamLogExporter")
            .field("is_shutdown", &self.is_shutdown)
            .finish_non_exhaustive()
    }
}

impl<W> OStreamLogExporter<W>
where
    for<'a> &'a W: Write,
{
    /// Creates an exporter writing to `sink`.
    pub fn new(sink: Arc<W>) -> Self {
        OStreamLogExporter {
            sink,
            is_shutdown: AtomicBool::new(false),
            diagnostics: Arc::clone(global::diagnostics()),
        }
    }

    /// Report write failures to `diagnostics` instead of the global registry.
    pub fn with_diagnostics(self, diagnostics: Arc<DiagnosticRegistry>) -> Self {
        OStreamLogExporter {
            diagnostics,
            ..self
        }
    }

    /// Whether [`LogExporter::shutdown`] was called.
    pub fn is_shutdown(&self) -> bool {
        self.is_shutdown.load(Ordering::SeqCst)
    }

    fn write_block(&self, block: &str) -> io::Result<()> {
        let mut sink = &*self.sink;
        sink.write_all(block.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        let mut sink = &*self.sink;
        sink.flush()
    }

    fn report(&self, err: io::Error) -> ExportError {
        diag_error!(
            registry: self.diagnostics,
            format!("OStreamLogExporter.Export.WriteFailed: {err}")
        );
        err.into()
    }
}

impl<W> LogExporter for OStreamLogExporter<W>
where
    W: Send + Sync,
    for<'a> &'a W: Write,
{
    fn export(&self, batch: LogBatch) -> ExportResult {
        if self.is_shutdown() {
            return Err(ExportError::AlreadyShutdown);
        }

        let mut block = String::with_capacity(256);
        for record in &batch {
            block.clear();
            render_record(record, &mut block);
            self.write_block(&block).map_err(|err| self.report(err))?;
        }
        self.flush().map_err(|err| self.report(err))
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> ShutdownResult {
        self.is_shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) fn render_record(record: &LogRecord, out: &mut String) {
    let timestamp = record
        .timestamp
        .duration_since(UNIX_EPOCH)
        .map_or(0, |since_epoch| since_epoch.as_nanos());
    // writing to a String cannot fail
    let _ = writeln!(out, "{{");
    let _ = writeln!(out, "    timestamp   : {timestamp}");
    let _ = writeln!(out, "    severity    : {}", record.severity.number());
    let _ = writeln!(out, "    name        : {}", record.name);
    let _ = writeln!(out, "    body        : {}", record.body);
    let _ = writeln!(out, "    trace_id    : {}", record.trace_id);
    let _ = writeln!(out, "    span_id     : {}", record.span_id);
    let _ = writeln!(out, "    trace_flags : {}", record.trace_flags);
    let _ = writeln!(out, "}}");
}
