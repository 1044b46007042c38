//! # SDK self-diagnostics
//!
//! Every SDK component reports its own failures through a
//! [`DiagnosticRegistry`] rather than panicking or returning errors from
//! fire-and-forget paths. The registry holds one replaceable
//! [`DiagnosticHandler`]; it is never empty.
//!
//! The handler should be replaced once, during initialization and before
//! providers are built. Replacing it later is safe but components racing the
//! swap may still deliver a message or two to the previous handler.
use std::env;
use std::fmt;
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::KeyValue;

/// Environment variable holding the start-time diagnostic threshold.
pub const OTEL_LOG_LEVEL: &str = "OTEL_LOG_LEVEL";
/// Threshold used when [`OTEL_LOG_LEVEL`] is unset or unparsable.
pub const OTEL_LOG_LEVEL_DEFAULT: DiagnosticLevel = DiagnosticLevel::Warning;

/// The most verbose level compiled into this build. Diagnostic macro calls
/// above it expand to nothing.
pub const STATIC_MAX_LEVEL: DiagnosticLevel = if cfg!(any(test, feature = "max-level-debug")) {
    DiagnosticLevel::Debug
} else if cfg!(feature = "max-level-info") {
    DiagnosticLevel::Info
} else if cfg!(feature = "max-level-warn") {
    DiagnosticLevel::Warning
} else {
    DiagnosticLevel::Error
};

/// Severity of an SDK diagnostic message. Lower is more severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DiagnosticLevel {
    /// The pipeline lost data or cannot make progress.
    Error = 0,
    /// Something unexpected happened but the pipeline keeps working.
    Warning = 1,
    /// Lifecycle events.
    Info = 2,
    /// Verbose troubleshooting output.
    Debug = 3,
}

impl DiagnosticLevel {
    /// The name rendered by [`DefaultDiagnosticHandler`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "Error",
            DiagnosticLevel::Warning => "Warning",
            DiagnosticLevel::Info => "Info",
            DiagnosticLevel::Debug => "Debug",
        }
    }

    /// Whether messages at this level survive compile-time gating.
    pub const fn is_statically_enabled(self) -> bool {
        self as u8 <= STATIC_MAX_LEVEL as u8
    }

    /// Parses the values accepted by [`OTEL_LOG_LEVEL`], case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(DiagnosticLevel::Error),
            "warn" | "warning" => Some(DiagnosticLevel::Warning),
            "info" => Some(DiagnosticLevel::Info),
            "debug" => Some(DiagnosticLevel::Debug),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => DiagnosticLevel::Error,
            1 => DiagnosticLevel::Warning,
            2 => DiagnosticLevel::Info,
            _ => DiagnosticLevel::Debug,
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a diagnostic message was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file path.
    pub file: &'static str,
    /// Line number within `file`.
    pub line: u32,
}

impl SourceLocation {
    /// Create a location, usually from `file!()` and `line!()`.
    pub const fn new(file: &'static str, line: u32) -> Self {
        SourceLocation { file, line }
    }
}

/// Receives the SDK's own diagnostic messages.
///
/// Implementations must not panic, whatever the input.
pub trait DiagnosticHandler: Send + Sync {
    /// Handle one diagnostic message.
    fn handle(
        &self,
        level: DiagnosticLevel,
        location: Option<SourceLocation>,
        message: Option<&str>,
        attributes: &[KeyValue],
    );
}

/// Writes one line per message to stdout:
/// `[<Level>] File: <path>:<line><message>`.
///
/// Each message is assembled first and written with a single call, so
/// concurrent writers never split a line. Attributes are not rendered.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDiagnosticHandler;

impl DefaultDiagnosticHandler {
    /// Create a new default handler.
    pub fn new() -> Self {
        DefaultDiagnosticHandler
    }

    pub(crate) fn render(
        level: DiagnosticLevel,
        location: Option<SourceLocation>,
        message: Option<&str>,
    ) -> String {
        let mut line = String::with_capacity(64);
        line.push('[');
        line.push_str(level.as_str());
        line.push_str("] ");
        if let Some(location) = location {
            let _ = write!(line, "File: {}:{}", location.file, location.line);
        }
        if let Some(message) = message {
            line.push_str(message);
        }
        line.push('\n');
        line
    }
}

impl DiagnosticHandler for DefaultDiagnosticHandler {
    fn handle(
        &self,
        level: DiagnosticLevel,
        location: Option<SourceLocation>,
        message: Option<&str>,
        _attributes: &[KeyValue],
    ) {
        let line = Self::render(level, location, message);
        // nowhere left to report a failing stdout
        let _ = std::io::stdout().lock().write_all(line.as_bytes());
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDiagnosticHandler;

impl NoopDiagnosticHandler {
    /// Create a new no-op handler.
    pub fn new() -> Self {
        NoopDiagnosticHandler
    }
}

impl DiagnosticHandler for NoopDiagnosticHandler {
    fn handle(
        &self,
        _level: DiagnosticLevel,
        _location: Option<SourceLocation>,
        _message: Option<&str>,
        _attributes: &[KeyValue],
    ) {
    }
}

/// Forwards diagnostics to the `tracing` ecosystem under the
/// `telemetry_logs` target.
///
/// Do not install this handler while a `tracing` subscriber routes events
/// back into a logger of the same SDK, or every failure will feed itself.
#[cfg(feature = "internal-logs")]
#[cfg_attr(docsrs, doc(cfg(feature = "internal-logs")))]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnosticHandler;

#[cfg(feature = "internal-logs")]
impl DiagnosticHandler for TracingDiagnosticHandler {
    fn handle(
        &self,
        level: DiagnosticLevel,
        location: Option<SourceLocation>,
        message: Option<&str>,
        attributes: &[KeyValue],
    ) {
        let (file, line) = location.map_or(("", 0), |l| (l.file, l.line));
        let message = message.unwrap_or_default();
        match level {
            DiagnosticLevel::Error => {
                tracing::error!(target: "telemetry_logs", file, line, attributes = ?attributes, "{message}")
            }
            DiagnosticLevel::Warning => {
                tracing::warn!(target: "telemetry_logs", file, line, attributes = ?attributes, "{message}")
            }
            DiagnosticLevel::Info => {
                tracing::info!(target: "telemetry_logs", file, line, attributes = ?attributes, "{message}")
            }
            DiagnosticLevel::Debug => {
                tracing::debug!(target: "telemetry_logs", file, line, attributes = ?attributes, "{message}")
            }
        }
    }
}

/// Holds the active [`DiagnosticHandler`] and the start-time threshold.
///
/// A process normally uses the global registry from
/// [`diagnostics`](crate::global::diagnostics); SDK components also accept an
/// explicitly injected one.
pub struct DiagnosticRegistry {
    handler: ArcSwap<Arc<dyn DiagnosticHandler>>,
    level: AtomicU8,
}

impl fmt::Debug for DiagnosticRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticRegistry")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl Default for DiagnosticRegistry {
    fn default() -> Self {
        DiagnosticRegistry::new()
    }
}

impl DiagnosticRegistry {
    /// Create a registry with the [`DefaultDiagnosticHandler`] and the
    /// threshold taken from [`OTEL_LOG_LEVEL`].
    pub fn new() -> Self {
        DiagnosticRegistry::with_handler(Arc::new(DefaultDiagnosticHandler::new()))
    }

    /// Create a registry with the given handler and the threshold taken from
    /// [`OTEL_LOG_LEVEL`].
    pub fn with_handler(handler: Arc<dyn DiagnosticHandler>) -> Self {
        let level = env::var(OTEL_LOG_LEVEL)
            .ok()
            .and_then(|value| DiagnosticLevel::parse(&value))
            .unwrap_or(OTEL_LOG_LEVEL_DEFAULT);
        DiagnosticRegistry {
            handler: ArcSwap::from_pointee(handler),
            level: AtomicU8::new(level as u8),
        }
    }

    /// The active handler.
    pub fn handler(&self) -> Arc<dyn DiagnosticHandler> {
        let guard = self.handler.load();
        Arc::clone(&**guard)
    }

    /// Replace the active handler.
    pub fn set_handler(&self, handler: Arc<dyn DiagnosticHandler>) {
        self.handler.store(Arc::new(handler));
    }

    /// The runtime threshold.
    pub fn level(&self) -> DiagnosticLevel {
        DiagnosticLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Change the runtime threshold. It cannot raise verbosity past
    /// [`STATIC_MAX_LEVEL`].
    pub fn set_level(&self, level: DiagnosticLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a message at `level` would reach the handler.
    #[inline]
    pub fn enabled(&self, level: DiagnosticLevel) -> bool {
        level.is_statically_enabled() && level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Deliver a message to the active handler, bypassing the threshold.
    /// The diagnostic macros check [`enabled`](Self::enabled) first.
    pub fn dispatch(
        &self,
        level: DiagnosticLevel,
        location: Option<SourceLocation>,
        message: Option<&str>,
        attributes: &[KeyValue],
    ) {
        self.handler
            .load()
            .handle(level, location, message, attributes);
    }
}
