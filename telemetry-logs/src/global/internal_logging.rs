//! Macros for reporting SDK self-diagnostics.
//!
//! **Note**: `diag_error!`, `diag_warn!`, `diag_info!` and `diag_debug!` are
//! meant for code inside the SDK and for custom processors and exporters.
//! They are not an application logging facility.
//!
//! Each macro takes a message, optionally preceded by `registry: <expr>` to
//! target an injected [`DiagnosticRegistry`](crate::global::DiagnosticRegistry)
//! instead of the global one, and optionally followed by `key = value`
//! attributes.
//!
//! A call above [`STATIC_MAX_LEVEL`](crate::global::STATIC_MAX_LEVEL) is
//! removed at compile time, message formatting included. A call above the
//! registry's runtime threshold costs one atomic load.
//!
//! ```
//! use telemetry_logs::{diag_error, diag_warn};
//! use telemetry_logs::global::DiagnosticRegistry;
//!
//! diag_warn!("exporter queue is full", dropped = 12);
//!
//! let registry = DiagnosticRegistry::new();
//! diag_error!(registry: registry, format!("export failed: {}", "timeout"));
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __diag_log {
    ($level:expr, $registry:expr, $message:expr $(, $key:ident = $value:expr)*) => {{
        const __STATICALLY_ENABLED: bool = $level.is_statically_enabled();
        if __STATICALLY_ENABLED {
            let __registry: &$crate::global::DiagnosticRegistry = &$registry;
            if __registry.enabled($level) {
                let __message = ::std::string::ToString::to_string(&$message);
                __registry.dispatch(
                    $level,
                    ::std::option::Option::Some($crate::global::SourceLocation::new(
                        ::std::file!(),
                        ::std::line!(),
                    )),
                    ::std::option::Option::Some(__message.as_str()),
                    &[$($crate::KeyValue::new(::std::stringify!($key), $value)),*],
                );
            }
        }
    }};
}

/// Report an SDK failure that lost data or stopped progress.
///
/// ```
/// use telemetry_logs::diag_error;
/// diag_error!("export failed", attempts = 3);
/// ```
#[macro_export]
macro_rules! diag_error {
    (registry: $registry:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Error, $registry, $message $(, $key = $value)*)
    };
    ($message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Error, $crate::global::diagnostics(), $message $(, $key = $value)*)
    };
}

/// Report an unexpected SDK condition that did not stop the pipeline.
///
/// ```
/// use telemetry_logs::diag_warn;
/// diag_warn!("logger cache exhausted", name = "orders");
/// ```
#[macro_export]
macro_rules! diag_warn {
    (registry: $registry:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Warning, $registry, $message $(, $key = $value)*)
    };
    ($message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Warning, $crate::global::diagnostics(), $message $(, $key = $value)*)
    };
}

/// Report an SDK lifecycle event.
///
/// ```
/// use telemetry_logs::diag_info;
/// diag_info!("provider shut down");
/// ```
#[macro_export]
macro_rules! diag_info {
    (registry: $registry:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Info, $registry, $message $(, $key = $value)*)
    };
    ($message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Info, $crate::global::diagnostics(), $message $(, $key = $value)*)
    };
}

/// Report verbose SDK troubleshooting output.
///
/// ```
/// use telemetry_logs::diag_debug;
/// diag_debug!("logger created", name = "orders", count = 4);
/// ```
#[macro_export]
macro_rules! diag_debug {
    (registry: $registry:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Debug, $registry, $message $(, $key = $value)*)
    };
    ($message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__diag_log!($crate::global::DiagnosticLevel::Debug, $crate::global::diagnostics(), $message $(, $key = $value)*)
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::global::diagnostics::tests::CapturingHandler;
    use crate::global::{DiagnosticLevel, DiagnosticRegistry};

    fn capturing_registry(level: DiagnosticLevel) -> (DiagnosticRegistry, Arc<CapturingHandler>) {
        let registry = DiagnosticRegistry::new();
        registry.set_level(level);
        let capture = Arc::new(CapturingHandler::default());
        registry.set_handler(capture.clone());
        (registry, capture)
    }

    #[test]
    fn macros_attach_location_and_attributes() {
        let (registry, capture) = capturing_registry(DiagnosticLevel::Debug);

        crate::diag_error!(registry: registry, "export failed", attempts = 3, reason = "io");
        let expected_line = line!() - 1;
        crate::diag_debug!(registry: registry, format!("created {}", "orders"));

        let messages = capture.messages.lock().unwrap();
        assert_eq!(messages.len(), 2);

        let (level, location, message, attributes) = &messages[0];
        assert_eq!(*level, DiagnosticLevel::Error);
        let location = location.expect("macros always attach a location");
        assert_eq!(location.file, file!());
        assert_eq!(location.line, expected_line);
        assert_eq!(message, "export failed");
        assert_eq!(*attributes, 2);

        assert_eq!(messages[1].0, DiagnosticLevel::Debug);
        assert_eq!(messages[1].2, "created orders");
    }

    #[test]
    fn runtime_threshold_drops_verbose_messages() {
        let (registry, capture) = capturing_registry(DiagnosticLevel::Warning);

        crate::diag_info!(registry: registry, "lifecycle");
        crate::diag_debug!(registry: registry, "verbose");
        crate::diag_warn!(registry: registry, "kept",);

        let messages = capture.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, DiagnosticLevel::Warning);
    }

    #[test]
    fn registry_behind_arc_is_accepted() {
        let (registry, capture) = capturing_registry(DiagnosticLevel::Error);
        let shared = Arc::new(registry);

        crate::diag_error!(registry: shared, "through arc");

        assert_eq!(capture.messages.lock().unwrap().len(), 1);
    }
}
