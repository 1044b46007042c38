//! Per-thread suppression of records produced by the pipeline itself.
//!
//! While a [`SuppressionGuard`] is alive, every record emitted on the same
//! thread through an [`SdkLogger`](crate::logs::SdkLogger) is dropped. The
//! [`SimpleLogProcessor`](crate::logs::SimpleLogProcessor) holds one while
//! it exports, so an exporter or a diagnostic handler that logs through the
//! same provider cannot re-enter the processor. Custom processors that call
//! out to exporters on the emitting thread should do the same.
use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static SUPPRESSED: Cell<bool> = const { Cell::new(false) };
    static REPORTING_DROP: Cell<bool> = const { Cell::new(false) };
}

/// Suppresses telemetry on the current thread until dropped.
///
/// Guards nest: dropping an inner guard restores the outer state.
#[derive(Debug)]
pub struct SuppressionGuard {
    was_suppressed: bool,
    // restores thread-local state, so it must stay on this thread
    _not_send: PhantomData<*const ()>,
}

impl SuppressionGuard {
    /// Suppress telemetry on the current thread.
    pub fn enter() -> Self {
        let was_suppressed = SUPPRESSED
            .try_with(|suppressed| suppressed.replace(true))
            .unwrap_or(false);
        SuppressionGuard {
            was_suppressed,
            _not_send: PhantomData,
        }
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        let _ = SUPPRESSED.try_with(|suppressed| suppressed.set(self.was_suppressed));
    }
}

/// Whether telemetry is suppressed on the current thread.
pub fn is_suppressed() -> bool {
    SUPPRESSED.try_with(Cell::get).unwrap_or(false)
}

/// Runs `report` unless a drop report is already running on this thread.
///
/// A diagnostic handler that logs back into the pipeline would otherwise
/// report its own dropped record forever.
pub(crate) fn report_suppressed_drop(report: impl FnOnce()) {
    let already_reporting = REPORTING_DROP
        .try_with(|reporting| reporting.replace(true))
        .unwrap_or(true);
    if already_reporting {
        return;
    }
    report();
    let _ = REPORTING_DROP.try_with(|reporting| reporting.set(false));
}
