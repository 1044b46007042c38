//! Bounded, synchronous retries with exponential backoff and jitter.
//!
//! [`RetryPolicy`] describes how many attempts an operation gets and how long
//! to wait between them. [`retry_with_backoff`] runs an operation on the
//! calling thread until it succeeds, fails with an error that is not
//! retryable, runs out of attempts or would overrun its deadline.
//!
//! Attempts are capped at [`MAX_EXPORT_ATTEMPTS`].
use std::cmp;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use crate::logs::MAX_EXPORT_ATTEMPTS;

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Upper bound for the random amount added to each delay.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    /// A single attempt.
    fn default() -> Self {
        RetryPolicy::no_retry()
    }
}

impl RetryPolicy {
    /// Run the operation exactly once.
    pub const fn no_retry() -> Self {
        RetryPolicy {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// [`MAX_EXPORT_ATTEMPTS`] attempts, starting at 100ms apart and doubling
    /// up to one second.
    pub const fn exponential() -> Self {
        RetryPolicy {
            max_attempts: MAX_EXPORT_ATTEMPTS,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            jitter: Duration::from_millis(50),
        }
    }

    /// The number of attempts this policy actually grants.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.clamp(1, MAX_EXPORT_ATTEMPTS)
    }
}

// Cheap jitter without a random number generator.
fn jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()))
        .unwrap_or(0);
    let max_nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    Duration::from_nanos(nanos % max_nanos.saturating_add(1))
}

/// Retries `operation` according to `policy`.
///
/// `is_retryable` decides which errors are worth another attempt. No delay is
/// started that would end past `deadline`; the last error is returned
/// instead.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use telemetry_logs_sdk::retry::{retry_with_backoff, RetryPolicy};
///
/// let policy = RetryPolicy {
///     max_attempts: 3,
///     initial_delay: Duration::from_millis(1),
///     max_delay: Duration::from_millis(5),
///     jitter: Duration::ZERO,
/// };
/// let mut calls = 0;
/// let result: Result<u32, &str> = retry_with_backoff(&policy, None, || {
///     calls += 1;
///     if calls < 3 { Err("busy") } else { Ok(calls) }
/// }, |_| true);
/// assert_eq!(result, Ok(3));
/// ```
pub fn retry_with_backoff<T, E, F, R>(
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    mut operation: F,
    is_retryable: R,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    R: Fn(&E) -> bool,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    let mut delay = policy.initial_delay;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts && is_retryable(&err) => {
                let wait = cmp::min(
                    delay.saturating_add(jitter(policy.jitter)),
                    policy.max_delay,
                );
                if let Some(deadline) = deadline {
                    if Instant::now() + wait >= deadline {
                        return Err(err);
                    }
                }
                thread::sleep(wait);
                delay = cmp::min(delay.saturating_mul(2), policy.max_delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
