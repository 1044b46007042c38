use std::env;
use std::str::FromStr;

/// Default number of distinct loggers a provider hands out before it
/// degrades to the no-op logger.
pub const MAX_LOGGER_COUNT: usize = 100;

/// Overrides [`MAX_LOGGER_COUNT`] for providers that do not set a capacity
/// programmatically.
pub const OTEL_LOGS_MAX_LOGGER_COUNT: &str = "OTEL_LOGS_MAX_LOGGER_COUNT";

/// Logger provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity of the provider's logger cache.
    pub max_logger_count: usize,
}

impl Default for Config {
    /// [`MAX_LOGGER_COUNT`], unless `OTEL_LOGS_MAX_LOGGER_COUNT` holds a
    /// valid count.
    fn default() -> Self {
        Config {
            max_logger_count: MAX_LOGGER_COUNT,
        }
        .init_from_env_vars()
    }
}

impl Config {
    fn init_from_env_vars(mut self) -> Self {
        if let Some(max_logger_count) = env::var(OTEL_LOGS_MAX_LOGGER_COUNT)
            .ok()
            .and_then(|count| usize::from_str(count.trim()).ok())
        {
            self.max_logger_count = max_logger_count;
        }
        self
    }
}
