//! Loader configuration.

use std::time::Duration;

/// Settings applied to a [`ResourceLoader`](crate::ResourceLoader) at creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoaderConfig {
    /// Time to wait before the first task runs.
    pub start_delay: Duration,
    /// Idle after tasks added through convenience methods without an explicit idle.
    pub default_idle: Duration,
}

impl LoaderConfig {
    /// Create the default configuration: no start delay, no idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start delay.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Set the default idle for convenience methods.
    pub fn with_default_idle(mut self, idle: Duration) -> Self {
        self.default_idle = idle;
        self
    }
}
