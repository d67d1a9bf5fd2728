//! Pipe configuration and timeout helpers.

use std::time::{Duration, Instant};

/// Construction-time settings for a [`Pipe`](crate::Pipe).
///
/// A timeout of `None` waits forever; `Some(Duration::ZERO)` fails at once
/// when the operation cannot make progress immediately.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Start in fixed-length (backpressure) mode.
    pub fixed_length: bool,
    /// Initial read timeout of the read endpoint.
    pub read_timeout: Option<Duration>,
    /// Initial write timeout of the write endpoint.
    pub write_timeout: Option<Duration>,
}

impl PipeConfig {
    /// Unbounded pipe with infinite timeouts.
    pub fn new() -> Self {
        Self {
            fixed_length: false,
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Sets the fixed-length flag.
    pub fn with_fixed_length(mut self, fixed_length: bool) -> Self {
        self.fixed_length = fixed_length;
        self
    }

    /// Sets the read timeout.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the write timeout.
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline for an operation starting now. Unrepresentable instants count as infinite.
pub(crate) fn deadline_after(timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|t| Instant::now().checked_add(t))
}

pub(crate) fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}
