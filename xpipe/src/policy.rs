//! Decides how much of a write may be buffered right now.

use crate::BYTE_CHUNK_SIZE;

/// Capacity threshold applied to writes.
///
/// Unbounded by default. In fixed-length mode the number of buffered bytes
/// a writer may add is capped at `limit`; bytes buffered before the switch
/// are never rejected retroactively.
#[derive(Debug, Clone, Copy)]
pub struct CapacityPolicy {
    fixed_length: bool,
    limit: usize,
}

impl CapacityPolicy {
    /// Creates an unbounded policy whose fixed-length cap is `limit` bytes.
    pub const fn new(limit: usize) -> Self {
        Self {
            fixed_length: false,
            limit,
        }
    }

    /// Switches to fixed-length mode. Idempotent.
    pub fn set_fixed_length(&mut self) {
        self.fixed_length = true;
    }

    /// Returns true in fixed-length mode.
    pub const fn is_fixed_length(&self) -> bool {
        self.fixed_length
    }

    /// Returns how many of `requested` bytes may be accepted with `buffered` bytes already queued.
    pub fn accept_now(&self, requested: usize, buffered: usize) -> usize {
        if !self.fixed_length {
            return requested;
        }
        requested.min(self.limit.saturating_sub(buffered))
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::new(BYTE_CHUNK_SIZE)
    }
}
