//! Write and read endpoints of a pipe.
//!
//! Each endpoint is a thin handle over the shared pipe state plus a
//! per-endpoint in-flight guard and timeout setting.

mod reader;
mod writer;

pub use reader::PipeReader;
pub use writer::PipeWriter;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use futures_timer::Delay;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorKind, Result};

/// Endpoint state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Endpoint is open and operational.
    Open,

    /// Endpoint is closed.
    Closed,
}

/// Rejects a second operation of the same kind while one is outstanding.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    pub(crate) fn enter(&self) -> Result<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| InFlightGuard(&self.0))
            .map_err(|_| Error::new(ErrorKind::ConcurrentUse))
    }
}

pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn already_cancelled(cancel: Option<&CancellationToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(Error::new(ErrorKind::Cancelled)),
        _ => Ok(()),
    }
}

async fn cancelled(cancel: Option<&CancellationToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => futures::future::pending().await,
    }
}

/// Resolves at `deadline` on any executor.
async fn elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            let left = deadline.saturating_duration_since(Instant::now());
            if !left.is_zero() {
                Delay::new(left).await;
            }
        }
        None => futures::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard() {
        let in_flight = InFlight::default();
        let guard = in_flight.enter().unwrap();
        assert_eq!(in_flight.enter().err().map(|e| e.kind()), Some(ErrorKind::ConcurrentUse));
        drop(guard);
        assert!(in_flight.enter().is_ok());
    }

    #[test]
    fn test_elapsed_without_runtime() {
        let start = Instant::now();
        futures::executor::block_on(elapsed(Some(start + std::time::Duration::from_millis(20))));
        assert!(start.elapsed() >= std::time::Duration::from_millis(20));
        futures::executor::block_on(elapsed(Some(start)));
    }

    #[test]
    fn test_already_cancelled() {
        let token = CancellationToken::new();
        assert!(already_cancelled(Some(&token)).is_ok());
        assert!(already_cancelled(None).is_ok());
        token.cancel();
        assert_eq!(already_cancelled(Some(&token)).unwrap_err().kind(), ErrorKind::Cancelled);
    }
}
