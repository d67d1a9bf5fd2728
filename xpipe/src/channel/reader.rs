//! Read endpoint of a pipe.

use std::future::poll_fn;
use std::sync::Arc;
use std::time::Duration;

use log::trace;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::{already_cancelled, cancelled, elapsed, ChannelState, InFlight, InFlightGuard};
use crate::config::deadline_after;
use crate::error::{Error, ErrorKind, Result};
use crate::shared::Shared;

/// Read endpoint of a pipe.
///
/// A read returns as soon as at least one byte is available. `Ok(0)` for a
/// non-empty buffer means the write side closed and everything buffered
/// has been read. Dropping the reader closes the read side.
#[derive(Debug)]
pub struct PipeReader {
    shared: Arc<Shared>,
    in_flight: InFlight,
    timeout: Mutex<Option<Duration>>,
}

impl PipeReader {
    pub(crate) fn new(shared: Arc<Shared>, timeout: Option<Duration>) -> Self {
        Self {
            shared,
            in_flight: InFlight::default(),
            timeout: Mutex::new(timeout),
        }
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Returns whether the read side is still open.
    pub fn state(&self) -> ChannelState {
        if self.shared.is_read_open() {
            ChannelState::Open
        } else {
            ChannelState::Closed
        }
    }

    /// Returns the read timeout; `None` means infinite.
    pub fn read_timeout(&self) -> Option<Duration> {
        *self.timeout.lock()
    }

    /// Sets the read timeout used by subsequent reads.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) {
        *self.timeout.lock() = timeout;
    }

    /// Returns the number of bytes that can be read without waiting.
    pub fn available(&self) -> usize {
        self.shared.buffered()
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if !self.shared.is_read_open() {
            return Err(Error::new(ErrorKind::EndClosed));
        }
        self.in_flight.enter()
    }

    /// Reads into `buf`, blocking the thread while the pipe is empty.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let _guard = self.begin()?;
        self.shared.read_blocking(buf, deadline_after(self.read_timeout()))
    }

    /// Reads into `buf` without blocking the thread.
    ///
    /// Honours the read timeout and, if given, `cancel`; neither consumes
    /// any byte when it fires.
    pub async fn read_async(&self, buf: &mut [u8], cancel: Option<&CancellationToken>) -> Result<usize> {
        let _guard = self.begin()?;
        already_cancelled(cancel)?;
        let deadline = deadline_after(self.read_timeout());

        tokio::select! {
            biased;
            result = poll_fn(|cx| self.shared.poll_read(cx, buf)) => result,
            _ = cancelled(cancel) => Err(Error::new(ErrorKind::Cancelled)),
            _ = elapsed(deadline) => Err(Error::new(ErrorKind::Timeout)),
        }
    }

    /// Closes the read side and drops everything buffered. Later writes are
    /// accepted and discarded. Idempotent.
    pub fn close(&self) {
        if self.shared.close_read() {
            trace!("pipe read side closed, buffered data discarded");
        }
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        self.close();
    }
}
