//! Write endpoint of a pipe.

use std::future::poll_fn;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::{already_cancelled, cancelled, elapsed, ChannelState, InFlight, InFlightGuard};
use crate::config::deadline_after;
use crate::error::{partial, Error, ErrorKind, Result};
use crate::shared::Shared;

/// Write endpoint of a pipe.
///
/// Methods take `&self` so the handle can be shared between threads or
/// tasks, but only one write may be outstanding at a time; a second one
/// fails with [`ErrorKind::ConcurrentUse`]. Dropping the writer closes the
/// write side.
#[derive(Debug)]
pub struct PipeWriter {
    shared: Arc<Shared>,
    in_flight: InFlight,
    timeout: Mutex<Option<Duration>>,
}

impl PipeWriter {
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

    /// Returns whether the write side is still open.
    pub fn state(&self) -> ChannelState {
        if self.shared.is_write_open() {
            ChannelState::Open
        } else {
            ChannelState::Closed
        }
    }

    /// Returns the write timeout; `None` means infinite.
    pub fn write_timeout(&self) -> Option<Duration> {
        *self.timeout.lock()
    }

    /// Sets the write timeout used by subsequent writes.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) {
        *self.timeout.lock() = timeout;
    }

    /// Caps buffered-but-unread bytes at one chunk for all further writes.
    pub fn set_fixed_length(&self) {
        if !self.shared.is_fixed_length() {
            self.shared.set_fixed_length();
            debug!("pipe switched to fixed-length mode");
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if !self.shared.is_write_open() {
            return Err(Error::new(ErrorKind::EndClosed));
        }
        self.in_flight.enter()
    }

    /// Writes `buf`, blocking the thread while the pipe is full.
    ///
    /// The write timeout bounds only the wait for the first accepted byte;
    /// once part of `buf` is buffered the call waits for the rest. The
    /// returned count is short only if the write side closed mid-way.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let _guard = self.begin()?;
        self.shared.write_blocking(buf, deadline_after(self.write_timeout()))
    }

    /// Writes all of `buf`, blocking as needed.
    pub fn write_all(&self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            let n = self.write(buf)?;
            buf = &buf[n..];
        }
        Ok(())
    }

    /// Writes `buf` without blocking the thread.
    ///
    /// Honours the write timeout until the first byte is accepted, and
    /// `cancel` throughout. Bytes accepted before a cancellation stay in the
    /// pipe and are reported as a short count.
    pub async fn write_async(&self, buf: &[u8], cancel: Option<&CancellationToken>) -> Result<usize> {
        let _guard = self.begin()?;
        already_cancelled(cancel)?;
        let deadline = deadline_after(self.write_timeout());

        let mut written = 0;
        while written < buf.len() {
            let rest = &buf[written..];
            let deadline = if written == 0 { deadline } else { None };
            let step = tokio::select! {
                biased;
                result = poll_fn(|cx| self.shared.poll_write(cx, rest)) => result,
                _ = cancelled(cancel) => Err(Error::new(ErrorKind::Cancelled)),
                _ = elapsed(deadline) => Err(Error::new(ErrorKind::Timeout)),
            };
            match step {
                Ok(n) => written += n,
                Err(err) => return partial(written, err),
            }
        }
        Ok(written)
    }

    /// Writes all of `buf` without blocking the thread.
    pub async fn write_all_async(&self, mut buf: &[u8], cancel: Option<&CancellationToken>) -> Result<()> {
        while !buf.is_empty() {
            let n = self.write_async(buf, cancel).await?;
            buf = &buf[n..];
        }
        Ok(())
    }

    /// Closes the write side. Buffered bytes stay readable; afterwards the
    /// reader sees end-of-stream. Idempotent.
    pub fn close(&self) {
        if self.shared.close_write() {
            trace!("pipe write side closed");
        }
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.close();
    }
}
