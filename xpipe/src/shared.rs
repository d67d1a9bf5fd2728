//! State shared by the two endpoints of a pipe.
//!
//! Every access to the chunk store and the open flags goes through one
//! mutex. Thread-blocking callers park on a condvar; suspending callers
//! leave a waker in the locked state. Both are woken by the same
//! `notify`, so the transfer logic exists once for both call styles.

use std::task::{Context, Poll, Waker};
use std::time::Instant;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::buffer::ChunkStore;
use crate::config::expired;
use crate::error::{partial, Error, ErrorKind, Result};
use crate::policy::CapacityPolicy;

#[derive(Debug, Clone, Copy)]
enum Signal {
    /// Bytes were appended or the write side closed.
    Data,
    /// Bytes were consumed or the read side closed.
    Space,
}

#[derive(Debug)]
struct State {
    store: ChunkStore,
    policy: CapacityPolicy,
    write_open: bool,
    read_open: bool,
    reader: Option<Waker>,
    writer: Option<Waker>,
}

impl State {
    /// Buffers as much of `buf` as the policy allows.
    ///
    /// Returns `None` when nothing can be accepted yet. With the read side
    /// gone every byte is accepted and dropped.
    fn accept(&mut self, buf: &[u8]) -> Option<usize> {
        if !self.read_open {
            return Some(buf.len());
        }
        let room = self.policy.accept_now(buf.len(), self.store.len());
        if room == 0 {
            return None;
        }
        Some(self.store.append(&buf[..room]))
    }

    /// Moves buffered bytes into `buf`.
    ///
    /// Returns `None` while the store is empty and the write side is open;
    /// `Some(0)` marks end-of-stream.
    fn take(&mut self, buf: &mut [u8]) -> Option<usize> {
        if !self.store.is_empty() {
            return Some(self.store.consume(buf));
        }
        if self.write_open { None } else { Some(0) }
    }

    fn park(&mut self, signal: Signal, waker: &Waker) {
        let slot = match signal {
            Signal::Data => &mut self.reader,
            Signal::Space => &mut self.writer,
        };
        if !slot.as_ref().is_some_and(|current| current.will_wake(waker)) {
            *slot = Some(waker.clone());
        }
    }
}

#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<State>,
    data_available: Condvar,
    space_available: Condvar,
}

impl Shared {
    pub(crate) fn new(policy: CapacityPolicy) -> Self {
        Self {
            state: Mutex::new(State {
                store: ChunkStore::new(),
                policy,
                write_open: true,
                read_open: true,
                reader: None,
                writer: None,
            }),
            data_available: Condvar::new(),
            space_available: Condvar::new(),
        }
    }

    fn notify(&self, state: &mut State, signal: Signal) {
        let (condvar, waker) = match signal {
            Signal::Data => (&self.data_available, state.reader.take()),
            Signal::Space => (&self.space_available, state.writer.take()),
        };
        condvar.notify_all();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    fn wait(&self, state: &mut MutexGuard<'_, State>, signal: Signal, deadline: Option<Instant>) {
        let condvar = match signal {
            Signal::Data => &self.data_available,
            Signal::Space => &self.space_available,
        };
        match deadline {
            Some(deadline) => {
                let _ = condvar.wait_until(state, deadline);
            }
            None => condvar.wait(state),
        }
    }

    pub(crate) fn is_write_open(&self) -> bool {
        self.state.lock().write_open
    }

    pub(crate) fn is_read_open(&self) -> bool {
        self.state.lock().read_open
    }

    pub(crate) fn buffered(&self) -> usize {
        self.state.lock().store.len()
    }

    #[cfg(test)]
    pub(crate) fn chunk_count(&self) -> usize {
        self.state.lock().store.chunk_count()
    }

    pub(crate) fn set_fixed_length(&self) {
        self.state.lock().policy.set_fixed_length();
    }

    pub(crate) fn is_fixed_length(&self) -> bool {
        self.state.lock().policy.is_fixed_length()
    }

    /// Closes the write side. Returns false if it was already closed.
    pub(crate) fn close_write(&self) -> bool {
        let mut state = self.state.lock();
        if !state.write_open {
            return false;
        }
        state.write_open = false;
        self.notify(&mut state, Signal::Data);
        self.notify(&mut state, Signal::Space);
        true
    }

    /// Closes the read side and discards everything buffered.
    /// Returns false if it was already closed.
    pub(crate) fn close_read(&self) -> bool {
        let mut state = self.state.lock();
        if !state.read_open {
            return false;
        }
        state.read_open = false;
        state.store.clear();
        self.notify(&mut state, Signal::Data);
        self.notify(&mut state, Signal::Space);
        true
    }

    /// Writes all of `buf`, blocking the thread while the policy has no room.
    ///
    /// `deadline` bounds only the wait for the first accepted byte. Once a
    /// prefix is buffered the call waits for the rest, stopping early only
    /// if the write side closes.
    pub(crate) fn write_blocking(&self, buf: &[u8], deadline: Option<Instant>) -> Result<usize> {
        let mut state = self.state.lock();
        let mut written = 0;
        loop {
            if !state.write_open {
                return partial(written, Error::new(ErrorKind::EndClosed));
            }
            if written == buf.len() {
                return Ok(written);
            }
            if let Some(n) = state.accept(&buf[written..]) {
                written += n;
                self.notify(&mut state, Signal::Data);
                continue;
            }
            let deadline = if written == 0 { deadline } else { None };
            if expired(deadline) {
                return Err(Error::new(ErrorKind::Timeout));
            }
            self.wait(&mut state, Signal::Space, deadline);
        }
    }

    /// Reads into `buf`, blocking the thread while the pipe is empty.
    pub(crate) fn read_blocking(&self, buf: &mut [u8], deadline: Option<Instant>) -> Result<usize> {
        let mut state = self.state.lock();
        loop {
            if !state.read_open {
                return Err(Error::new(ErrorKind::EndClosed));
            }
            if buf.is_empty() {
                return Ok(0);
            }
            if let Some(n) = state.take(buf) {
                if n > 0 {
                    self.notify(&mut state, Signal::Space);
                }
                return Ok(n);
            }
            if expired(deadline) {
                return Err(Error::new(ErrorKind::Timeout));
            }
            self.wait(&mut state, Signal::Data, deadline);
        }
    }

    /// Buffers a prefix of `buf`, or registers the task until there is room.
    pub(crate) fn poll_write(&self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize>> {
        let mut state = self.state.lock();
        if !state.write_open {
            return Poll::Ready(Err(Error::new(ErrorKind::EndClosed)));
        }
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        match state.accept(buf) {
            Some(n) => {
                self.notify(&mut state, Signal::Data);
                Poll::Ready(Ok(n))
            }
            None => {
                state.park(Signal::Space, cx.waker());
                Poll::Pending
            }
        }
    }

    /// Reads into `buf`, or registers the task until data or end-of-stream.
    pub(crate) fn poll_read(&self, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<Result<usize>> {
        let mut state = self.state.lock();
        if !state.read_open {
            return Poll::Ready(Err(Error::new(ErrorKind::EndClosed)));
        }
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        match state.take(buf) {
            Some(n) => {
                if n > 0 {
                    self.notify(&mut state, Signal::Space);
                }
                Poll::Ready(Ok(n))
            }
            None => {
                state.park(Signal::Data, cx.waker());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use futures::task::noop_waker;

    fn fixed(limit: usize) -> Shared {
        let mut policy = CapacityPolicy::new(limit);
        policy.set_fixed_length();
        Shared::new(policy)
    }

    #[test]
    fn test_blocking_fifo() {
        let shared = Shared::new(CapacityPolicy::default());
        for part in [&b"1"[..], b"2", b"3"] {
            assert_eq!(shared.write_blocking(part, None), Ok(1));
        }
        let mut out = [0u8; 3];
        assert_eq!(shared.read_blocking(&mut out, None), Ok(3));
        assert_eq!(&out, b"123");
    }

    #[test]
    fn test_zero_deadline_read_times_out() {
        let shared = Shared::new(CapacityPolicy::default());
        let mut out = [0u8; 1];
        let err = shared.read_blocking(&mut out, Some(Instant::now())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_zero_deadline_only_bounds_first_byte() {
        let shared = Arc::new(fixed(4));
        assert_eq!(shared.write_blocking(b"abcd", Some(Instant::now())), Ok(4));
        let err = shared.write_blocking(b"e", Some(Instant::now())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(shared.buffered(), 4);

        let mut out = [0u8; 2];
        assert_eq!(shared.read_blocking(&mut out, None), Ok(2));

        // Two bytes fit at once; the rest waits past the deadline.
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || shared.write_blocking(b"efghij", Some(Instant::now())))
        };
        thread::sleep(Duration::from_millis(10));
        assert_eq!(shared.buffered(), 4);

        let mut received = out.to_vec();
        let mut out = [0u8; 3];
        while received.len() < 10 {
            let n = shared.read_blocking(&mut out, Some(Instant::now() + Duration::from_secs(5))).unwrap();
            received.extend_from_slice(&out[..n]);
        }
        assert_eq!(writer.join().unwrap(), Ok(6));
        assert_eq!(received, b"abcdefghij");
    }

    #[test]
    fn test_blocked_writer_resumes_after_read() {
        let shared = Arc::new(fixed(4));
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || shared.write_blocking(b"abcdefghij", None))
        };

        let mut received = Vec::new();
        let mut out = [0u8; 3];
        while received.len() < 10 {
            let n = shared.read_blocking(&mut out, Some(Instant::now() + Duration::from_secs(5))).unwrap();
            received.extend_from_slice(&out[..n]);
        }
        assert_eq!(writer.join().unwrap(), Ok(10));
        assert_eq!(received, b"abcdefghij");
    }

    #[test]
    fn test_close_read_discards_and_unblocks_writer() {
        let shared = Arc::new(fixed(4));
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || shared.write_blocking(&[1u8; 64], None))
        };
        thread::sleep(Duration::from_millis(10));
        assert!(shared.close_read());
        assert!(!shared.close_read());

        // The remainder is dropped, and the write reports full acceptance.
        assert_eq!(writer.join().unwrap(), Ok(64));
        assert_eq!(shared.buffered(), 0);
        assert_eq!(shared.chunk_count(), 0);
    }

    #[test]
    fn test_close_write_wakes_reader_with_eof() {
        let shared = Arc::new(Shared::new(CapacityPolicy::default()));
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut out = [0u8; 8];
                shared.read_blocking(&mut out, None)
            })
        };
        thread::sleep(Duration::from_millis(10));
        assert!(shared.close_write());
        assert_eq!(reader.join().unwrap(), Ok(0));
    }

    #[test]
    fn test_poll_parks_and_wakes() {
        let shared = fixed(2);
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        assert_eq!(shared.poll_write(&mut cx, b"abc"), Poll::Ready(Ok(2)));
        assert_eq!(shared.poll_write(&mut cx, b"c"), Poll::Pending);
        assert!(shared.state.lock().writer.is_some());

        let mut out = [0u8; 1];
        assert_eq!(shared.poll_read(&mut cx, &mut out), Poll::Ready(Ok(1)));
        assert!(shared.state.lock().writer.is_none());
        assert_eq!(shared.poll_write(&mut cx, b"c"), Poll::Ready(Ok(1)));

        let mut out = [0u8; 4];
        assert_eq!(shared.poll_read(&mut cx, &mut out), Poll::Ready(Ok(2)));
        assert_eq!(&out[..2], b"bc");
        assert_eq!(shared.poll_read(&mut cx, &mut out), Poll::Pending);
        assert!(shared.state.lock().reader.is_some());
    }
}
