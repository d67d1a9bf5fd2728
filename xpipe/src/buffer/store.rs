//! Ordered queue of chunks holding the unread bytes of a pipe.

use std::collections::VecDeque;

use super::chunk::Chunk;
use crate::BYTE_CHUNK_SIZE;

/// FIFO byte queue built from fixed-size chunks.
///
/// Only the front chunk may have been partially read and only the back
/// chunk may have free space, so memory tracks the backlog rather than the
/// largest single write.
#[derive(Debug)]
pub struct ChunkStore<const N: usize = BYTE_CHUNK_SIZE> {
    chunks: VecDeque<Chunk<N>>,
    len: usize,
}

impl<const N: usize> ChunkStore<N> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            chunks: VecDeque::new(),
            len: 0,
        }
    }

    /// Returns the total number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no bytes are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of chunks currently allocated.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Appends all of `data`, filling the last chunk before allocating.
    ///
    /// Returns the number of bytes appended.
    pub fn append(&mut self, mut data: &[u8]) -> usize {
        let total = data.len();
        while !data.is_empty() {
            if self.chunks.back().is_none_or(|chunk| chunk.remaining() == 0) {
                self.chunks.push_back(Chunk::new());
            }
            let Some(chunk) = self.chunks.back_mut() else { break };
            let n = chunk.write(data);
            data = &data[n..];
            self.len += n;
        }
        total - data.len()
    }

    /// Moves up to `buf.len()` bytes from the front of the store into `buf`.
    ///
    /// Returns the number of bytes moved.
    pub fn consume(&mut self, buf: &mut [u8]) -> usize {
        let mut read = 0;
        while read < buf.len() {
            let Some(front) = self.chunks.front_mut() else { break };
            let n = front.read(&mut buf[read..]);
            read += n;
            if front.is_drained() {
                self.chunks.pop_front();
            } else if n == 0 {
                break;
            }
        }
        self.len -= read;
        read
    }

    /// Drops every chunk.
    pub fn clear(&mut self) {
        self.chunks = VecDeque::new();
        self.len = 0;
    }
}

impl<const N: usize> Default for ChunkStore<N> {
    fn default() -> Self {
        Self::new()
    }
}
