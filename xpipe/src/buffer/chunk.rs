//! Fixed-capacity storage block used by the chunk store.
//!
//! Unlike a ring, a chunk never wraps: bytes are written at the tail
//! cursor and read from the head cursor until both reach the end, after
//! which the chunk is discarded.

/// A fixed-size block of bytes with independent read and write cursors.
#[derive(Debug)]
pub struct Chunk<const N: usize> {
    /// The underlying storage.
    buffer: Box<[u8]>,

    /// Read cursor.
    head: usize,

    /// Write cursor.
    tail: usize,
}

impl<const N: usize> Chunk<N> {
    /// Creates a new empty chunk.
    pub fn new() -> Self {
        Self {
            buffer: vec![0u8; N].into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    /// Returns the number of unread bytes.
    #[inline]
    pub const fn readable(&self) -> usize {
        self.tail - self.head
    }

    /// Returns the number of bytes that can still be written.
    #[inline]
    pub const fn remaining(&self) -> usize {
        N - self.tail
    }

    /// Returns true once every byte the chunk can hold has been written and read.
    #[inline]
    pub const fn is_drained(&self) -> bool {
        self.head == N
    }

    /// Writes data at the write cursor.
    ///
    /// Returns the number of bytes written.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let to_write = std::cmp::min(data.len(), self.remaining());
        self.buffer[self.tail..self.tail + to_write].copy_from_slice(&data[..to_write]);
        self.tail += to_write;
        to_write
    }

    /// Reads data from the read cursor.
    ///
    /// Returns the number of bytes read.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let to_read = std::cmp::min(buf.len(), self.readable());
        buf[..to_read].copy_from_slice(&self.buffer[self.head..self.head + to_read]);
        self.head += to_read;
        to_read
    }
}

impl<const N: usize> Default for Chunk<N> {
    fn default() -> Self {
        Self::new()
    }
}
