//! # XPipe - An In-Process Byte Pipe
//!
//! XPipe connects a producer and a consumer running on different threads
//! or tasks through an in-memory FIFO byte buffer with stream semantics:
//!
//! - **Two endpoints**: a [`PipeWriter`] and a [`PipeReader`] that close independently
//! - **Blocking and async calls**: both routed through the same shared state
//! - **Timeouts and cancellation**: partial progress is always reported, never rolled back
//! - **Backpressure**: fixed-length mode caps buffered bytes at one chunk
//! - **Bounded memory**: once the reader is gone, writes are accepted and dropped
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐                                   ┌──────────────┐
//! │  PipeWriter  │                                   │  PipeReader  │
//! │ write/async  │                                   │ read/async   │
//! └──────┬───────┘                                   └──────▲───────┘
//!        │        ┌─────────────────────────────────┐       │
//!        └───────▶│ Shared: Mutex + 2 Condvars/Wakers│───────┘
//!                 │  ┌────────────┐ ┌────────────┐  │
//!                 │  │ ChunkStore │ │  Capacity  │  │
//!                 │  │ [c][c][c]  │ │   Policy   │  │
//!                 │  └────────────┘ └────────────┘  │
//!                 └─────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use xpipe::Pipe;
//!
//! let pipe = Pipe::new();
//! pipe.writer().write_all(b"hello").unwrap();
//! pipe.writer().close();
//!
//! let mut buf = [0u8; 16];
//! let n = pipe.reader().read(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"hello");
//! assert_eq!(pipe.reader().read(&mut buf).unwrap(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod channel;
pub mod config;
pub mod copy;
pub mod error;
pub mod policy;

mod io;
mod pipe;
mod shared;
mod text;


// Re-export commonly used types
pub use channel::{ChannelState, PipeReader, PipeWriter};
pub use config::PipeConfig;
pub use copy::{chain, copy, copy_blocking, link, Chain};
pub use error::{Error, ErrorKind, Result};
pub use pipe::{pipe, Pipe};
pub use tokio_util::sync::CancellationToken;

/// Chunk size in bytes; the unit of allocation and the fixed-length cap.
pub const BYTE_CHUNK_SIZE: usize = 1024;

/// Piece size used by the text helpers.
pub const TEXT_CHUNK_SIZE: usize = 4096;
