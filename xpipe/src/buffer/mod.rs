//! Buffer management for the pipe.
//!
//! This module provides:
//! - Chunk: fixed-capacity block with read and write cursors
//! - ChunkStore: FIFO queue of chunks holding unread bytes

mod chunk;
mod store;

pub use chunk::Chunk;
pub use store::ChunkStore;
