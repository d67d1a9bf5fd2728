//! Pipe construction and the combined handle.

use std::sync::Arc;

use log::trace;

use crate::channel::{PipeReader, PipeWriter};
use crate::config::PipeConfig;
use crate::policy::CapacityPolicy;
use crate::shared::Shared;

/// An in-memory byte pipe: a write endpoint and a read endpoint over one
/// shared FIFO buffer.
///
/// The buffer lives until both endpoints are gone.
#[derive(Debug)]
pub struct Pipe {
    writer: PipeWriter,
    reader: PipeReader,
}

impl Pipe {
    /// Creates an unbounded pipe with infinite timeouts.
    pub fn new() -> Self {
        Self::with_config(&PipeConfig::default())
    }

    /// Creates a pipe from `config`.
    pub fn with_config(config: &PipeConfig) -> Self {
        let mut policy = CapacityPolicy::default();
        if config.fixed_length {
            policy.set_fixed_length();
        }
        let shared = Arc::new(Shared::new(policy));
        trace!("pipe created: {:?}", config);

        Self {
            writer: PipeWriter::new(shared.clone(), config.write_timeout),
            reader: PipeReader::new(shared, config.read_timeout),
        }
    }

    /// Returns the write endpoint.
    pub fn writer(&self) -> &PipeWriter {
        &self.writer
    }

    /// Returns the read endpoint.
    pub fn reader(&self) -> &PipeReader {
        &self.reader
    }

    /// Switches to fixed-length mode; see [`PipeWriter::set_fixed_length`].
    pub fn set_fixed_length(&self) {
        self.writer.set_fixed_length();
    }

    /// Returns the number of buffered, unread bytes.
    pub fn buffered(&self) -> usize {
        self.reader.available()
    }

    /// Splits the pipe into its two endpoints.
    pub fn into_split(self) -> (PipeWriter, PipeReader) {
        (self.writer, self.reader)
    }
}

impl Default for Pipe {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates an unbounded pipe and returns its two endpoints.
pub fn pipe() -> (PipeWriter, PipeReader) {
    Pipe::new().into_split()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelState;
    use crate::error::ErrorKind;
    use crate::BYTE_CHUNK_SIZE;
    use std::time::Duration;

    #[test]
    fn test_config_is_applied() {
        let config = PipeConfig::new()
            .with_fixed_length(true)
            .with_read_timeout(Some(Duration::ZERO))
            .with_write_timeout(Some(Duration::from_secs(1)));
        let pipe = Pipe::with_config(&config);

        assert_eq!(pipe.reader().read_timeout(), Some(Duration::ZERO));
        assert_eq!(pipe.writer().write_timeout(), Some(Duration::from_secs(1)));

        pipe.writer().set_write_timeout(Some(Duration::ZERO));
        assert_eq!(pipe.writer().write(&[0u8; BYTE_CHUNK_SIZE]), Ok(BYTE_CHUNK_SIZE));
        assert_eq!(pipe.writer().write(&[0u8]).unwrap_err().kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_split_and_drop_closes() {
        let (writer, reader) = pipe();
        writer.write_all(b"tail").unwrap();
        drop(writer);

        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf), Ok(4));
        assert_eq!(reader.read(&mut buf), Ok(0));
        assert_eq!(reader.state(), ChannelState::Open);

        reader.close();
        assert_eq!(reader.state(), ChannelState::Closed);
        assert_eq!(reader.read(&mut buf).unwrap_err().kind(), ErrorKind::EndClosed);
    }
}
