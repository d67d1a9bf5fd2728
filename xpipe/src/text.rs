//! UTF-8 text helpers layered over the byte endpoints.

use tokio_util::sync::CancellationToken;

use crate::channel::{PipeReader, PipeWriter};
use crate::error::{Error, ErrorKind, Result};
use crate::TEXT_CHUNK_SIZE;

impl PipeWriter {
    /// Writes `text` as UTF-8, blocking as needed.
    pub fn write_text(&self, text: &str) -> Result<()> {
        for piece in text.as_bytes().chunks(TEXT_CHUNK_SIZE) {
            self.write_all(piece)?;
        }
        Ok(())
    }

    /// Writes `text` as UTF-8 without blocking the thread.
    pub async fn write_text_async(&self, text: &str) -> Result<()> {
        for piece in text.as_bytes().chunks(TEXT_CHUNK_SIZE) {
            self.write_all_async(piece, None).await?;
        }
        Ok(())
    }
}

impl PipeReader {
    /// Reads exactly `len` bytes and decodes them as UTF-8.
    ///
    /// Returns `Ok(None)` if the stream ends first.
    pub fn read_text(&self, len: usize) -> Result<Option<String>> {
        let mut bytes = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.read(&mut bytes[filled..])? {
                0 => return Ok(None),
                n => filled += n,
            }
        }
        decode(bytes).map(Some)
    }

    /// Reads exactly `len` bytes without blocking the thread.
    ///
    /// Returns `Ok(None)` if the stream ends first.
    pub async fn read_text_async(&self, len: usize, cancel: Option<&CancellationToken>) -> Result<Option<String>> {
        let mut bytes = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.read_async(&mut bytes[filled..], cancel).await? {
                0 => return Ok(None),
                n => filled += n,
            }
        }
        decode(bytes).map(Some)
    }
}

fn decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::new(ErrorKind::InvalidUtf8))
}
