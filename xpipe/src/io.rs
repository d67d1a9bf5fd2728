//! Bridges to the `std::io` and `futures::io` traits.
//!
//! The blocking impls go through the endpoint methods and so honour the
//! configured timeouts. The poll impls never time out.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::io::{AsyncRead, AsyncWrite};

use crate::channel::{PipeReader, PipeWriter};

impl io::Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        PipeReader::read(self, buf).map_err(Into::into)
    }
}

impl io::Read for &PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        PipeReader::read(self, buf).map_err(Into::into)
    }
}

impl io::Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        PipeWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        PipeWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsyncRead for PipeReader {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        self.shared().poll_read(cx, buf).map_err(Into::into)
    }
}

impl AsyncWrite for PipeWriter {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.shared().poll_write(cx, buf).map_err(Into::into)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.close();
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::thread;

    use futures::io::{AsyncReadExt, AsyncWriteExt};

    use crate::{pipe, Pipe, BYTE_CHUNK_SIZE};

    #[test]
    fn test_std_traits_across_threads() {
        let pipe = Pipe::new();
        pipe.set_fixed_length();
        let (mut writer, mut reader) = pipe.into_split();

        let data: Vec<u8> = (0..10 * BYTE_CHUNK_SIZE).map(|i| (i % 251) as u8).collect();
        let expected = data.clone();
        let producer = thread::spawn(move || {
            Write::write_all(&mut writer, &data).unwrap();
            // dropping the writer signals end-of-stream
        });

        let mut received = Vec::new();
        Read::read_to_end(&mut reader, &mut received).unwrap();
        producer.join().unwrap();
        assert_eq!(received, expected);
    }

    #[test]
    fn test_std_write_after_close_is_broken_pipe() {
        let (mut writer, _reader) = pipe();
        writer.close();
        let err = Write::write(&mut writer, b"x").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_futures_copy() {
        let (mut head, source) = pipe();
        let (mut sink, mut tail) = pipe();

        let pump = tokio::spawn(async move {
            let copied = futures::io::copy(source, &mut sink).await.unwrap();
            AsyncWriteExt::close(&mut sink).await.unwrap();
            copied
        });

        AsyncWriteExt::write_all(&mut head, b"through two pipes").await.unwrap();
        AsyncWriteExt::close(&mut head).await.unwrap();

        let mut out = Vec::new();
        AsyncReadExt::read_to_end(&mut tail, &mut out).await.unwrap();
        assert_eq!(out, b"through two pipes");
        assert_eq!(pump.await.unwrap(), 17);
    }
}
