//! Pumping bytes from one pipe into another.

use log::{debug, error};
use tokio::task::JoinHandle;

use crate::channel::{PipeReader, PipeWriter};
use crate::config::PipeConfig;
use crate::error::Result;
use crate::pipe::Pipe;
use crate::BYTE_CHUNK_SIZE;

/// Copies from `from` into `to` until `from` reaches end-of-stream.
///
/// Returns the number of bytes copied. Neither endpoint is closed.
pub async fn copy(from: &PipeReader, to: &PipeWriter) -> Result<u64> {
    let mut buf = vec![0u8; BYTE_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = from.read_async(&mut buf, None).await?;
        if n == 0 {
            return Ok(total);
        }
        to.write_all_async(&buf[..n], None).await?;
        total += n as u64;
    }
}

/// Blocking counterpart of [`copy`].
pub fn copy_blocking(from: &PipeReader, to: &PipeWriter) -> Result<u64> {
    let mut buf = vec![0u8; BYTE_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = from.read(&mut buf)?;
        if n == 0 {
            return Ok(total);
        }
        to.write_all(&buf[..n])?;
        total += n as u64;
    }
}

/// Spawns a task copying `from` into `to`, closing both once the copy ends.
pub fn link(from: PipeReader, to: PipeWriter) -> JoinHandle<Result<u64>> {
    tokio::spawn(async move {
        let result = copy(&from, &to).await;
        match &result {
            Ok(total) => debug!("pipe link finished after {} bytes", total),
            Err(e) => error!("pipe link failed: {}", e),
        }
        from.close();
        to.close();
        result
    })
}

/// A sequence of pipes, each feeding the next.
#[derive(Debug)]
pub struct Chain {
    /// Write endpoint of the first pipe.
    pub head: PipeWriter,
    /// Read endpoint of the last pipe.
    pub tail: PipeReader,
    /// One task per link between consecutive pipes.
    pub links: Vec<JoinHandle<Result<u64>>>,
}

/// Builds `len` pipes configured by `config` and links them head to tail.
///
/// Must be called within a tokio runtime. A `len` of zero is treated as one.
pub fn chain(len: usize, config: &PipeConfig) -> Chain {
    let (head, mut tail) = Pipe::with_config(config).into_split();
    let mut links = Vec::with_capacity(len.saturating_sub(1));
    for _ in 1..len {
        let (writer, reader) = Pipe::with_config(config).into_split();
        links.push(link(tail, writer));
        tail = reader;
    }
    Chain { head, tail, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_copy_blocking_between_threads() {
        let (head, source) = Pipe::new().into_split();
        let (sink, tail) = Pipe::new().into_split();

        let pump = thread::spawn(move || {
            let copied = copy_blocking(&source, &sink);
            sink.close();
            copied
        });

        head.write_text("relay").unwrap();
        head.close();

        assert_eq!(tail.read_text(5).unwrap().as_deref(), Some("relay"));
        let mut buf = [0u8; 1];
        assert_eq!(tail.read(&mut buf), Ok(0));
        assert_eq!(pump.join().unwrap(), Ok(5));
    }

    #[tokio::test]
    async fn test_chain_closes_down_the_line() {
        let chain = chain(3, &PipeConfig::default());
        assert_eq!(chain.links.len(), 2);

        chain.head.write_all_async(b"abc", None).await.unwrap();
        chain.head.close();

        let mut out = [0u8; 8];
        let mut received = Vec::new();
        loop {
            let n = chain.tail.read_async(&mut out, None).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&out[..n]);
        }
        assert_eq!(received, b"abc");

        for link in chain.links {
            assert_eq!(link.await.unwrap(), Ok(3));
        }
    }
}
