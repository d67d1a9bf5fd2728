use log::{info, warn};
use std::time::Instant;
use xpipe::{chain, Chain, PipeConfig, BYTE_CHUNK_SIZE};

/// Pushes `size` bytes through `len` linked fixed-length pipes.
pub async fn run(size: usize, len: usize) {
    let Chain { head, tail, links } = chain(len, &PipeConfig::new().with_fixed_length(true));

    let start = Instant::now();
    let send = async move {
        let data = vec![0xCD; 16 * BYTE_CHUNK_SIZE];
        let mut sent = 0;
        while sent < size {
            let n = (size - sent).min(data.len());
            head.write_all_async(&data[..n], None).await.expect("Failed to write");
            sent += n;
        }
        head.close();
    };
    let recv = async move {
        let mut buf = vec![0u8; 16 * BYTE_CHUNK_SIZE];
        let mut received = 0;
        loop {
            match tail.read_async(&mut buf, None).await.expect("Failed to read") {
                0 => return received,
                n => received += n,
            }
        }
    };
    let ((), received) = futures::future::join(send, recv).await;
    let elapsed = start.elapsed();

    for link in links {
        if let Err(e) = link.await.expect("Link task panicked") {
            warn!("Link ended with error: {}", e);
        }
    }

    let speed = (received as f64 / 1024.0 / 1024.0) / elapsed.as_secs_f64();
    info!("Total received: {} MB", received / 1024 / 1024);
    info!("Time: {:.2} seconds", elapsed.as_secs_f64());
    info!("Speed: {:.2} MB/s", speed);
}
