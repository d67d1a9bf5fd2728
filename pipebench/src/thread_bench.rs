use log::info;
use std::thread;
use std::time::Instant;
use xpipe::{Pipe, BYTE_CHUNK_SIZE};

const WRITE_SIZE: usize = 64 * 1024;

/// Pushes `size` bytes from one thread to another through a single pipe.
pub fn run(size: usize, fixed_length: bool) {
    let pipe = Pipe::new();
    if fixed_length {
        pipe.set_fixed_length();
    }
    let (writer, reader) = pipe.into_split();

    let start = Instant::now();
    let producer = thread::spawn(move || {
        let data = vec![0xAB; WRITE_SIZE];
        let mut sent = 0;
        while sent < size {
            let len = WRITE_SIZE.min(size - sent);
            writer.write_all(&data[..len]).expect("Failed to write");
            sent += len;
        }
        // dropping the writer ends the stream
    });

    let mut buf = vec![0u8; 4 * BYTE_CHUNK_SIZE];
    let mut received = 0;
    loop {
        let n = reader.read(&mut buf).expect("Failed to read");
        if n == 0 {
            break;
        }
        received += n;
    }
    producer.join().expect("Producer thread panicked");

    let elapsed = start.elapsed();
    let speed = (received as f64 / 1024.0 / 1024.0) / elapsed.as_secs_f64();
    if received != size {
        info!("Size mismatch: sent {} bytes, received {}", size, received);
    }
    info!("Total received: {} MB", received / 1024 / 1024);
    info!("Time: {:.2} seconds", elapsed.as_secs_f64());
    info!("Speed: {:.2} MB/s", speed);
}
