use log::info;

mod chain_bench;
mod thread_bench;

const DATA_SIZE: usize = 100 * 1024 * 1024; // 100 MB
const CHAIN_LEN: usize = 8;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("=== Blocking threads, unbounded ===");
    thread_bench::run(DATA_SIZE, false);

    info!("=== Blocking threads, fixed length ===");
    thread_bench::run(DATA_SIZE, true);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    info!("=== Async chain of {} pipes ===", CHAIN_LEN);
    runtime.block_on(chain_bench::run(DATA_SIZE, CHAIN_LEN));
}
