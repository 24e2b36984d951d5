use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

/// Worker-thread count used when neither the initializer nor the
/// `HOSTPOOL_THREADS` environment variable supplied one.
pub const DEFAULT_WORKER_THREADS: usize = 20;

const WORKER_STACK_SIZE: usize = 2 * 1024 * 1024;

fn parse_thread_count(raw: &str) -> Option<usize> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<usize>().ok().filter(|value| *value > 0)
}

fn configured_thread_count() -> Option<usize> {
    std::env::var("HOSTPOOL_THREADS")
        .ok()
        .and_then(|raw| parse_thread_count(&raw))
}

/// Thread count the lazy path uses when no initializer ran first.
pub(crate) fn default_thread_count() -> usize {
    configured_thread_count().unwrap_or(DEFAULT_WORKER_THREADS)
}

pub(crate) fn build_pool(threads: usize) -> ThreadPool {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|idx| format!("hostpool-worker-{idx}"))
        .stack_size(WORKER_STACK_SIZE)
        .build()
        .expect("failed to start shared worker pool");
    info!(threads, "shared worker pool started");
    pool
}
