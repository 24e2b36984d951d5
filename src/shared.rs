use std::sync::Arc;

use once_cell::sync::OnceCell;
use rayon::ThreadPool;
use tracing::error;

use crate::gate::{DefaultGate, HandleGate, HostRuntime, PlatformGate};
use crate::pool;

/// Process-lifetime holder for a shared worker pool.
///
/// Owns at most one pool, constructed exactly once no matter how many
/// threads race to request it. Concurrent first callers block until the
/// winner finishes building; every caller then observes the fully
/// constructed pool, which lives until process exit.
pub struct SharedPool<G: PlatformGate> {
    gate: G,
    cell: OnceCell<ThreadPool>,
}

impl<G: PlatformGate> SharedPool<G> {
    pub const fn new(gate: G) -> Self {
        Self {
            gate,
            cell: OnceCell::new(),
        }
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Returns the shared pool, constructing it with the default worker
    /// count on the first call from any thread.
    pub fn acquire(&self) -> &ThreadPool {
        self.gate.ensure_ready();
        self.cell
            .get_or_init(|| pool::build_pool(pool::default_thread_count()))
    }

    /// Pre-seeds the pool with an explicit worker count.
    ///
    /// Must run strictly before the first [`acquire`](Self::acquire); a
    /// second call once the pool exists is a contract violation and aborts
    /// the process.
    pub fn initialize(&self, threads: usize) {
        if self.cell.get().is_some() {
            abort_double_initialize();
        }
        self.gate.ensure_ready();
        self.cell.get_or_init(|| pool::build_pool(threads));
    }
}

impl SharedPool<HandleGate> {
    /// Gated-platform initializer: registers the host runtime handle first,
    /// then constructs the pool, so the handle is published before any pool
    /// use is permitted.
    pub fn initialize_with_host(&self, runtime: Arc<dyn HostRuntime>, threads: usize) {
        if self.cell.get().is_some() {
            abort_double_initialize();
        }
        self.gate.install(runtime);
        self.initialize(threads);
    }
}

fn abort_double_initialize() -> ! {
    error!(
        "shared worker pool initialized twice: the initializer must run \
         exactly once, before any pool use"
    );
    std::process::abort();
}

static SHARED: SharedPool<DefaultGate> = SharedPool::new(DefaultGate::new());

/// Returns the process-wide shared worker pool, constructing it on first
/// use. Callable from any thread, any number of times.
pub fn shared_pool() -> &'static ThreadPool {
    SHARED.acquire()
}

/// Startup hook fixing the worker-thread count before first pool use.
#[cfg(not(feature = "host-gated"))]
pub fn init(default_threads: usize) {
    SHARED.initialize(default_threads);
}

/// Startup hook for gated platforms: registers the host runtime handle and
/// fixes the worker-thread count. Host code must call this once, before any
/// asynchronous work is scheduled.
#[cfg(feature = "host-gated")]
pub fn init_with_host(runtime: Arc<dyn HostRuntime>, default_threads: usize) {
    SHARED.initialize_with_host(runtime, default_threads);
}

/// Thread-local host environment for interop with the embedding runtime.
#[cfg(feature = "host-gated")]
pub fn host_env() -> Result<crate::gate::EnvHandle, crate::error::AttachError> {
    SHARED.gate().attach_current_thread()
}
