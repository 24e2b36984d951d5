//! Lifecycle management for a process-wide shared worker pool.
//!
//! The pool itself is a [`rayon::ThreadPool`]; this crate owns the lazy,
//! exactly-once construction around it, an optional startup initializer
//! that fixes the worker count, and the platform gate required on embedded
//! hosts where the pool must not run before a host runtime handle is
//! registered.

mod error;
mod gate;
mod pool;
mod shared;

pub use error::AttachError;
pub use gate::{DefaultGate, EnvHandle, HandleGate, HostRuntime, OpenGate, PlatformGate};
pub use pool::DEFAULT_WORKER_THREADS;
pub use rayon::ThreadPool;
#[cfg(not(feature = "host-gated"))]
pub use shared::init;
#[cfg(feature = "host-gated")]
pub use shared::{host_env, init_with_host};
pub use shared::{SharedPool, shared_pool};
