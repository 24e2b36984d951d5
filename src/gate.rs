use std::ffi::c_void;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::error;

use crate::error::AttachError;

/// Opaque per-thread execution-environment handle produced by
/// [`HostRuntime::attach_current_thread`].
///
/// Host environments are thread-affine, so the handle is deliberately
/// neither `Send` nor `Sync`.
#[derive(Debug, Clone, Copy)]
pub struct EnvHandle {
    raw: *mut c_void,
}

impl EnvHandle {
    pub fn from_raw(raw: *mut c_void) -> Self {
        Self { raw }
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.raw
    }
}

/// Host execution environment (e.g. an embedded virtual machine) that must
/// be registered before the shared pool may be used on gated platforms.
pub trait HostRuntime: Send + Sync {
    /// Attaches the calling thread to the host runtime.
    ///
    /// Failure here reflects transient host trouble, not misuse: the caller
    /// may retry, and the shared pool stays valid throughout.
    fn attach_current_thread(&self) -> Result<EnvHandle, AttachError>;
}

/// Platform precondition checked before every pool acquisition.
pub trait PlatformGate: Send + Sync {
    /// Returns normally when pool construction is permitted; otherwise logs
    /// a fatal diagnostic and aborts the process.
    fn ensure_ready(&self);
}

/// Gate for platforms with no registration precondition.
#[derive(Default)]
pub struct OpenGate;

impl OpenGate {
    pub const fn new() -> Self {
        OpenGate
    }
}

impl PlatformGate for OpenGate {
    fn ensure_ready(&self) {}
}

/// Gate for embedded hosts: pool use is forbidden until a [`HostRuntime`]
/// handle has been registered through the explicit initializer.
pub struct HandleGate {
    runtime: OnceCell<Arc<dyn HostRuntime>>,
}

impl HandleGate {
    pub const fn new() -> Self {
        Self {
            runtime: OnceCell::new(),
        }
    }

    /// Records the host runtime handle. Write-once; the cell publishes the
    /// handle atomically to every later gate check.
    pub(crate) fn install(&self, runtime: Arc<dyn HostRuntime>) {
        let _ = self.runtime.set(runtime);
    }

    pub fn is_ready(&self) -> bool {
        self.runtime.get().is_some()
    }

    /// Attaches the calling thread to the registered host runtime.
    ///
    /// Aborts if the handle was never registered, the same misuse as
    /// acquiring the pool early. A refused attachment comes back as a
    /// recoverable [`AttachError`].
    pub fn attach_current_thread(&self) -> Result<EnvHandle, AttachError> {
        match self.runtime.get() {
            Some(runtime) => runtime.attach_current_thread(),
            None => abort_missing_handle(),
        }
    }
}

impl Default for HandleGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformGate for HandleGate {
    fn ensure_ready(&self) {
        if self.runtime.get().is_none() {
            abort_missing_handle();
        }
    }
}

fn abort_missing_handle() -> ! {
    error!(
        "host runtime handle not registered: the embedding application must \
         call init_with_host() at startup before any shared-pool use"
    );
    std::process::abort();
}

/// Gate wired into the process-wide singleton, selected at build time.
#[cfg(feature = "host-gated")]
pub type DefaultGate = HandleGate;
/// Gate wired into the process-wide singleton, selected at build time.
#[cfg(not(feature = "host-gated"))]
pub type DefaultGate = OpenGate;

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHost;

    impl HostRuntime for NullHost {
        fn attach_current_thread(&self) -> Result<EnvHandle, AttachError> {
            Ok(EnvHandle::from_raw(std::ptr::null_mut()))
        }
    }

    #[test]
    fn handle_gate_reports_readiness_after_install() {
        let gate = HandleGate::new();
        assert!(!gate.is_ready());
        gate.install(Arc::new(NullHost));
        assert!(gate.is_ready());
        gate.ensure_ready();
    }

    #[test]
    fn install_is_write_once() {
        let gate = HandleGate::new();
        gate.install(Arc::new(NullHost));
        let first = Arc::clone(gate.runtime.get().unwrap());
        gate.install(Arc::new(NullHost));
        assert!(Arc::ptr_eq(&first, gate.runtime.get().unwrap()));
    }
}
