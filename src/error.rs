use thiserror::Error;

/// Recoverable failures on the host-runtime attachment path.
///
/// Contract violations (double initialization, pool use before the host
/// handle is registered) never appear here: those abort the process.
#[derive(Debug, Error)]
pub enum AttachError {
    /// The host runtime refused to attach the calling thread. The shared
    /// pool remains valid and the caller may retry.
    #[error("host runtime refused to attach current thread: {reason}")]
    Refused { reason: String },
}

impl AttachError {
    pub fn refused(reason: impl Into<String>) -> Self {
        AttachError::Refused {
            reason: reason.into(),
        }
    }
}
