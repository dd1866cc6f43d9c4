use thiserror::Error;

/// Errors returned to producers posting onto a relay.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Relay is closed")]
    Closed,

    #[error("Relay queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Unrecognized wire message tag {0}")]
    UnrecognizedTag(u32),

    #[error("Malformed arguments for wire tag {tag}: {reason}")]
    Decode { tag: u32, reason: String },

    /// The dispatcher task ended without draining, e.g. it was cancelled
    /// because its runtime shut down.
    #[error("Dispatcher failed: {0}")]
    Dispatch(String),

    /// `close()` was awaited from inside one of this relay's own callbacks.
    #[error("Relay cannot be closed from inside its own delegate callback")]
    CloseFromDelegate,
}

impl From<tokio::task::JoinError> for RelayError {
    fn from(err: tokio::task::JoinError) -> Self {
        RelayError::Dispatch(err.to_string())
    }
}

/// Failure reported by a delegate callback. The relay logs and counts it,
/// then moves on to the next event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Delegate failed: {0}")]
pub struct DelegateError(pub String);

impl DelegateError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
