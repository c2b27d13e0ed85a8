use std::error::Error;
use std::fmt;

/// Errors surfaced by the pool, either synchronously from `submit` or
/// later from `JoinHandle::get`.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub enum SpawnError {
    /// Submission attempted after shutdown began; nothing was queued.
    PoolClosed,
    /// The task panicked during execution; the payload is kept as text
    /// and re-raised on every read of the handle.
    Panicked(String),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::PoolClosed => write!(f, "thread pool is shut down"),
            SpawnError::Panicked(msg) => write!(f, "task panicked: {}", msg),
        }
    }
}

impl Error for SpawnError {}

pub type SpawnResult<T> = Result<T, SpawnError>;
