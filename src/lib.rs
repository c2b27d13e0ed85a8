//! Bounded auto-growing worker-thread pool with blocking result handles.
//!
//! # Features
//! - FIFO task queue shared by all workers behind a single lock
//! - Reactive growth: a worker is added only when none is idle, up to a
//!   fixed ceiling
//! - Write-once [`JoinHandle`] with a blocking, repeatable `get()`
//! - Panic isolation: a failing task surfaces its failure through its
//!   handle and never kills the worker
//! - Graceful shutdown that drains the queue and joins every worker

pub mod errors;
pub mod handle;
pub mod model;
pub mod pool;

pub use errors::{SpawnError, SpawnResult};
pub use handle::JoinHandle;
pub use model::PoolMetrics;
pub use pool::{Config, ThreadPool, DEFAULT_MAX_WORKERS};
