use super::{
    errors::SpawnError,
    handle::{self, JoinHandle},
    model::PoolMetrics,
};
use std::{
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use log::{debug, trace};
use parking_lot::{Condvar, Mutex};

/// Ceiling on the number of workers a default-configured pool may grow to.
pub const DEFAULT_MAX_WORKERS: usize = 16;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Pool sizing configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workers started eagerly at construction, clamped to `[0, max_workers]`.
    pub initial_workers: usize,
    /// Hard ceiling the growth policy never exceeds. Clamped to at least 1.
    pub max_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_workers: num_cpus::get().min(DEFAULT_MAX_WORKERS),
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl Config {
    /// A pool that starts empty and grows on demand up to `max_workers`.
    pub fn on_demand(max_workers: usize) -> Self {
        Self {
            initial_workers: 0,
            max_workers,
        }
    }
}

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    task_available: Condvar,
    running: AtomicBool,
    idle_workers: AtomicUsize,
    worker_count: AtomicUsize,
    submitted_tasks: AtomicUsize,
    completed_tasks: AtomicUsize,
    failed_tasks: AtomicUsize,
}

/// Bounded auto-growing worker-thread pool.
///
/// Tasks are queued FIFO and executed by OS threads. Submission returns a
/// [`JoinHandle`] immediately; if no worker is idle and the ceiling has
/// not been reached, one extra worker is spawned reactively. Dropping the
/// pool (or calling [`shutdown`](ThreadPool::shutdown)) stops accepting
/// work, lets the queue drain, and joins every worker.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    max_workers: usize,
}

impl ThreadPool {
    /// Creates a pool with `initial_workers` threads and the default
    /// worker ceiling of [`DEFAULT_MAX_WORKERS`].
    pub fn new(initial_workers: usize) -> Self {
        Self::with_config(Config {
            initial_workers,
            ..Default::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let max_workers = config.max_workers.max(1);
        let initial = config.initial_workers.min(max_workers);

        let pool = ThreadPool {
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::new()),
                task_available: Condvar::new(),
                running: AtomicBool::new(true),
                idle_workers: AtomicUsize::new(0),
                worker_count: AtomicUsize::new(0),
                submitted_tasks: AtomicUsize::new(0),
                completed_tasks: AtomicUsize::new(0),
                failed_tasks: AtomicUsize::new(0),
            }),
            workers: Mutex::new(Vec::with_capacity(max_workers)),
            max_workers,
        };
        pool.add_workers(initial);
        pool
    }

    /// Queues `f` for execution and returns its handle without blocking.
    ///
    /// Fails with [`SpawnError::PoolClosed`] once shutdown has begun; in
    /// that case nothing is queued. The running check and the enqueue
    /// happen under the queue lock, so a task accepted here is always
    /// drained before the workers exit.
    pub fn submit<F, R>(&self, f: F) -> Result<JoinHandle<R>, SpawnError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (completer, join_handle) = handle::pair();
        let shared = self.shared.clone();
        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| SpawnError::Panicked(panic_message(&*payload)));
            if outcome.is_ok() {
                shared.completed_tasks.fetch_add(1, Ordering::Relaxed);
            } else {
                shared.failed_tasks.fetch_add(1, Ordering::Relaxed);
            }
            completer.complete(outcome);
        });

        {
            let mut queue = self.shared.queue.lock();
            if !self.shared.running.load(Ordering::Acquire) {
                return Err(SpawnError::PoolClosed);
            }
            queue.push_back(job);

            // Reactive growth, decided while still holding the queue
            // lock: shutdown flips `running` under this lock, so an
            // accepted task always has at least one worker alive to
            // drain it. The heuristic itself stays best-effort; only
            // the ceiling is exact.
            if self.shared.idle_workers.load(Ordering::Relaxed) < 1
                && self.shared.worker_count.load(Ordering::Relaxed) < self.max_workers
            {
                self.add_workers(1);
            }
        }
        self.shared.submitted_tasks.fetch_add(1, Ordering::Relaxed);
        self.shared.task_available.notify_one();

        Ok(join_handle)
    }

    /// Number of workers currently blocked waiting for work. Advisory.
    #[inline]
    pub fn idle_count(&self) -> usize {
        self.shared.idle_workers.load(Ordering::Relaxed)
    }

    /// Number of workers started so far. Never exceeds the configured
    /// ceiling and never decreases until shutdown. Advisory.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.shared.worker_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    #[inline]
    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            workers: self.shared.worker_count.load(Ordering::Relaxed),
            idle_workers: self.shared.idle_workers.load(Ordering::Relaxed),
            queued_tasks: self.shared.queue.lock().len(),
            submitted_tasks: self.shared.submitted_tasks.load(Ordering::Relaxed),
            completed_tasks: self.shared.completed_tasks.load(Ordering::Relaxed),
            failed_tasks: self.shared.failed_tasks.load(Ordering::Relaxed),
        }
    }

    /// Stops accepting new work, lets the queue drain, and joins every
    /// worker. Tasks already queued still run to completion; a worker in
    /// the middle of a task finishes it before observing the stop signal.
    pub fn shutdown(&self) {
        {
            // Flipped under the queue lock so no submit can slip a task
            // in after the workers have been told to stop.
            let _queue = self.shared.queue.lock();
            self.shared.running.store(false, Ordering::Release);
        }
        self.shared.task_available.notify_all();

        let mut workers = self.workers.lock();
        debug!("shutting down, joining {} workers", workers.len());
        for worker in workers.drain(..) {
            let _ = worker.join();
        }
    }

    fn add_workers(&self, count: usize) {
        if count == 0 {
            return;
        }
        // Callers may hold the queue lock; nothing below acquires it,
        // so the lock order is always queue before workers.
        let mut workers = self.workers.lock();
        for _ in 0..count {
            if !self.shared.running.load(Ordering::Acquire) {
                return;
            }
            if self.shared.worker_count.load(Ordering::Relaxed) >= self.max_workers {
                return;
            }
            let shared = self.shared.clone();
            // Counted idle from the start: the thread begins waiting.
            self.shared.worker_count.fetch_add(1, Ordering::Relaxed);
            self.shared.idle_workers.fetch_add(1, Ordering::Relaxed);
            workers.push(thread::spawn(move || worker_loop(shared)));
        }
        debug!("pool grown to {} workers", workers.len());
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(job) = queue.pop_front() {
                    break job;
                }
                // Drain-before-exit: terminate only once the queue is
                // empty and shutdown has begun.
                if !shared.running.load(Ordering::Acquire) {
                    shared.idle_workers.fetch_sub(1, Ordering::Relaxed);
                    trace!("worker terminating");
                    return;
                }
                shared.task_available.wait(&mut queue);
            }
        };

        shared.idle_workers.fetch_sub(1, Ordering::Relaxed);
        // The job wrapper catches panics and publishes them into the
        // handle, so execution never unwinds through this loop.
        job();
        shared.idle_workers.fetch_add(1, Ordering::Relaxed);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_size_is_clamped_to_ceiling() {
        let pool = ThreadPool::with_config(Config {
            initial_workers: 100,
            max_workers: 4,
        });
        assert_eq!(pool.worker_count(), 4);
    }

    #[test]
    fn zero_worker_pool_grows_on_first_submit() {
        let pool = ThreadPool::with_config(Config::on_demand(2));
        assert_eq!(pool.worker_count(), 0);
        let handle = pool.submit(|| 5).unwrap();
        assert_eq!(handle.get(), Ok(5));
        assert_eq!(pool.worker_count(), 1);
    }

    #[test]
    fn panic_payload_text_is_preserved() {
        let pool = ThreadPool::new(1);
        let handle = pool.submit(|| -> u32 { panic!("bad input") }).unwrap();
        assert_eq!(handle.get(), Err(SpawnError::Panicked("bad input".into())));
    }
}
