use super::errors::{SpawnError, SpawnResult};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

enum Slot<T> {
    Pending,
    Finished(SpawnResult<T>),
}

struct Inner<T> {
    slot: Mutex<Slot<T>>,
    resolved: Condvar,
}

/// Handle to a submitted task. Blocks on [`get`](JoinHandle::get) until
/// the executing worker has published a value or a captured failure.
///
/// The slot is written exactly once; reading it again returns a clone of
/// the same outcome without re-running the task.
pub struct JoinHandle<T> {
    inner: Arc<Inner<T>>,
}

/// Write side of a handle, owned by the job wrapper on the worker thread.
pub(crate) struct Completer<T> {
    inner: Arc<Inner<T>>,
}

/// Creates a linked completer/handle pair around one result slot.
pub(crate) fn pair<T>() -> (Completer<T>, JoinHandle<T>) {
    let inner = Arc::new(Inner {
        slot: Mutex::new(Slot::Pending),
        resolved: Condvar::new(),
    });
    (
        Completer {
            inner: inner.clone(),
        },
        JoinHandle { inner },
    )
}

impl<T> Completer<T> {
    pub(crate) fn complete(self, result: SpawnResult<T>) {
        let mut slot = self.inner.slot.lock();
        *slot = Slot::Finished(result);
        drop(slot);
        self.inner.resolved.notify_all();
    }
}

impl<T> JoinHandle<T> {
    /// Blocks the calling thread until the outcome is available.
    pub fn wait(&self) {
        let mut slot = self.inner.slot.lock();
        while matches!(*slot, Slot::Pending) {
            self.inner.resolved.wait(&mut slot);
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(*self.inner.slot.lock(), Slot::Finished(_))
    }
}

impl<T: Clone> JoinHandle<T> {
    /// Blocks until the task has run, then returns its value or re-raises
    /// the captured failure. Repeat calls return the same outcome.
    pub fn get(&self) -> SpawnResult<T> {
        let mut slot = self.inner.slot.lock();
        loop {
            match &*slot {
                Slot::Finished(result) => return result.clone(),
                Slot::Pending => self.inner.resolved.wait(&mut slot),
            }
        }
    }

    /// Non-blocking read; `None` while the task has not finished.
    pub fn try_get(&self) -> Option<SpawnResult<T>> {
        match &*self.inner.slot.lock() {
            Slot::Finished(result) => Some(result.clone()),
            Slot::Pending => None,
        }
    }
}

impl<T> std::fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn completes_across_threads() {
        let (tx, rx) = pair::<u32>();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.complete(Ok(7));
        });
        assert_eq!(rx.get(), Ok(7));
        writer.join().unwrap();
    }

    #[test]
    fn wait_blocks_until_resolution() {
        let (tx, rx) = pair::<u32>();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.complete(Ok(3));
        });
        rx.wait();
        // After wait returns the slot must be readable without blocking.
        assert!(rx.is_finished());
        assert_eq!(rx.try_get(), Some(Ok(3)));
        writer.join().unwrap();
    }

    #[test]
    fn try_get_is_none_until_resolved() {
        let (tx, rx) = pair::<u32>();
        assert!(rx.try_get().is_none());
        assert!(!rx.is_finished());
        tx.complete(Err(SpawnError::Panicked("boom".into())));
        assert_eq!(rx.try_get(), Some(Err(SpawnError::Panicked("boom".into()))));
    }
}
