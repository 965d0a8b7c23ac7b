use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{Error, Result};

/// Caps in-flight provider calls and bounds the queue of waiting callers.
///
/// Up to `max_concurrent` permits are out at once; further callers wait FIFO
/// until `max_queued` of them are parked, after which acquisition fails
/// immediately with [`Error::QueueFull`] rather than blocking.
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    waiting: Arc<AtomicUsize>,
    max_queued: usize,
}

/// RAII permit for one in-flight call; released on drop on every exit path.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

/// Keeps the waiter count accurate even when an acquire future is dropped
/// mid-wait (cancellation).
struct WaitGuard(Arc<AtomicUsize>);

impl Drop for WaitGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl ConcurrencyGate {
    pub fn new(max_concurrent: usize, max_queued: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            waiting: Arc::new(AtomicUsize::new(0)),
            max_queued,
        }
    }

    /// Take a permit, waiting in the bounded queue if none is free.
    pub async fn acquire(&self) -> Result<GatePermit> {
        if let Ok(permit) = Arc::clone(&self.semaphore).try_acquire_owned() {
            return Ok(GatePermit { _permit: permit });
        }

        let already_waiting = self.waiting.fetch_add(1, Ordering::AcqRel);
        let guard = WaitGuard(Arc::clone(&self.waiting));
        if already_waiting >= self.max_queued {
            drop(guard);
            return Err(Error::QueueFull { max_queued: self.max_queued });
        }

        // Tokio's semaphore queues waiters in FIFO order.
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| Error::Cancelled)?;
        drop(guard);
        Ok(GatePermit { _permit: permit })
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Callers currently parked in the wait queue.
    pub fn queued(&self) -> usize {
        self.waiting.load(Ordering::Acquire)
    }
}
