//! The deferred task queue.
//!
//! Promises never run continuations inline. Every continuation becomes a
//! [`Job`] handed to a [`JobQueue`], and the host drains that queue after the
//! current synchronous unit of work. The queue is injected: a promise only
//! knows the [`QueueHandle`] it was created with, and everything chained from
//! it inherits the same handle.
//!
//! - [`JobQueue`]: the one-method capability promises depend on
//! - [`QueueHandle`]: cheap-clone, type-erased handle promises carry
//! - [`MicrotaskQueue`]: a FIFO queue drained manually by the host or a test
//! - [`config`]: budget and panic policy for [`MicrotaskQueue`]

pub mod config;
pub mod microtask;

use core::fmt;
use std::rc::Rc;

pub use config::{ConfigError, PanicPolicy, QueueConfig};
pub use microtask::{DrainReport, MicrotaskQueue, QueueStats, StepOutcome};

/// A zero-argument unit of work.
pub type Job = Box<dyn FnOnce() + 'static>;

/// A FIFO queue of deferred jobs.
///
/// Implementations must run jobs in the order they were enqueued, and only
/// after the call that enqueued them has returned.
pub trait JobQueue {
    /// Enqueues a job to run in a later turn.
    fn enqueue(&self, job: Job);
}

/// Shared handle to a [`JobQueue`].
#[derive(Clone)]
pub struct QueueHandle {
    queue: Rc<dyn JobQueue>,
}

impl QueueHandle {
    /// Wraps a queue implementation.
    pub fn new<Q: JobQueue + 'static>(queue: Q) -> Self {
        Self {
            queue: Rc::new(queue),
        }
    }

    /// Wraps an already shared queue implementation.
    ///
    /// Lets a host keep its own handle on the queue it drains.
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use pledge::{Job, JobQueue, Promise, QueueHandle};
    ///
    /// #[derive(Default)]
    /// struct HostQueue {
    ///     jobs: RefCell<Vec<Job>>,
    /// }
    ///
    /// impl JobQueue for HostQueue {
    ///     fn enqueue(&self, job: Job) {
    ///         self.jobs.borrow_mut().push(job);
    ///     }
    /// }
    ///
    /// let host = Rc::new(HostQueue::default());
    /// let handle = QueueHandle::from_rc(host.clone());
    /// let doubled = Promise::<i32, String>::resolve(&handle, 4).and_then(|v| Ok(v * 2));
    /// assert_eq!(host.jobs.borrow().len(), 1);
    ///
    /// let jobs: Vec<Job> = host.jobs.borrow_mut().drain(..).collect();
    /// for job in jobs {
    ///     job();
    /// }
    /// assert!(doubled.is_fulfilled());
    /// ```
    pub fn from_rc(queue: Rc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Enqueues a closure as a job.
    pub fn enqueue<F>(&self, job: F)
    where
        F: FnOnce() + 'static,
    {
        self.queue.enqueue(Box::new(job));
    }

    /// Returns true if both handles point at the same queue.
    #[must_use]
    pub fn same_queue(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }
}

impl fmt::Debug for QueueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueHandle")
            .field("queue", &Rc::as_ptr(&self.queue).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CollectingQueue {
        jobs: RefCell<Vec<Job>>,
    }

    impl JobQueue for Rc<CollectingQueue> {
        fn enqueue(&self, job: Job) {
            self.jobs.borrow_mut().push(job);
        }
    }

    #[test]
    fn handle_forwards_to_queue() {
        let queue = Rc::new(CollectingQueue::default());
        let handle = QueueHandle::new(Rc::clone(&queue));
        let hits = Rc::new(RefCell::new(0));

        let h = Rc::clone(&hits);
        handle.enqueue(move || *h.borrow_mut() += 1);
        assert_eq!(*hits.borrow(), 0, "enqueue must not run the job");

        let jobs: Vec<Job> = queue.jobs.borrow_mut().drain(..).collect();
        for job in jobs {
            job();
        }
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn same_queue_compares_identity() {
        let a = QueueHandle::new(MicrotaskQueue::new());
        let b = a.clone();
        let c = QueueHandle::new(MicrotaskQueue::new());
        assert!(a.same_queue(&b));
        assert!(!a.same_queue(&c));
    }
}
