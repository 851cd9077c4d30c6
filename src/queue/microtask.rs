//! A manually drained FIFO microtask queue.
//!
//! [`MicrotaskQueue`] is what a host plugs into promises when it has no
//! queue of its own, and what tests use to observe each scheduling turn.
//! Nothing runs until the host calls [`MicrotaskQueue::run_next`] or
//! [`MicrotaskQueue::run_until_idle`].
//!
//! # Job boundary
//!
//! Each job runs inside `catch_unwind`. Under [`PanicPolicy::Isolate`] a
//! panicking job is recorded and the drain moves on to the next job, so one
//! broken continuation cannot wedge everything queued behind it. Under
//! [`PanicPolicy::Propagate`] the panic is logged and resumed.
//!
//! # Drain budget
//!
//! A continuation that schedules another continuation on every run keeps the
//! queue from ever going idle. `run_until_idle` stops after
//! [`QueueConfig::max_jobs_per_drain`] jobs and reports
//! [`ErrorKind::DrainBudgetExhausted`](crate::error::ErrorKind::DrainBudgetExhausted).

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use super::config::{PanicPolicy, QueueConfig};
use super::{Job, JobQueue, QueueHandle};
use crate::error::{Error, Result};
use crate::tracing_compat::{debug, error, trace, warn};
use crate::types::PanicPayload;

/// Counters over the lifetime of a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Jobs ever enqueued.
    pub enqueued: u64,
    /// Jobs that ran to completion or panicked.
    pub executed: u64,
    /// Jobs that panicked.
    pub panicked: u64,
    /// Largest number of jobs waiting at once.
    pub peak_depth: usize,
}

/// Result of a single [`MicrotaskQueue::run_next`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The queue was empty.
    Idle,
    /// One job ran to completion.
    Completed,
    /// One job panicked and was isolated.
    Panicked(PanicPayload),
}

/// Summary of one [`MicrotaskQueue::run_until_idle`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Jobs run during this drain, including ones that panicked.
    pub executed: u64,
    /// Panics isolated during this drain, in the order they happened.
    pub panics: Vec<PanicPayload>,
}

impl DrainReport {
    /// Returns true if no job panicked.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.panics.is_empty()
    }

    /// Turns the first isolated panic into an error.
    pub fn ensure_clean(self) -> Result<Self> {
        match self.panics.first() {
            Some(payload) => Err(Error::job_panicked(payload.clone())),
            None => Ok(self),
        }
    }
}

struct QueueInner {
    jobs: RefCell<VecDeque<Job>>,
    config: QueueConfig,
    stats: Cell<QueueStats>,
}

/// A FIFO deferred task queue drained by the host.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct MicrotaskQueue {
    inner: Rc<QueueInner>,
}

impl MicrotaskQueue {
    /// Creates a queue with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates a queue with the given configuration.
    #[must_use]
    pub fn with_config(mut config: QueueConfig) -> Self {
        config.normalize();
        Self {
            inner: Rc::new(QueueInner {
                jobs: RefCell::new(VecDeque::new()),
                config,
                stats: Cell::new(QueueStats::default()),
            }),
        }
    }

    /// Returns a handle promises can schedule onto.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        QueueHandle::new(self.clone())
    }

    /// Returns the queue configuration.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// Returns the number of jobs waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.jobs.borrow().len()
    }

    /// Returns true if no job is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.jobs.borrow().is_empty()
    }

    /// Returns lifetime counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.inner.stats.get()
    }

    /// Runs exactly one job, if any is waiting.
    ///
    /// Jobs enqueued by the running job go to the back of the queue.
    ///
    /// # Panics
    ///
    /// Resumes the job's panic under [`PanicPolicy::Propagate`].
    pub fn run_next(&self) -> StepOutcome {
        // The borrow must end before the job runs: jobs enqueue more jobs.
        let Some(job) = self.inner.jobs.borrow_mut().pop_front() else {
            return StepOutcome::Idle;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(job));
        self.update_stats(|stats| stats.executed += 1);

        match result {
            Ok(()) => StepOutcome::Completed,
            Err(unwind) => {
                let payload = PanicPayload::from_unwind(unwind.as_ref());
                self.update_stats(|stats| stats.panicked += 1);
                error!(
                    panic = %payload.message(),
                    policy = %self.inner.config.panic_policy,
                    "job panicked"
                );
                match self.inner.config.panic_policy {
                    PanicPolicy::Isolate => StepOutcome::Panicked(payload),
                    PanicPolicy::Propagate => panic::resume_unwind(unwind),
                }
            }
        }
    }

    /// Runs jobs until the queue is empty.
    ///
    /// Includes jobs enqueued while draining.
    pub fn run_until_idle(&self) -> Result<DrainReport> {
        let mut report = DrainReport::default();

        loop {
            if let Some(max) = self.inner.config.max_jobs_per_drain {
                if report.executed >= max && !self.is_empty() {
                    warn!(
                        executed = report.executed,
                        max,
                        remaining = self.len(),
                        "drain budget exhausted"
                    );
                    return Err(Error::drain_budget_exhausted(report.executed, max));
                }
            }

            match self.run_next() {
                StepOutcome::Idle => break,
                StepOutcome::Completed => report.executed += 1,
                StepOutcome::Panicked(payload) => {
                    report.executed += 1;
                    report.panics.push(payload);
                }
            }
        }

        debug!(
            executed = report.executed,
            panics = report.panics.len(),
            "drain complete"
        );
        Ok(report)
    }

    fn update_stats(&self, f: impl FnOnce(&mut QueueStats)) {
        let mut stats = self.inner.stats.get();
        f(&mut stats);
        self.inner.stats.set(stats);
    }
}

impl Default for MicrotaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue for MicrotaskQueue {
    fn enqueue(&self, job: Job) {
        let depth = {
            let mut jobs = self.inner.jobs.borrow_mut();
            jobs.push_back(job);
            jobs.len()
        };
        self.update_stats(|stats| {
            stats.enqueued += 1;
            stats.peak_depth = stats.peak_depth.max(depth);
        });
        trace!(depth, "job enqueued");
    }
}

impl std::fmt::Debug for MicrotaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicrotaskQueue")
            .field("pending", &self.len())
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}
