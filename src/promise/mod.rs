//! The promise core: a settle-once state machine with deferred notification.
//!
//! A [`Promise`] starts `Pending` and settles exactly once, either
//! `Fulfilled` with a value or `Rejected` with a reason. Continuations
//! registered while pending are kept in registration order; when the promise
//! settles, each one is enqueued on the promise's [`QueueHandle`] as its own
//! job. Continuations registered after settlement are enqueued immediately.
//! No continuation ever runs inside the call that registered or settled it.
//!
//! # Invariants
//!
//! - The first call to either settlement function wins, including a
//!   fulfillment with another promise (adoption). Every later call is a no-op.
//! - A settled promise never changes state or result again.
//! - Fulfilling with a promise waits for it and takes on its outcome.
//!
//! # Threading
//!
//! Promises are single-threaded (`Rc` + `RefCell`). No borrow of promise state
//! is held while user code runs: handlers only ever run from queued jobs.
//!
//! # Example
//!
//! ```
//! use pledge::{MicrotaskQueue, Promise};
//!
//! let queue = MicrotaskQueue::new();
//! let handle = queue.handle();
//!
//! let doubled = Promise::<i32, String>::resolve(&handle, 21).and_then(|v| Ok(v * 2));
//! assert!(doubled.is_pending());
//!
//! queue.run_until_idle().unwrap();
//! assert_eq!(doubled.peek().and_then(|s| s.into_result().ok()), Some(42));
//! ```

mod chain;
mod release;
pub mod resolution;
pub mod resolver;

use core::fmt;
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use crate::queue::QueueHandle;
use crate::tracing_compat::trace;
use crate::types::{PromiseState, Settled};

use release::Continuation;

pub use resolution::{IntoResolution, Resolution};
pub use resolver::Resolver;

/// A pair of continuations waiting for a pending promise.
struct Reaction<T, E> {
    on_fulfilled: Box<dyn Continuation<T>>,
    on_rejected: Box<dyn Continuation<E>>,
}

enum Slot<T, E> {
    Pending(Vec<Reaction<T, E>>),
    Fulfilled(T),
    Rejected(E),
}

struct Core<T, E> {
    slot: Slot<T, E>,
    /// Set by the first settlement call; later calls are ignored.
    locked: bool,
}

impl<T, E> Core<T, E> {
    /// Leaves `Pending` for `next`, returning the waiting reactions.
    ///
    /// Returns `None` (and drops `next`) if already settled.
    fn transition(&mut self, next: Slot<T, E>) -> Option<Vec<Reaction<T, E>>> {
        if !matches!(self.slot, Slot::Pending(_)) {
            return None;
        }
        match mem::replace(&mut self.slot, next) {
            Slot::Pending(reactions) => Some(reactions),
            Slot::Fulfilled(_) | Slot::Rejected(_) => None,
        }
    }
}

impl<T, E> Drop for Core<T, E> {
    fn drop(&mut self) {
        let Slot::Pending(reactions) = &mut self.slot else {
            return;
        };
        if reactions.is_empty() {
            return;
        }
        let mut parked = Vec::with_capacity(reactions.len() * 2);
        for reaction in reactions.drain(..) {
            parked.push(reaction.on_fulfilled.park());
            parked.push(reaction.on_rejected.park());
        }
        release::release(parked);
    }
}

/// A deferred value that settles once with a value `T` or a reason `E`.
///
/// Cloning a promise yields another handle to the same state.
pub struct Promise<T, E> {
    core: Rc<RefCell<Core<T, E>>>,
    queue: QueueHandle,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            queue: self.queue.clone(),
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a promise and runs `executor` synchronously, exactly once.
    ///
    /// The executor receives the [`Resolver`] for the new promise. Returning
    /// `Err(reason)` rejects the promise, unless the executor already settled
    /// it, in which case the error is ignored.
    pub fn new<F>(queue: &QueueHandle, executor: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        let (promise, resolver) = Self::with_resolvers(queue);
        if let Err(reason) = executor(resolver.clone()) {
            trace!("executor failed, rejecting");
            resolver.reject(reason);
        }
        promise
    }

    /// Creates a pending promise together with its resolver.
    #[must_use]
    pub fn with_resolvers(queue: &QueueHandle) -> (Self, Resolver<T, E>) {
        let promise = Self {
            core: Rc::new(RefCell::new(Core {
                slot: Slot::Pending(Vec::new()),
                locked: false,
            })),
            queue: queue.clone(),
        };
        let resolver = Resolver::new(promise.clone());
        (promise, resolver)
    }

    /// Returns a promise already fulfilled with `value`.
    #[must_use]
    pub fn resolve(queue: &QueueHandle, value: T) -> Self {
        let (promise, resolver) = Self::with_resolvers(queue);
        resolver.fulfill(value);
        promise
    }

    /// Returns a promise settled from `source`.
    ///
    /// A plain `Result` settles immediately. A promise is adopted: the new
    /// promise settles when `source` does, with the same outcome.
    pub fn resolve_from<R>(queue: &QueueHandle, source: R) -> Self
    where
        R: IntoResolution<Value = T, Error = E>,
    {
        let (promise, resolver) = Self::with_resolvers(queue);
        resolver.resolve(source);
        promise
    }

    /// Returns a promise already rejected with `reason`.
    #[must_use]
    pub fn reject(queue: &QueueHandle, reason: E) -> Self {
        let (promise, resolver) = Self::with_resolvers(queue);
        resolver.reject(reason);
        promise
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> PromiseState {
        match self.core.borrow().slot {
            Slot::Pending(_) => PromiseState::Pending,
            Slot::Fulfilled(_) => PromiseState::Fulfilled,
            Slot::Rejected(_) => PromiseState::Rejected,
        }
    }

    /// Returns true while not settled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// Returns true if fulfilled.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.state() == PromiseState::Fulfilled
    }

    /// Returns true if rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.state() == PromiseState::Rejected
    }

    /// Returns a copy of the outcome, or `None` while pending.
    #[must_use]
    pub fn peek(&self) -> Option<Settled<T, E>> {
        match &self.core.borrow().slot {
            Slot::Pending(_) => None,
            Slot::Fulfilled(value) => Some(Settled::Fulfilled {
                value: value.clone(),
            }),
            Slot::Rejected(reason) => Some(Settled::Rejected {
                reason: reason.clone(),
            }),
        }
    }

    /// Returns the queue this promise schedules continuations on.
    #[must_use]
    pub fn queue(&self) -> &QueueHandle {
        &self.queue
    }

    /// Returns true if both handles refer to the same promise.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// Claims the right to settle. Only the first caller gets `true`.
    fn lock(&self) -> bool {
        let mut core = self.core.borrow_mut();
        !mem::replace(&mut core.locked, true)
    }

    fn is_locked(&self) -> bool {
        self.core.borrow().locked
    }

    /// Number of continuations waiting; zero once settled.
    #[cfg(test)]
    fn waiting(&self) -> usize {
        match &self.core.borrow().slot {
            Slot::Pending(reactions) => reactions.len(),
            Slot::Fulfilled(_) | Slot::Rejected(_) => 0,
        }
    }

    /// Moves to `Fulfilled` and schedules every waiting fulfillment branch.
    fn fulfill_now(&self, value: T) {
        let transitioned = self
            .core
            .borrow_mut()
            .transition(Slot::Fulfilled(value.clone()));
        let Some(reactions) = transitioned else {
            return;
        };
        trace!(reactions = reactions.len(), "promise fulfilled");
        for reaction in reactions {
            let value = value.clone();
            let on_fulfilled = reaction.on_fulfilled;
            self.queue.enqueue(move || on_fulfilled.call(value));
        }
    }

    /// Moves to `Rejected` and schedules every waiting rejection branch.
    fn reject_now(&self, reason: E) {
        let transitioned = self
            .core
            .borrow_mut()
            .transition(Slot::Rejected(reason.clone()));
        let Some(reactions) = transitioned else {
            return;
        };
        if reactions.is_empty() {
            trace!("promise rejected with no handler attached");
        } else {
            trace!(reactions = reactions.len(), "promise rejected");
        }
        for reaction in reactions {
            let reason = reason.clone();
            let on_rejected = reaction.on_rejected;
            self.queue.enqueue(move || on_rejected.call(reason));
        }
    }

    /// Registers a continuation pair.
    ///
    /// While pending the pair joins the registry; once settled the matching
    /// branch is enqueued right away with a copy of the result.
    pub(crate) fn subscribe<F, G>(&self, on_fulfilled: F, on_rejected: G)
    where
        F: FnOnce(T) + 'static,
        G: FnOnce(E) + 'static,
    {
        let settled = {
            let mut core = self.core.borrow_mut();
            match &mut core.slot {
                Slot::Pending(reactions) => {
                    reactions.push(Reaction {
                        on_fulfilled: Box::new(on_fulfilled),
                        on_rejected: Box::new(on_rejected),
                    });
                    return;
                }
                Slot::Fulfilled(value) => Settled::Fulfilled {
                    value: value.clone(),
                },
                Slot::Rejected(reason) => Settled::Rejected {
                    reason: reason.clone(),
                },
            }
        };

        match settled {
            Settled::Fulfilled { value } => self.queue.enqueue(move || on_fulfilled(value)),
            Settled::Rejected { reason } => self.queue.enqueue(move || on_rejected(reason)),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.core.try_borrow() {
            Ok(core) => match core.slot {
                Slot::Pending(_) => PromiseState::Pending.as_str(),
                Slot::Fulfilled(_) => PromiseState::Fulfilled.as_str(),
                Slot::Rejected(_) => PromiseState::Rejected.as_str(),
            },
            Err(_) => "<borrowed>",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}
