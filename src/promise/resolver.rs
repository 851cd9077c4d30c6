//! The settlement capability for a promise.

use core::fmt;

use crate::tracing_compat::{trace, warn};

use super::{IntoResolution, Promise, Resolution};

/// Settles the promise it was created for.
///
/// Handed to the executor of [`Promise::new`] or returned by
/// [`Promise::with_resolvers`]. Clones share the same target; whichever call
/// comes first wins and every later call is ignored.
pub struct Resolver<T, E> {
    promise: Promise<T, E>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(super) fn new(promise: Promise<T, E>) -> Self {
        Self { promise }
    }

    /// Settles from anything convertible into a [`Resolution`].
    ///
    /// A promise is adopted: the target locks now and settles later, when
    /// the adopted promise does.
    pub fn resolve<R>(&self, resolution: R)
    where
        R: IntoResolution<Value = T, Error = E>,
    {
        if !self.promise.lock() {
            return;
        }
        match resolution.into_resolution() {
            Resolution::Fulfill(value) => self.promise.fulfill_now(value),
            Resolution::Reject(reason) => self.promise.reject_now(reason),
            Resolution::Adopt(inner) => self.adopt(&inner),
        }
    }

    /// Fulfills with `value`.
    pub fn fulfill(&self, value: T) {
        self.resolve(Resolution::Fulfill(value));
    }

    /// Rejects with `reason`.
    ///
    /// The reason is stored as is, even when it is itself a promise.
    pub fn reject(&self, reason: E) {
        if self.promise.lock() {
            self.promise.reject_now(reason);
        }
    }

    /// Returns true once any settlement call has been accepted.
    ///
    /// This flips on adoption too, before the target actually settles.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.promise.is_locked()
    }

    /// Returns the promise this resolver settles.
    #[must_use]
    pub fn promise(&self) -> &Promise<T, E> {
        &self.promise
    }

    fn adopt(&self, inner: &Promise<T, E>) {
        if inner.ptr_eq(&self.promise) {
            // Waiting on itself; it can never settle.
            warn!("promise resolved with itself, it will stay pending");
        }
        trace!(inner_state = %inner.state(), "adopting promise");
        let on_fulfilled = self.promise.clone();
        let on_rejected = self.promise.clone();
        inner.subscribe(
            move |value| on_fulfilled.fulfill_now(value),
            move |reason| on_rejected.reject_now(reason),
        );
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("promise", &self.promise)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MicrotaskQueue;
    use crate::types::Settled;

    #[test]
    fn fulfill_then_reject_keeps_value() {
        let queue = MicrotaskQueue::new();
        let (promise, resolver) = Promise::<i32, String>::with_resolvers(&queue.handle());

        assert!(!resolver.is_settled());
        resolver.fulfill(4);
        resolver.reject("late".into());

        assert!(resolver.is_settled());
        assert_eq!(promise.peek(), Some(Settled::Fulfilled { value: 4 }));
    }

    #[test]
    fn resolve_with_result() {
        let queue = MicrotaskQueue::new();
        let (promise, resolver) = Promise::<i32, String>::with_resolvers(&queue.handle());

        resolver.resolve(Err::<i32, String>("nope".into()));
        assert!(promise.is_rejected());
    }

    #[test]
    fn clones_share_the_lock() {
        let queue = MicrotaskQueue::new();
        let (promise, resolver) = Promise::<i32, String>::with_resolvers(&queue.handle());
        let other = resolver.clone();

        other.fulfill(1);
        resolver.fulfill(2);
        assert_eq!(promise.peek(), Some(Settled::Fulfilled { value: 1 }));
        assert!(resolver.promise().ptr_eq(&promise));
    }

    #[test]
    fn resolving_with_itself_stays_pending() {
        let queue = MicrotaskQueue::new();
        let (promise, resolver) = Promise::<i32, String>::with_resolvers(&queue.handle());

        resolver.resolve(promise.clone());
        queue.run_until_idle().unwrap();

        assert!(resolver.is_settled());
        assert!(promise.is_pending());
    }

    #[test]
    fn adopting_settled_promise_is_still_deferred() {
        let queue = MicrotaskQueue::new();
        let handle = queue.handle();
        let inner = Promise::<i32, String>::resolve(&handle, 8);
        let (outer, resolver) = Promise::<i32, String>::with_resolvers(&handle);

        resolver.resolve(inner);
        assert!(outer.is_pending());
        queue.run_until_idle().unwrap();
        assert_eq!(outer.peek(), Some(Settled::Fulfilled { value: 8 }));
    }
}
