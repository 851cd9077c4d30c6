//! Chaining: `then`, `and_then` and `catch`.
//!
//! Each call registers a continuation pair on the source and returns a new
//! promise. When the source settles, the matching handler runs in its own
//! queued job, and its return value settles the returned promise:
//!
//! | handler returns     | returned promise                  |
//! |---------------------|-----------------------------------|
//! | `Ok(v)`             | fulfilled with `v`                |
//! | `Err(e)`            | rejected with `e`                 |
//! | a `Promise`         | adopts it                         |
//!
//! A missing fulfillment handler forwards the value, a missing rejection
//! handler forwards the reason, so a rejection skips every `and_then` until
//! the next `catch`.

use super::{IntoResolution, Promise};

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Registers both handlers and returns the derived promise.
    ///
    /// Exactly one of the two handlers runs, once, after this promise
    /// settles and never during this call.
    pub fn then<U, F, G, RF, RG>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> RF + 'static,
        G: FnOnce(E) -> RG + 'static,
        RF: IntoResolution<Value = U, Error = E>,
        RG: IntoResolution<Value = U, Error = E>,
    {
        let (next, resolver) = Promise::with_resolvers(&self.queue);
        let fulfill_side = resolver.clone();
        self.subscribe(
            move |value| fulfill_side.resolve(on_fulfilled(value)),
            move |reason| resolver.resolve(on_rejected(reason)),
        );
        next
    }

    /// Registers a fulfillment handler; rejections pass through unchanged.
    pub fn and_then<U, F, R>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<Value = U, Error = E>,
    {
        self.then(on_fulfilled, Err::<U, E>)
    }

    /// Registers a rejection handler; values pass through unchanged.
    ///
    /// Equivalent to `then(Ok, on_rejected)`.
    pub fn catch<G, R>(&self, on_rejected: G) -> Self
    where
        G: FnOnce(E) -> R + 'static,
        R: IntoResolution<Value = T, Error = E>,
    {
        self.then(Ok::<T, E>, on_rejected)
    }
}
