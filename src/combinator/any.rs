//! `any`: the first input to fulfill.
//!
//! The output fulfills with the first value, in settlement order. If every
//! input rejects, it rejects with an [`AggregateError`] carrying every reason
//! in input order. An empty input rejects at once with no reasons.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use super::Tally;
use crate::promise::Promise;
use crate::queue::QueueHandle;
use crate::tracing_compat::trace;

/// Every input of [`any`] rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError<E> {
    /// Rejection reasons in input order.
    pub errors: Vec<E>,
}

impl<E> AggregateError<E> {
    /// Creates an aggregate from reasons in input order.
    #[must_use]
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    /// Number of rejected inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when there were no inputs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no promises to wait for");
        }
        write!(f, "all {} promises were rejected", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            write!(f, "{}{e}", if i == 0 { ": " } else { "; " })?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for AggregateError<E> {}

/// Fulfills with the first value, or rejects once every input has rejected.
pub fn any<T, E, I>(queue: &QueueHandle, inputs: I) -> Promise<T, AggregateError<E>>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let inputs: Vec<_> = inputs.into_iter().collect();
    let (output, resolver) = Promise::with_resolvers(queue);
    trace!(inputs = inputs.len(), "any: subscribing");

    if inputs.is_empty() {
        resolver.reject(AggregateError::new(Vec::new()));
        return output;
    }

    let tally = Rc::new(RefCell::new(Tally::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let tally = Rc::clone(&tally);
        let on_value = resolver.clone();
        let on_reason = resolver.clone();
        input.subscribe(
            move |value| on_value.fulfill(value),
            move |reason| {
                let done = tally.borrow_mut().record(index, reason);
                if let Some(errors) = done {
                    on_reason.reject(AggregateError::new(errors));
                }
            },
        );
    }
    output
}
