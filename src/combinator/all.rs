//! `all`: wait for every input to fulfill.
//!
//! The output fulfills with the values in input order once every input has
//! fulfilled. The first rejection, in settlement order, rejects the output;
//! later outcomes are ignored. An empty input fulfills with an empty vector.

use std::cell::RefCell;
use std::rc::Rc;

use super::Tally;
use crate::promise::Promise;
use crate::queue::QueueHandle;
use crate::tracing_compat::trace;

/// Fulfills with every value in input order, or rejects with the first reason.
pub fn all<T, E, I>(queue: &QueueHandle, inputs: I) -> Promise<Vec<T>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let inputs: Vec<_> = inputs.into_iter().collect();
    let (output, resolver) = Promise::with_resolvers(queue);
    trace!(inputs = inputs.len(), "all: subscribing");

    if inputs.is_empty() {
        resolver.fulfill(Vec::new());
        return output;
    }

    let tally = Rc::new(RefCell::new(Tally::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let tally = Rc::clone(&tally);
        let on_value = resolver.clone();
        let on_reason = resolver.clone();
        input.subscribe(
            move |value| {
                let done = tally.borrow_mut().record(index, value);
                if let Some(values) = done {
                    on_value.fulfill(values);
                }
            },
            move |reason| on_reason.reject(reason),
        );
    }
    output
}
