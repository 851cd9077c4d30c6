//! `all_settled`: wait for every input to settle, whatever the outcome.

use std::cell::RefCell;
use std::rc::Rc;

use super::Tally;
use crate::promise::Promise;
use crate::queue::QueueHandle;
use crate::tracing_compat::trace;
use crate::types::Settled;

/// Fulfills with one [`Settled`] record per input, in input order.
///
/// The output never rejects. An empty input fulfills with an empty vector.
pub fn all_settled<T, E, I>(queue: &QueueHandle, inputs: I) -> Promise<Vec<Settled<T, E>>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let inputs: Vec<_> = inputs.into_iter().collect();
    let (output, resolver) = Promise::with_resolvers(queue);
    trace!(inputs = inputs.len(), "all_settled: subscribing");

    if inputs.is_empty() {
        resolver.fulfill(Vec::new());
        return output;
    }

    let tally = Rc::new(RefCell::new(Tally::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let value_tally = Rc::clone(&tally);
        let reason_tally = Rc::clone(&tally);
        let on_value = resolver.clone();
        let on_reason = resolver.clone();
        input.subscribe(
            move |value| {
                let done = value_tally
                    .borrow_mut()
                    .record(index, Settled::Fulfilled { value });
                if let Some(records) = done {
                    on_value.fulfill(records);
                }
            },
            move |reason| {
                let done = reason_tally
                    .borrow_mut()
                    .record(index, Settled::Rejected { reason });
                if let Some(records) = done {
                    on_reason.fulfill(records);
                }
            },
        );
    }
    output
}
