//! `race`: settle with whichever input settles first.
//!
//! Fulfillment and rejection both count. Inputs that settle later are
//! ignored. An empty input never settles.

use crate::promise::Promise;
use crate::queue::QueueHandle;
use crate::tracing_compat::trace;

/// Mirrors the outcome of the first input to settle.
///
/// Inputs that are already settled are still observed through the queue, so
/// among those the earliest in input order wins.
pub fn race<T, E, I>(queue: &QueueHandle, inputs: I) -> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let inputs: Vec<_> = inputs.into_iter().collect();
    let (output, resolver) = Promise::with_resolvers(queue);
    trace!(inputs = inputs.len(), "race: subscribing");
    for input in inputs {
        let on_value = resolver.clone();
        let on_reason = resolver.clone();
        input.subscribe(
            move |value| on_value.fulfill(value),
            move |reason| on_reason.reject(reason),
        );
    }
    output
}
