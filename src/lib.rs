//! Pledge: single-threaded promises with an injected deferred task queue.
//!
//! # Overview
//!
//! A [`Promise`] is a placeholder for a value that becomes available later,
//! or for the reason it never will. Work is chained onto it with
//! [`then`](Promise::then), [`and_then`](Promise::and_then) and
//! [`catch`](Promise::catch), and collections of promises are combined with
//! [`all`], [`all_settled`], [`race`] and [`any`].
//!
//! # Core Guarantees
//!
//! - **Settle once**: the first settlement call wins; a settled promise never
//!   changes again
//! - **Deferred notification**: continuations always run from the queue,
//!   never inside the call that registered or settled them
//! - **Order preservation**: continuations on one promise run in
//!   registration order
//! - **Flattening**: settling with a promise adopts that promise's outcome
//!
//! # Module Structure
//!
//! - [`promise`]: the state machine, resolver and chaining
//! - [`combinator`]: `all`, `all_settled`, `race`, `any`
//! - [`queue`]: the job queue capability and a manually drained FIFO queue
//! - [`types`]: state and outcome records
//! - [`error`]: host-side error types
//! - [`tracing_compat`]: logging facade over optional `tracing`
//!
//! # Example
//!
//! ```
//! use pledge::{all, MicrotaskQueue, Promise};
//!
//! let queue = MicrotaskQueue::new();
//! let handle = queue.handle();
//!
//! let a = Promise::<i32, String>::resolve(&handle, 1);
//! let b = Promise::new(&handle, |resolver| {
//!     resolver.fulfill(2);
//!     Ok(())
//! });
//! let sum = all(&handle, [a, b]).and_then(|values| Ok(values.iter().sum::<i32>()));
//!
//! queue.run_until_idle().unwrap();
//! assert_eq!(sum.peek().and_then(|s| s.into_result().ok()), Some(3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod combinator;
pub mod error;
pub mod promise;
pub mod queue;
pub mod tracing_compat;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use combinator::{all, all_settled, any, race, AggregateError};
pub use error::{Error, ErrorCategory, ErrorKind, Result};
pub use promise::{IntoResolution, Promise, Resolution, Resolver};
pub use queue::{
    ConfigError, DrainReport, Job, JobQueue, MicrotaskQueue, PanicPolicy, QueueConfig,
    QueueHandle, QueueStats, StepOutcome,
};
pub use types::{PanicPayload, PromiseState, Settled};
