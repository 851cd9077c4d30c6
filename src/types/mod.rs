//! Core types shared by promises, combinators and the queue.
//!
//! - [`state`]: the three-valued promise state
//! - [`outcome`]: settled outcome records and panic payloads

pub mod outcome;
pub mod state;

pub use outcome::{PanicPayload, Settled};
pub use state::PromiseState;
