//! Settled outcome records.
//!
//! [`Settled`] is the terminal snapshot of a promise: the value it was
//! fulfilled with or the reason it was rejected with. `all_settled` yields one
//! record per input, and [`Promise::peek`](crate::Promise::peek) returns one
//! for inspection.
//!
//! [`PanicPayload`] wraps a panic caught at the queue's job boundary so it can
//! be reported without unwinding through the drain loop.

use core::fmt;
use std::any::Any;

use super::state::PromiseState;

/// Payload from a caught panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicPayload {
    message: String,
}

impl PanicPayload {
    /// Creates a new panic payload with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts a message from the value returned by `catch_unwind`.
    ///
    /// `panic!` with a literal produces `&'static str`, with format arguments
    /// a `String`. Anything else is reported as opaque.
    #[must_use]
    pub fn from_unwind(payload: &(dyn Any + Send)) -> Self {
        if let Some(msg) = payload.downcast_ref::<&'static str>() {
            Self::new(*msg)
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            Self::new(msg.clone())
        } else {
            Self::new("opaque panic payload")
        }
    }

    /// Returns the panic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)
    }
}

/// The outcome of a settled promise.
///
/// Serializes as `{"status": "fulfilled", "value": ..}` or
/// `{"status": "rejected", "reason": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Settled<T, E> {
    /// The promise was fulfilled.
    Fulfilled {
        /// The fulfillment value.
        value: T,
    },
    /// The promise was rejected.
    Rejected {
        /// The rejection reason.
        reason: E,
    },
}

impl<T, E> Settled<T, E> {
    /// Returns the state this record describes.
    #[must_use]
    pub const fn state(&self) -> PromiseState {
        match self {
            Self::Fulfilled { .. } => PromiseState::Fulfilled,
            Self::Rejected { .. } => PromiseState::Rejected,
        }
    }

    /// Returns true if this is a fulfillment.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled { .. })
    }

    /// Returns true if this is a rejection.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns the value, if fulfilled.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled { value } => Some(value),
            Self::Rejected { .. } => None,
        }
    }

    /// Returns the reason, if rejected.
    pub fn reason(&self) -> Option<&E> {
        match self {
            Self::Fulfilled { .. } => None,
            Self::Rejected { reason } => Some(reason),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Fulfilled { value } => Ok(value),
            Self::Rejected { reason } => Err(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fulfilled { value },
            Err(reason) => Self::Rejected { reason },
        }
    }
}
