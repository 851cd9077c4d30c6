//! What a promise can be settled with.
//!
//! Fulfilling a promise with another promise does not nest; the outer promise
//! adopts the inner one and settles with its outcome. [`IntoResolution`] is
//! the capability that tells settlement code which of the three cases it is
//! looking at, so handlers may return a plain `Result`, a [`Promise`] or an
//! explicit [`Resolution`].

use crate::types::Settled;

use super::Promise;

/// How a promise should be settled.
pub enum Resolution<T, E> {
    /// Fulfill with a value.
    Fulfill(T),
    /// Reject with a reason.
    Reject(E),
    /// Wait for another promise and settle the same way.
    Adopt(Promise<T, E>),
}

impl<T, E> Resolution<T, E> {
    /// Adopts `promise` on `Ok`, rejects on `Err`.
    ///
    /// ```
    /// use pledge::{MicrotaskQueue, Promise, Resolution};
    ///
    /// let queue = MicrotaskQueue::new();
    /// let handle = queue.handle();
    /// let cached = Promise::<i32, String>::resolve(&handle, 3);
    /// let lookup = |key: &str| {
    ///     if key == "hit" {
    ///         Ok(cached.clone())
    ///     } else {
    ///         Err(format!("miss {key}"))
    ///     }
    /// };
    ///
    /// let hit = Promise::resolve_from(&handle, Resolution::adopt_result(lookup("hit")));
    /// let miss = Promise::resolve_from(&handle, Resolution::adopt_result(lookup("cold")));
    /// assert!(miss.is_rejected());
    /// assert!(hit.is_pending());
    ///
    /// queue.run_until_idle().unwrap();
    /// assert!(hit.is_fulfilled());
    /// ```
    pub fn adopt_result(result: Result<Promise<T, E>, E>) -> Self {
        match result {
            Ok(promise) => Self::Adopt(promise),
            Err(reason) => Self::Reject(reason),
        }
    }

    /// Returns true for the adoption case.
    #[must_use]
    pub const fn is_adopt(&self) -> bool {
        matches!(self, Self::Adopt(_))
    }
}

impl<T, E> core::fmt::Debug for Resolution<T, E>
where
    T: core::fmt::Debug,
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fulfill(value) => f.debug_tuple("Fulfill").field(value).finish(),
            Self::Reject(reason) => f.debug_tuple("Reject").field(reason).finish(),
            Self::Adopt(promise) => f.debug_tuple("Adopt").field(promise).finish(),
        }
    }
}

/// Conversion into a [`Resolution`].
///
/// Implemented for `Result<T, E>` (fulfill or reject), [`Promise<T, E>`]
/// (adopt), [`Settled<T, E>`] and `Resolution<T, E>` itself.
pub trait IntoResolution {
    /// Fulfillment value type.
    type Value;
    /// Rejection reason type.
    type Error;

    /// Performs the conversion.
    fn into_resolution(self) -> Resolution<Self::Value, Self::Error>;
}

impl<T, E> IntoResolution for Resolution<T, E> {
    type Value = T;
    type Error = E;

    fn into_resolution(self) -> Resolution<T, E> {
        self
    }
}

impl<T, E> IntoResolution for Result<T, E> {
    type Value = T;
    type Error = E;

    fn into_resolution(self) -> Resolution<T, E> {
        match self {
            Ok(value) => Resolution::Fulfill(value),
            Err(reason) => Resolution::Reject(reason),
        }
    }
}

impl<T, E> IntoResolution for Promise<T, E> {
    type Value = T;
    type Error = E;

    fn into_resolution(self) -> Resolution<T, E> {
        Resolution::Adopt(self)
    }
}

impl<T, E> IntoResolution for Settled<T, E> {
    type Value = T;
    type Error = E;

    fn into_resolution(self) -> Resolution<T, E> {
        match self {
            Settled::Fulfilled { value } => Resolution::Fulfill(value),
            Settled::Rejected { reason } => Resolution::Reject(reason),
        }
    }
}
