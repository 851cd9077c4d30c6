//! Promise state.

use core::fmt;

/// The state of a promise.
///
/// Transitions are monotonic: `Pending` moves to exactly one of the two
/// settled states and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromiseState {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

impl PromiseState {
    /// Returns true once the promise has left `Pending`.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the lowercase name used in logs and serialized records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_is_unsettled() {
        assert!(!PromiseState::Pending.is_settled());
        assert!(PromiseState::Fulfilled.is_settled());
        assert!(PromiseState::Rejected.is_settled());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(PromiseState::Fulfilled.to_string(), "fulfilled");
        assert_eq!(PromiseState::Rejected.to_string(), "rejected");
    }
}
