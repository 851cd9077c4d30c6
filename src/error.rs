//! Error types for pledge.
//!
//! Promise failures never show up here: a rejected promise carries its own
//! reason type `E` through the same channel as values. This module covers the
//! host-side surface instead, namely draining the microtask queue and loading
//! its configuration.
//!
//! # Error Categories
//!
//! - **Queue**: a drain ran out of budget or a job panicked under
//!   [`PanicPolicy::Propagate`](crate::queue::PanicPolicy::Propagate)
//! - **Config**: an environment variable or config file held an invalid value

use core::fmt;

use crate::types::PanicPayload;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // === Queue ===
    /// A single drain ran more jobs than the configured budget allows.
    DrainBudgetExhausted,
    /// A queued job panicked.
    JobPanicked,

    // === Config ===
    /// Configuration value could not be parsed or is out of range.
    Config,
}

impl ErrorKind {
    /// Returns the error category for this kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DrainBudgetExhausted | Self::JobPanicked => ErrorCategory::Queue,
            Self::Config => ErrorCategory::Config,
        }
    }
}

/// High-level error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Deferred task queue failures.
    Queue,
    /// Configuration failures.
    Config,
}

/// The main error type for pledge operations.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    panic: Option<PanicPayload>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            panic: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the captured panic, for [`ErrorKind::JobPanicked`].
    #[must_use]
    pub fn panic_payload(&self) -> Option<&PanicPayload> {
        self.panic.as_ref()
    }

    /// Creates a drain-budget error after `ran` jobs against a limit of `max`.
    #[must_use]
    pub fn drain_budget_exhausted(ran: u64, max: u64) -> Self {
        Self::new(ErrorKind::DrainBudgetExhausted)
            .with_message(format!("ran {ran} jobs in one drain, budget is {max}"))
    }

    /// Creates a job-panicked error carrying the panic payload.
    #[must_use]
    pub fn job_panicked(payload: PanicPayload) -> Self {
        let mut err = Self::new(ErrorKind::JobPanicked).with_message(payload.message());
        err.panic = Some(payload);
        err
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config).with_message(detail)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<crate::queue::ConfigError> for Error {
    fn from(err: crate::queue::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

/// A specialized Result type for pledge operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::drain_budget_exhausted(11, 10);
        let text = err.to_string();
        assert!(text.starts_with("DrainBudgetExhausted"));
        assert!(text.contains("budget is 10"));
    }

    #[test]
    fn categories() {
        assert_eq!(
            ErrorKind::DrainBudgetExhausted.category(),
            ErrorCategory::Queue
        );
        assert_eq!(ErrorKind::JobPanicked.category(), ErrorCategory::Queue);
        assert_eq!(ErrorKind::Config.category(), ErrorCategory::Config);
        assert_eq!(Error::config("x").category(), ErrorCategory::Config);
    }

    #[test]
    fn job_panicked_keeps_payload() {
        let err = Error::job_panicked(PanicPayload::new("boom"));
        assert_eq!(err.kind(), ErrorKind::JobPanicked);
        assert_eq!(err.message(), Some("boom"));
        assert_eq!(err.panic_payload().map(PanicPayload::message), Some("boom"));
    }

    #[test]
    fn config_error_converts() {
        let err: Error = crate::queue::ConfigError::InvalidPanicPolicy("loud".into()).into();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().unwrap_or_default().contains("loud"));
    }
}
