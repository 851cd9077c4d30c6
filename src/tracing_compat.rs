//! Logging facade that compiles away when tracing is disabled.
//!
//! - **With `tracing-integration`**: re-exports the `tracing` event macros.
//! - **Without it**: no-op macros with the same names, so call sites do not
//!   need `cfg` guards.
//!
//! ```rust,ignore
//! use pledge::tracing_compat::{debug, trace};
//!
//! trace!(reactions = 3, "promise fulfilled");
//! debug!(executed = 12, panics = 0, "queue drained");
//! ```
//!
//! Enable real output with:
//!
//! ```toml
//! pledge = { version = "0.1", features = ["tracing-integration"] }
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace, warn, Level};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    //! Expands every event to nothing.

    /// No-op trace-level event.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug-level event.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info-level event.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op warn-level event.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op error-level event.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    pub use crate::{debug, error, info, trace, warn};
}

#[cfg(not(feature = "tracing-integration"))]
pub use noop::*;

/// Stand-in for `tracing::Level` when tracing is disabled.
#[cfg(not(feature = "tracing-integration"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level;

#[cfg(not(feature = "tracing-integration"))]
impl Level {
    /// Most verbose.
    pub const TRACE: Self = Self;
    /// Debug.
    pub const DEBUG: Self = Self;
    /// Info.
    pub const INFO: Self = Self;
    /// Warn.
    pub const WARN: Self = Self;
    /// Least verbose.
    pub const ERROR: Self = Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;

    #[test]
    fn event_macros_accept_fields() {
        init_test_logging();
        crate::test_phase!("event_macros_accept_fields");
        let depth = 3_usize;
        trace!(depth, "job enqueued");
        debug!(executed = 12_u64, panics = 0_u64, "queue drained");
        info!(policy = %"isolate", "queue configured");
        warn!(ran = 10_u64, max = 10_u64, "budget exhausted");
        error!(panic = %"boom", "job panicked");
        crate::test_complete!("event_macros_accept_fields");
    }

    #[test]
    fn level_constants_exist() {
        init_test_logging();
        let levels = [
            Level::TRACE,
            Level::DEBUG,
            Level::INFO,
            Level::WARN,
            Level::ERROR,
        ];
        crate::assert_with_log!(levels.len() == 5, "level count", 5, levels.len());
    }
}
