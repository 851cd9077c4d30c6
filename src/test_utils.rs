//! Test utilities shared by unit tests.
//!
//! - Tracing-based logging initialization
//! - Phase/section macros for readable test output
//! - A global lock for tests that touch environment variables
//! - Queue constructor and promise assertion macros

use std::sync::{Mutex, MutexGuard, Once, PoisonError};

use crate::queue::{MicrotaskQueue, QueueHandle};

static INIT_LOGGING: Once = Once::new();
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Acquire the global environment lock for tests that mutate env vars.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A fresh queue and a handle to it.
pub fn test_queue() -> (MicrotaskQueue, QueueHandle) {
    let queue = MicrotaskQueue::new();
    let handle = queue.handle();
    (queue, handle)
}

/// Log a test phase transition with a visual separator.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(phase = %$name, "========================================");
        tracing::info!(phase = %$name, "TEST PHASE: {}", $name);
        tracing::info!(phase = %$name, "========================================");
    };
}

/// Log a section within a test phase.
#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        tracing::debug!(section = %$name, "--- {} ---", $name);
    };
}

/// Log test completion with summary.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        tracing::info!(test = %$name, "test completed successfully: {}", $name);
    };
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            test = %$name,
            $($key = %$value,)*
            "test completed successfully: {}",
            $name
        );
    };
}

/// Log before assertions for context.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {
        tracing::debug!(
            expected = ?$expected,
            actual = ?$actual,
            "Asserting: {}",
            $msg
        );
        assert!($cond, "{}: expected {:?}, got {:?}", $msg, $expected, $actual);
    };
}

/// Assert that a promise is fulfilled with a specific value.
#[macro_export]
macro_rules! assert_fulfilled {
    ($promise:expr, $expected:expr) => {
        match $promise.peek() {
            Some($crate::types::Settled::Fulfilled { value }) => assert_eq!(value, $expected),
            other => unreachable!("expected fulfilled({:?}), got {:?}", $expected, other),
        }
    };
}

/// Assert that a promise is rejected with a specific reason.
#[macro_export]
macro_rules! assert_rejected {
    ($promise:expr, $expected:expr) => {
        match $promise.peek() {
            Some($crate::types::Settled::Rejected { reason }) => assert_eq!(reason, $expected),
            other => unreachable!("expected rejected({:?}), got {:?}", $expected, other),
        }
    };
}
