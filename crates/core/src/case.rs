//! Native per-test case
//!
//! `TestCase` is the engine-facing side of one test invocation. It owns the
//! test name and every failure recorded against it. Non-fatal failures are
//! appended and the test keeps running; a fatal failure is appended and the
//! test is stopped by unwinding with a [`FatalFailure`] payload, which the
//! chain runner contains.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Panic payload that stops a test after a fatal failure.
///
/// The message is already recorded on the case by the time this unwinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalFailure {
    /// Test that was stopped
    pub test: String,
    /// The fatal failure message
    pub message: String,
}

impl fmt::Display for FatalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test `{}` stopped: {}", self.test, self.message)
    }
}

/// Failure bookkeeping for a single test invocation
#[derive(Debug)]
pub struct TestCase {
    name: String,
    failures: Mutex<Vec<String>>,
    stopped: AtomicBool,
}

impl TestCase {
    /// Create a case with no recorded failures
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failures: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Test name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a non-fatal failure; the test continues.
    pub fn error(&self, message: impl fmt::Display) {
        let message = message.to_string();
        warn!(test = %self.name, %message, "Test failure recorded");
        self.failures.lock().push(message);
    }

    /// Record a failure and stop the test.
    ///
    /// Unwinds with a [`FatalFailure`] payload. Wrappers that hold `Drop`
    /// guards still get their teardown run during the unwind.
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        let message = message.to_string();
        self.error(&message);
        self.stopped.store(true, Ordering::Release);
        std::panic::panic_any(FatalFailure {
            test: self.name.clone(),
            message,
        })
    }

    /// True once any failure was recorded
    pub fn failed(&self) -> bool {
        !self.failures.lock().is_empty()
    }

    /// True if the test was stopped by a fatal failure
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Snapshot of the recorded failure messages
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }
}
