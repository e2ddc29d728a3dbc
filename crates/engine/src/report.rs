//! Outcome of one wrapped test run

use rulechain_core::TestFailure;

/// What happened when a test ran through a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    name: String,
    failures: Vec<String>,
    stopped: bool,
}

impl TestReport {
    pub(crate) fn new(name: String, failures: Vec<String>, stopped: bool) -> Self {
        Self {
            name,
            failures,
            stopped,
        }
    }

    /// Test name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recorded failure messages, in order
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// True when nothing was recorded
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when the body was stopped early by a fatal failure or panic
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Convert into a `Result`, failing when anything was recorded.
    pub fn into_result(self) -> Result<(), TestFailure> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(TestFailure {
                name: self.name,
                failures: self.failures,
                fatal: self.stopped,
            })
        }
    }
}
