//! Error types for rulechain
//!
//! Library failures are `thiserror` enums. Rule hooks and closers are user
//! code and report through `anyhow::Error`, which is carried inside
//! [`HookFailure`] without conversion.

use std::fmt;
use thiserror::Error;

/// Result type alias for chain construction and registry operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors raised while building or looking up rule chains
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// A per-test chain was extended or used before one was installed
    #[error("no active rule chain: install one with new_rule_chain() first")]
    NoActiveChain,

    /// A suite chain was used before one was installed
    #[error("no active suite rule chain: install one with new_suite_rule_chain() first")]
    NoActiveSuiteChain,

    /// A suite chain was built from an empty rule list
    #[error("a suite rule chain needs at least one rule")]
    EmptySuiteChain,
}

/// Which half of a suite rule produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// Suite setup
    Before,
    /// Suite teardown
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Before => write!(f, "before"),
            HookPhase::After => write!(f, "after"),
        }
    }
}

/// One failed `before`/`after` invocation of a suite rule
#[derive(Debug)]
pub struct HookFailure {
    rule: String,
    phase: HookPhase,
    error: anyhow::Error,
}

impl HookFailure {
    /// Record a failure of `rule` during `phase`
    pub fn new(rule: impl Into<String>, phase: HookPhase, error: anyhow::Error) -> Self {
        Self {
            rule: rule.into(),
            phase,
            error,
        }
    }

    /// Name of the failing rule
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Phase the failure happened in
    pub fn phase(&self) -> HookPhase {
        self.phase
    }

    /// The error returned by the hook
    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}: {:#}", self.rule, self.phase, self.error)
    }
}

/// Every hook failure collected over one suite run, in occurrence order
#[derive(Debug, Default)]
pub struct SuiteFailures(Vec<HookFailure>);

impl SuiteFailures {
    /// Create an empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a failure
    pub fn push(&mut self, failure: HookFailure) {
        self.0.push(failure);
    }

    /// Number of collected failures
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no hook failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the failures in occurrence order
    pub fn iter(&self) -> std::slice::Iter<'_, HookFailure> {
        self.0.iter()
    }

    /// Consume into the underlying list
    pub fn into_vec(self) -> Vec<HookFailure> {
        self.0
    }
}

impl fmt::Display for SuiteFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errors during after_suite(): [")?;
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        write!(f, "]")
    }
}

impl<'a> IntoIterator for &'a SuiteFailures {
    type Item = &'a HookFailure;
    type IntoIter = std::slice::Iter<'a, HookFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors surfaced by suite teardown
#[derive(Debug, Error)]
pub enum SuiteError {
    /// At least one `before` or `after` hook failed
    #[error("{0}")]
    Failed(SuiteFailures),

    /// Teardown was requested without a running suite
    #[error("after_suite() called without a matching before_suite()")]
    NotStarted,

    /// Registry lookup failed
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl SuiteError {
    /// The collected hook failures, if this is a [`SuiteError::Failed`]
    pub fn failures(&self) -> Option<&SuiteFailures> {
        match self {
            SuiteError::Failed(failures) => Some(failures),
            _ => None,
        }
    }
}

/// A test that recorded at least one failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("test `{name}` failed: {}", .failures.join("; "))]
pub struct TestFailure {
    /// Name of the failed test
    pub name: String,
    /// Recorded failure messages, in order
    pub failures: Vec<String>,
    /// Whether the test was stopped by a fatal failure
    pub fatal: bool,
}
