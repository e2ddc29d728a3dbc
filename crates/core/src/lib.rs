//! Core types for rulechain
//!
//! This crate defines the per-test side of the harness:
//! - TestCase: failure bookkeeping for one test invocation
//! - TestContext: the wrapper handed to test bodies
//! - Assertion: fluent verify/assert checks bound to a context
//! - Error: chain, suite and test failure types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod case;
pub mod context;
pub mod error;

pub use case::{FatalFailure, TestCase};
pub use context::{Assertion, TestContext, ASSERT_FAIL};
pub use error::{
    ChainError, HookFailure, HookPhase, Result, SuiteError, SuiteFailures, TestFailure,
};
