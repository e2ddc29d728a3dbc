//! Rule chain composition for rulechain
//!
//! This crate wraps tests and suites with ordered rules:
//! - RuleChain: per-test "around" rules, first-declared outermost
//! - SuiteRuleChain: suite setup in order, teardown in reverse, with
//!   failures collected per SuiteRun
//! - registry: process-wide active chains for free-function use
//! - HarnessConfig: `rulechain.toml` settings and log subscriber setup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod config;
pub mod logging;
pub mod registry;
pub mod report;
pub mod rule;
pub mod suite;

pub use chain::RuleChain;
pub use config::{ConfigError, HarnessConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use logging::init_logging;
pub use report::TestReport;
pub use rule::{around_fn, AroundFn, TestBody, TestRule};
pub use suite::{Closer, SuiteRule, SuiteRuleChain, SuiteRun};
