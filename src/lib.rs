//! rulechain - JUnit-style rule chains for Rust tests
//!
//! Wraps test bodies and whole suites with ordered setup/teardown rules, on
//! top of the standard libtest runner.
//!
//! # Quick Start
//!
//! ```ignore
//! use once_cell::sync::Lazy;
//! use rulechain::{around_fn, should, RuleChain};
//!
//! static RULES: Lazy<RuleChain> = Lazy::new(|| {
//!     RuleChain::new(around_fn(|t, body| {
//!         tracing::info!(test = t.name(), "start");
//!         body(t);
//!     }))
//! });
//!
//! #[test]
//! fn adds() {
//!     RULES.test("adds", |t| {
//!         let sum = 1 + 1;
//!         should!(t, "expected 2, got {}", sum).assert(sum == 2);
//!     });
//! }
//! ```
//!
//! # Architecture
//!
//! - Per-test types (context, assertions, errors) live in `rulechain-core`
//! - Chains, suites, the process-wide registry and configuration live in
//!   `rulechain-engine`
//!
//! Both are re-exported here.

pub use rulechain_core::{
    should, Assertion, ChainError, FatalFailure, HookFailure, HookPhase, SuiteError,
    SuiteFailures, TestCase, TestContext, TestFailure, ASSERT_FAIL,
};
pub use rulechain_engine::{
    around_fn, init_logging, registry, AroundFn, Closer, ConfigError, HarnessConfig, RuleChain,
    SuiteRule, SuiteRuleChain, SuiteRun, TestBody, TestReport, TestRule, CONFIG_ENV_VAR,
    CONFIG_FILE_NAME,
};
