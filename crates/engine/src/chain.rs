//! Per-test rule chain
//!
//! A `RuleChain` is an ordered list of [`TestRule`]s. Applying it to a body
//! folds the rules so that the first-declared rule is the outermost wrapper:
//! `RuleChain::new(a).around(b).around(c)` runs a body `f` as `a(b(c(f)))`.
//!
//! Chains are usually built once and shared by every test in a binary:
//!
//! ```ignore
//! static RULES: Lazy<RuleChain> =
//!     Lazy::new(|| RuleChain::new(LogRule).around(TempDirRule::default()));
//!
//! #[test]
//! fn writes_file() {
//!     RULES.test("writes_file", |t| {
//!         t.should("file exists").assert(path.exists());
//!     });
//! }
//! ```

use crate::config::HarnessConfig;
use crate::report::TestReport;
use crate::rule::{TestBody, TestRule};
use rulechain_core::{FatalFailure, TestCase, TestContext};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered per-test rules, outermost first
#[derive(Clone)]
pub struct RuleChain {
    rules: Vec<Arc<dyn TestRule>>,
    capture_panics: bool,
}

impl Default for RuleChain {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            capture_panics: true,
        }
    }
}

impl fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("rules", &self.rules.len())
            .field("capture_panics", &self.capture_panics)
            .finish()
    }
}

impl RuleChain {
    /// Create a chain holding a single rule
    pub fn new(rule: impl TestRule + 'static) -> Self {
        Self::default().around(rule)
    }

    /// Append `rule` as the new innermost wrapper
    pub fn around(mut self, rule: impl TestRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub(crate) fn push(&mut self, rule: Arc<dyn TestRule>) {
        self.rules.push(rule);
    }

    /// Apply settings from a harness config
    pub fn with_config(mut self, config: &HarnessConfig) -> Self {
        self.capture_panics = config.capture_panics;
        self
    }

    /// Number of rules in the chain
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True for a chain that runs bodies unwrapped
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Wrap `body` with every rule, first-declared outermost.
    pub fn apply<'a>(&'a self, case: &'a TestCase, body: TestBody<'a>) -> TestBody<'a> {
        self.rules
            .iter()
            .rev()
            .fold(body, |inner, rule| rule.apply(case, inner))
    }

    /// Run `body` through the chain with a fresh test case.
    ///
    /// Fatal failures stop the body and are contained here. Any other panic
    /// is recorded as a failure when `capture_panics` is set, and resumed
    /// otherwise.
    pub fn run_test<F>(&self, name: impl Into<String>, body: F) -> TestReport
    where
        F: FnOnce(&TestContext),
    {
        let case = Arc::new(TestCase::new(name));
        let ctx = TestContext::new(Arc::clone(&case));
        debug!(test = case.name(), rules = self.rules.len(), "Running test");

        let outcome = {
            let wrapped = self.apply(&case, Box::new(body));
            catch_unwind(AssertUnwindSafe(move || wrapped(&ctx)))
        };

        let mut stopped = false;
        if let Err(payload) = outcome {
            stopped = true;
            if payload.downcast_ref::<FatalFailure>().is_none() {
                if !self.capture_panics {
                    resume_unwind(payload);
                }
                case.error(format_args!("panicked: {}", panic_message(payload.as_ref())));
            }
        }

        let report = TestReport::new(case.name().to_string(), case.failures(), stopped);
        if report.passed() {
            debug!(test = report.name(), "Test passed");
        } else {
            warn!(
                test = report.name(),
                failures = report.failures().len(),
                stopped = report.stopped(),
                "Test failed"
            );
        }
        report
    }

    /// Run `body` and panic if it recorded any failure.
    ///
    /// This is the libtest entry point: the panic marks the `#[test]` failed
    /// with every recorded message.
    pub fn test<F>(&self, name: impl Into<String>, body: F)
    where
        F: FnOnce(&TestContext),
    {
        if let Err(failure) = self.run_test(name, body).into_result() {
            panic!("{}", failure);
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
