//! Test context wrapper and fluent assertions
//!
//! A [`TestContext`] is handed to every test body. It forwards failures to
//! the bound [`TestCase`], or logs them when used outside a test run.
//!
//! ```ignore
//! use rulechain::{should, TestContext};
//!
//! fn body(t: &TestContext) {
//!     t.should("math still works").verify(1 + 1 == 2);
//!     should!(t, "expected {} rows, got {}", 3, rows).assert(rows == 3);
//! }
//! ```

use crate::case::{FatalFailure, TestCase};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Message used by [`TestContext::assert`]
pub const ASSERT_FAIL: &str = "assert fail";

/// Per-invocation view of the running test
#[derive(Debug, Clone, Default)]
pub struct TestContext {
    case: Option<Arc<TestCase>>,
}

impl TestContext {
    /// Bind a context to a test case
    pub fn new(case: Arc<TestCase>) -> Self {
        Self { case: Some(case) }
    }

    /// A context with no test case behind it.
    ///
    /// Failures are logged instead of recorded; fatal failures still unwind.
    pub fn detached() -> Self {
        Self { case: None }
    }

    /// The bound test case, if any
    pub fn case(&self) -> Option<&TestCase> {
        self.case.as_deref()
    }

    /// Name of the bound test
    pub fn name(&self) -> Option<&str> {
        self.case.as_deref().map(TestCase::name)
    }

    /// True once the bound test recorded a failure
    pub fn failed(&self) -> bool {
        self.case.as_deref().is_some_and(TestCase::failed)
    }

    /// Record a non-fatal failure
    pub fn error(&self, message: impl fmt::Display) {
        match self.case.as_deref() {
            Some(case) => case.error(message),
            None => error!(message = %message, "Test failure reported outside a test case"),
        }
    }

    /// Record a failure and stop the test
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        match self.case.as_deref() {
            Some(case) => case.fatal(message),
            None => {
                let message = message.to_string();
                error!(%message, "Fatal test failure reported outside a test case");
                std::panic::panic_any(FatalFailure {
                    test: String::new(),
                    message,
                })
            }
        }
    }

    /// Record [`ASSERT_FAIL`] when `ok` is false; the test continues
    pub fn assert(&self, ok: bool) {
        if !ok {
            self.error(ASSERT_FAIL);
        }
    }

    /// Record `message` when `ok` is false; the test continues
    pub fn assert_with(&self, ok: bool, message: impl fmt::Display) {
        if !ok {
            self.error(message);
        }
    }

    /// Start a fluent assertion with a fixed message
    pub fn should(&self, message: impl Into<String>) -> Assertion<'_> {
        Assertion {
            ctx: self,
            message: Message::Text(message.into()),
        }
    }

    /// Start a fluent assertion whose message is only rendered on failure.
    ///
    /// Usually reached through the [`should!`](crate::should) macro.
    pub fn should_with<'a, F>(&'a self, render: F) -> Assertion<'a>
    where
        F: Fn() -> String + 'a,
    {
        Assertion {
            ctx: self,
            message: Message::Lazy(Box::new(render)),
        }
    }
}

enum Message<'a> {
    Text(String),
    Lazy(Box<dyn Fn() -> String + 'a>),
}

/// A pending check bound to a test context
pub struct Assertion<'a> {
    ctx: &'a TestContext,
    message: Message<'a>,
}

impl Assertion<'_> {
    /// Record a non-fatal failure when `ok` is false
    pub fn verify(&self, ok: bool) {
        if !ok {
            self.ctx.error(self.render());
        }
    }

    /// Record a fatal failure when `ok` is false, stopping the test
    pub fn assert(&self, ok: bool) {
        if !ok {
            self.ctx.fatal(self.render());
        }
    }

    /// The failure message this assertion would record
    pub fn render(&self) -> String {
        match &self.message {
            Message::Text(text) => text.clone(),
            Message::Lazy(render) => render(),
        }
    }
}

impl fmt::Debug for Assertion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("test", &self.ctx.name())
            .field("message", &self.render())
            .finish()
    }
}

/// Build an [`Assertion`] with a `format!`-style message.
///
/// The message is rendered only when the assertion fails.
#[macro_export]
macro_rules! should {
    ($ctx:expr, $($arg:tt)+) => {
        $ctx.should_with(|| ::std::format!($($arg)+))
    };
}
