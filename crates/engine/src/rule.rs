//! Per-test rules
//!
//! A rule receives the test case and the body it should wrap, and returns a
//! new body. Rules never run the body themselves during `apply`; they only
//! build the wrapper that runs it.

use rulechain_core::{TestCase, TestContext};
use std::fmt;

/// A test body: runs once against the context of one invocation.
pub type TestBody<'a> = Box<dyn FnOnce(&TestContext) + 'a>;

/// Wraps a test body with setup, teardown or skip behaviour.
///
/// Rules are shared by every test that runs through a chain, possibly on
/// several libtest threads at once, so they must be `Send + Sync`.
pub trait TestRule: Send + Sync {
    /// Return `body` wrapped with this rule's behaviour.
    fn apply<'a>(&'a self, case: &'a TestCase, body: TestBody<'a>) -> TestBody<'a>;
}

/// Closure adapter created by [`around_fn`]
pub struct AroundFn<F> {
    around: F,
}

impl<F> TestRule for AroundFn<F>
where
    F: Fn(&TestContext, TestBody<'_>) + Send + Sync,
{
    fn apply<'a>(&'a self, _case: &'a TestCase, body: TestBody<'a>) -> TestBody<'a> {
        Box::new(move |t: &TestContext| (self.around)(t, body))
    }
}

impl<F> fmt::Debug for AroundFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AroundFn").finish_non_exhaustive()
    }
}

/// Build a rule from a closure that receives the context and the inner body.
///
/// The closure decides whether and when to call the body:
///
/// ```ignore
/// let timing = around_fn(|t, body| {
///     let start = Instant::now();
///     body(t);
///     tracing::info!(test = t.name(), elapsed = ?start.elapsed());
/// });
/// ```
pub fn around_fn<F>(around: F) -> AroundFn<F>
where
    F: Fn(&TestContext, TestBody<'_>) + Send + Sync,
{
    AroundFn { around }
}
