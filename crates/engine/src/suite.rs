//! Suite rule chain
//!
//! Suite rules set up and tear down shared state around a whole group of
//! tests. Hook failures never stop sibling hooks: every `before` runs in
//! declaration order, every `after` runs in reverse order, and the failures
//! are collected in the [`SuiteRun`] and surfaced once teardown completes.
//!
//! ## Lifecycle
//!
//! 1. `before_suite()` runs every `before` and returns a fresh `SuiteRun`
//! 2. Tests run; cleanup actions are registered with `close_after_suite()`
//! 3. `run.after_suite()` runs every `after` of the chain that started the
//!    run, in reverse, then either reports the collected failures or runs the
//!    closers in registration order
//!
//! Each `SuiteRun` owns its own failure list, so a chain can drive any number
//! of consecutive suites in one process.

use crate::chain::panic_message;
use crate::config::HarnessConfig;
use rulechain_core::{ChainError, HookFailure, HookPhase, SuiteError, SuiteFailures};
use std::fmt;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Setup and teardown that wraps a whole suite
pub trait SuiteRule: Send + Sync {
    /// Name used in failure reports and logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Suite setup
    fn before(&self) -> anyhow::Result<()>;

    /// Suite teardown; runs even when `before` failed
    fn after(&self) -> anyhow::Result<()>;
}

/// Best-effort cleanup run after a successful suite
pub type Closer = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Ordered suite rules; never empty
#[derive(Clone)]
pub struct SuiteRuleChain {
    rules: Vec<Arc<dyn SuiteRule>>,
}

impl fmt::Debug for SuiteRuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

impl SuiteRuleChain {
    /// Create a chain whose first rule is `rule`
    pub fn new(rule: impl SuiteRule + 'static) -> Self {
        Self {
            rules: vec![Arc::new(rule)],
        }
    }

    /// Create a chain from a prepared rule list.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::EmptySuiteChain`] if `rules` is empty.
    pub fn from_rules(rules: Vec<Box<dyn SuiteRule>>) -> Result<Self, ChainError> {
        if rules.is_empty() {
            return Err(ChainError::EmptySuiteChain);
        }
        Ok(Self {
            rules: rules.into_iter().map(Arc::from).collect(),
        })
    }

    /// Append a rule; it sets up last and tears down first
    pub fn around(mut self, rule: impl SuiteRule + 'static) -> Self {
        self.push(Arc::new(rule));
        self
    }

    pub(crate) fn push(&mut self, rule: Arc<dyn SuiteRule>) {
        self.rules.push(rule);
    }

    /// Number of rules in the chain
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false: a chain holds at least one rule
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every `before` in declaration order and start a suite run.
    ///
    /// The run keeps a snapshot of this chain, so rules added afterwards
    /// never see a teardown without a setup. A failing `before` is recorded
    /// and the remaining rules still run.
    pub fn before_suite(&self) -> SuiteRun {
        let mut run = SuiteRun::new(self.clone());
        for rule in &self.rules {
            debug!(rule = rule.name(), "Running suite setup");
            if let Err(e) = rule.before() {
                warn!(rule = rule.name(), error = %e, "Suite setup failed");
                run.errors
                    .push(HookFailure::new(rule.name(), HookPhase::Before, e));
            }
        }
        run
    }

    /// Run a whole suite: setup, `body`, teardown.
    ///
    /// Teardown runs even if `body` panics; the panic is logged before
    /// teardown and resumed afterwards. With `abort_on_suite_failure` set,
    /// hook failures panic instead of being returned.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Failed`] when any hook failed.
    pub fn run<F>(&self, config: &HarnessConfig, body: F) -> Result<(), SuiteError>
    where
        F: FnOnce(&mut SuiteRun),
    {
        let mut run = self.before_suite();
        let outcome = catch_unwind(AssertUnwindSafe(|| body(&mut run)));
        if let Err(payload) = &outcome {
            error!(
                panic = panic_message(payload.as_ref()),
                "Suite body panicked"
            );
        }
        let result = if config.abort_on_suite_failure {
            run.after_suite_or_abort();
            Ok(())
        } else {
            run.after_suite()
        };
        if let Err(payload) = outcome {
            resume_unwind(payload);
        }
        result
    }
}

/// State of one suite between `before_suite` and `after_suite`
///
/// Bound to the chain that started it: teardown always runs that chain's
/// rules, whatever happens to the original chain in the meantime.
pub struct SuiteRun {
    chain: SuiteRuleChain,
    errors: SuiteFailures,
    closers: Vec<Closer>,
}

impl fmt::Debug for SuiteRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteRun")
            .field("chain", &self.chain)
            .field("errors", &self.errors.len())
            .field("closers", &self.closers.len())
            .finish()
    }
}

impl SuiteRun {
    fn new(chain: SuiteRuleChain) -> Self {
        Self {
            chain,
            errors: SuiteFailures::new(),
            closers: Vec::new(),
        }
    }

    /// Register a cleanup action to run after a successful teardown
    pub fn close_after_suite<F>(&mut self, closer: F)
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.closers.push(Box::new(closer));
    }

    pub(crate) fn extend_closers(&mut self, closers: Vec<Closer>) {
        self.closers.extend(closers);
    }

    /// Hook failures collected so far
    pub fn errors(&self) -> &SuiteFailures {
        &self.errors
    }

    /// Number of registered closers
    pub fn closer_count(&self) -> usize {
        self.closers.len()
    }

    /// The rules this run set up, in declaration order
    pub fn chain(&self) -> &SuiteRuleChain {
        &self.chain
    }

    /// Run every `after` in reverse order and finish the suite run.
    ///
    /// Closers only run when no hook failed during the whole run. Closer
    /// failures are logged and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Failed`] with every collected hook failure.
    pub fn after_suite(self) -> Result<(), SuiteError> {
        let SuiteRun {
            chain,
            mut errors,
            closers,
        } = self;

        for rule in chain.rules.iter().rev() {
            debug!(rule = rule.name(), "Running suite teardown");
            if let Err(e) = rule.after() {
                warn!(rule = rule.name(), error = %e, "Suite teardown failed");
                errors.push(HookFailure::new(rule.name(), HookPhase::After, e));
            }
        }

        if !errors.is_empty() {
            error!(failures = errors.len(), "Suite finished with hook failures");
            return Err(SuiteError::Failed(errors));
        }

        for (index, closer) in closers.into_iter().enumerate() {
            if let Err(e) = closer() {
                warn!(closer = index, error = %e, "Ignoring suite closer failure");
            }
        }
        debug!("Suite finished");
        Ok(())
    }

    /// Like [`after_suite`](Self::after_suite), but panics with every
    /// collected failure instead of returning them.
    pub fn after_suite_or_abort(self) {
        if let Err(e) = self.after_suite() {
            panic!("{}", e);
        }
    }
}
