//! Process-wide active chains
//!
//! For callers that prefer free functions over passing chain handles around.
//! The registry holds at most one active per-test chain and one active suite
//! chain; installing a new one replaces the previous (no merging).
//!
//! ```ignore
//! use rulechain::registry;
//!
//! registry::new_rule_chain(LogRule).around(RetryRule)?;
//! registry::test("adds", |t| t.should("1 + 1 == 2").assert(1 + 1 == 2));
//! ```
//!
//! State lives behind `parking_lot` locks. No lock is held while rules,
//! hooks, closers or test bodies run, so any of them may call back into the
//! registry.

use crate::chain::RuleChain;
use crate::report::TestReport;
use crate::rule::TestRule;
use crate::suite::{Closer, SuiteRule, SuiteRuleChain, SuiteRun};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use rulechain_core::{ChainError, SuiteError, TestContext};
use std::sync::Arc;
use tracing::{debug, warn};

static ACTIVE_CHAIN: Lazy<RwLock<Option<Arc<RuleChain>>>> = Lazy::new(|| RwLock::new(None));

#[derive(Default)]
struct SuiteState {
    chain: Option<Arc<SuiteRuleChain>>,
    /// Bumped whenever a new suite chain is installed
    generation: u64,
    run: Option<SuiteRun>,
    closers: Vec<Closer>,
}

static SUITE: Lazy<Mutex<SuiteState>> = Lazy::new(|| Mutex::new(SuiteState::default()));

/// Handle to the active per-test chain, for fluent extension
#[derive(Debug, Clone, Copy)]
pub struct ActiveChain;

impl ActiveChain {
    /// Append `rule` to the active chain; see [`around`].
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NoActiveChain`] if the registry was reset since
    /// this handle was created.
    pub fn around(self, rule: impl TestRule + 'static) -> Result<Self, ChainError> {
        around(rule)
    }
}

/// Handle to the active suite chain, for fluent extension
#[derive(Debug, Clone, Copy)]
pub struct ActiveSuiteChain;

impl ActiveSuiteChain {
    /// Append `rule` to the active suite chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NoActiveSuiteChain`] if the registry was reset
    /// since this handle was created.
    pub fn around(self, rule: impl SuiteRule + 'static) -> Result<Self, ChainError> {
        around_suite(rule)
    }
}

/// Install a fresh active per-test chain holding `rule`.
///
/// Any previously active chain is discarded.
pub fn new_rule_chain(rule: impl TestRule + 'static) -> ActiveChain {
    install_rule_chain(RuleChain::new(rule))
}

/// Install a prepared chain as the active one
pub fn install_rule_chain(chain: RuleChain) -> ActiveChain {
    debug!(rules = chain.len(), "Installing active rule chain");
    if ACTIVE_CHAIN.write().replace(Arc::new(chain)).is_some() {
        debug!("Replaced previously active rule chain");
    }
    ActiveChain
}

/// Append `rule` to the active per-test chain.
///
/// # Errors
///
/// Returns [`ChainError::NoActiveChain`] if no chain was installed.
pub fn around(rule: impl TestRule + 'static) -> Result<ActiveChain, ChainError> {
    let mut active = ACTIVE_CHAIN.write();
    let chain = active.as_mut().ok_or(ChainError::NoActiveChain)?;
    Arc::make_mut(chain).push(Arc::new(rule));
    Ok(ActiveChain)
}

/// Snapshot of the active per-test chain
pub fn active_rule_chain() -> Option<Arc<RuleChain>> {
    ACTIVE_CHAIN.read().clone()
}

/// Run `body` through the active chain, or unwrapped when none is installed.
pub fn run_test<F>(name: impl Into<String>, body: F) -> TestReport
where
    F: FnOnce(&TestContext),
{
    match active_rule_chain() {
        Some(chain) => chain.run_test(name, body),
        None => RuleChain::default().run_test(name, body),
    }
}

/// Like [`run_test`], panicking if the test recorded any failure
pub fn test<F>(name: impl Into<String>, body: F)
where
    F: FnOnce(&TestContext),
{
    match active_rule_chain() {
        Some(chain) => chain.test(name, body),
        None => RuleChain::default().test(name, body),
    }
}

/// Install a fresh active suite chain holding `rule`.
///
/// An unfinished suite run on the previous chain is discarded.
pub fn new_suite_rule_chain(rule: impl SuiteRule + 'static) -> ActiveSuiteChain {
    let mut state = SUITE.lock();
    state.chain = Some(Arc::new(SuiteRuleChain::new(rule)));
    state.generation = state.generation.wrapping_add(1);
    if state.run.take().is_some() {
        warn!("Discarding unfinished suite run");
    }
    ActiveSuiteChain
}

/// Append `rule` to the active suite chain.
///
/// A suite already running keeps the rules it started with; the new rule
/// takes part from the next [`before_suite`].
///
/// # Errors
///
/// Returns [`ChainError::NoActiveSuiteChain`] if no suite chain was installed.
pub fn around_suite(rule: impl SuiteRule + 'static) -> Result<ActiveSuiteChain, ChainError> {
    let mut state = SUITE.lock();
    let chain = state
        .chain
        .as_mut()
        .ok_or(ChainError::NoActiveSuiteChain)?;
    Arc::make_mut(chain).push(Arc::new(rule));
    Ok(ActiveSuiteChain)
}

/// Run every suite `before` and start the process-wide suite run.
///
/// The run is bound to the chain active at this call. An unfinished previous
/// run, and the errors it collected, is discarded.
///
/// # Errors
///
/// Returns [`ChainError::NoActiveSuiteChain`] if no suite chain was installed.
pub fn before_suite() -> Result<(), ChainError> {
    let (chain, generation) = {
        let state = SUITE.lock();
        let chain = state
            .chain
            .clone()
            .ok_or(ChainError::NoActiveSuiteChain)?;
        (chain, state.generation)
    };
    let run = chain.before_suite();

    let mut state = SUITE.lock();
    if state.generation != generation {
        warn!("Suite chain replaced during setup; the run keeps the chain it started with");
    }
    if state.run.replace(run).is_some() {
        warn!("Discarding unfinished suite run");
    }
    Ok(())
}

/// Register a cleanup action for the process-wide suite run
pub fn close_after_suite<F>(closer: F)
where
    F: FnOnce() -> anyhow::Result<()> + Send + 'static,
{
    SUITE.lock().closers.push(Box::new(closer));
}

/// Run every suite `after` in reverse and finish the process-wide run.
///
/// Closers registered with [`close_after_suite`] run in registration order,
/// and only when no hook failed.
///
/// # Errors
///
/// Returns [`SuiteError::NotStarted`] without a prior [`before_suite`], and
/// [`SuiteError::Failed`] when any hook failed.
pub fn after_suite() -> Result<(), SuiteError> {
    let (mut run, closers) = {
        let mut state = SUITE.lock();
        let run = match state.run.take() {
            Some(run) => run,
            None if state.chain.is_none() => return Err(ChainError::NoActiveSuiteChain.into()),
            None => return Err(SuiteError::NotStarted),
        };
        (run, std::mem::take(&mut state.closers))
    };
    run.extend_closers(closers);
    run.after_suite()
}

/// Clear every active chain, run and closer.
///
/// Meant for tests that exercise the registry itself.
pub fn reset() {
    *ACTIVE_CHAIN.write() = None;
    *SUITE.lock() = SuiteState::default();
}
