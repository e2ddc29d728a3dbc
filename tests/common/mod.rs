//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a test's main.rs.

#![allow(dead_code)]

use parking_lot::{Mutex, MutexGuard};
use rulechain::{around_fn, SuiteRule, TestRule};
use std::sync::Arc;

// ============================================================================
// Event log
// ============================================================================

/// Ordered record of what rules, hooks and bodies did.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.lock().iter().any(|e| e == event)
    }
}

// ============================================================================
// Per-test rules
// ============================================================================

/// Rule that logs `<name>:enter` / `<name>:exit` around the body.
pub fn tracing_rule(name: &'static str, log: &EventLog) -> impl TestRule + 'static {
    let log = log.clone();
    around_fn(move |t, body| {
        log.push(format!("{name}:enter"));
        body(t);
        log.push(format!("{name}:exit"));
    })
}

/// Rule that logs `<name>:skip` and never runs the body.
pub fn skip_rule(name: &'static str, log: &EventLog) -> impl TestRule + 'static {
    let log = log.clone();
    around_fn(move |_t, _body| log.push(format!("{name}:skip")))
}

// ============================================================================
// Suite rules
// ============================================================================

/// Suite rule that logs its hooks and fails them on request.
pub struct RecordingSuiteRule {
    pub name: &'static str,
    pub log: EventLog,
    pub fail_before: bool,
    pub fail_after: bool,
}

impl RecordingSuiteRule {
    pub fn ok(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_before: false,
            fail_after: false,
        }
    }

    pub fn failing_before(name: &'static str, log: &EventLog) -> Self {
        Self {
            fail_before: true,
            ..Self::ok(name, log)
        }
    }

    pub fn failing_after(name: &'static str, log: &EventLog) -> Self {
        Self {
            fail_after: true,
            ..Self::ok(name, log)
        }
    }
}

impl SuiteRule for RecordingSuiteRule {
    fn name(&self) -> &str {
        self.name
    }

    fn before(&self) -> anyhow::Result<()> {
        self.log.push(format!("{}.before", self.name));
        if self.fail_before {
            anyhow::bail!("{} could not start", self.name);
        }
        Ok(())
    }

    fn after(&self) -> anyhow::Result<()> {
        self.log.push(format!("{}.after", self.name));
        if self.fail_after {
            anyhow::bail!("{} could not stop", self.name);
        }
        Ok(())
    }
}

// ============================================================================
// Registry serialisation
// ============================================================================

static REGISTRY_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Serialise tests that touch the process-wide registry and start each one
/// from a clean slate.
pub fn registry_guard() -> MutexGuard<'static, ()> {
    let guard = REGISTRY_LOCK.lock();
    rulechain::registry::reset();
    guard
}
