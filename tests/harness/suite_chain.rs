//! Suite chain setup/teardown ordering and error aggregation

use crate::common::*;
use rulechain::{HarnessConfig, HookPhase, SuiteError, SuiteRuleChain};

fn abc(log: &EventLog) -> SuiteRuleChain {
    SuiteRuleChain::new(RecordingSuiteRule::ok("A", log))
        .around(RecordingSuiteRule::ok("B", log))
        .around(RecordingSuiteRule::ok("C", log))
}

// ============================================================================
// Ordering
// ============================================================================

/// Test: after hooks run C, B, A
#[test]
fn test_after_runs_in_reverse() {
    let log = EventLog::new();
    let chain = abc(&log);

    let run = chain.before_suite();
    run.after_suite().unwrap();

    assert_eq!(
        log.events(),
        vec!["A.before", "B.before", "C.before", "C.after", "B.after", "A.after"]
    );
}

/// Test: a failing before on B still lets C set up, and every after runs
#[test]
fn test_failing_before_keeps_siblings_running() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::ok("A", &log))
        .around(RecordingSuiteRule::failing_before("B", &log))
        .around(RecordingSuiteRule::ok("C", &log));

    let err = chain.before_suite().after_suite().unwrap_err();

    assert!(log.contains("C.before"));
    assert_eq!(
        log.events(),
        vec!["A.before", "B.before", "C.before", "C.after", "B.after", "A.after"]
    );
    let failures = err.failures().unwrap();
    let recorded: Vec<(&str, HookPhase)> =
        failures.iter().map(|f| (f.rule(), f.phase())).collect();
    assert_eq!(recorded, vec![("B", HookPhase::Before)]);
}

/// Test: failures from both phases are aggregated in occurrence order
#[test]
fn test_failures_aggregate_across_phases() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::failing_after("A", &log))
        .around(RecordingSuiteRule::failing_before("B", &log));

    let err = chain.before_suite().after_suite().unwrap_err();

    assert_eq!(
        err.to_string(),
        "errors during after_suite(): [B::before: B could not start; A::after: A could not stop]"
    );
}

// ============================================================================
// Closers
// ============================================================================

/// Test: closers run in registration order after a clean teardown
#[test]
fn test_closers_run_after_clean_teardown() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::ok("A", &log));

    let mut run = chain.before_suite();
    for name in ["db", "tmp", "socket"] {
        let log = log.clone();
        run.close_after_suite(move || {
            log.push(format!("close:{name}"));
            Ok(())
        });
    }
    log.push("tests");
    run.after_suite().unwrap();

    assert_eq!(
        log.events(),
        vec!["A.before", "tests", "A.after", "close:db", "close:tmp", "close:socket"]
    );
}

/// Test: a failing closer neither stops later closers nor fails the suite
#[test]
fn test_failing_closer_is_ignored() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::ok("A", &log));

    let mut run = chain.before_suite();
    run.close_after_suite(|| anyhow::bail!("already closed"));
    let later = log.clone();
    run.close_after_suite(move || {
        later.push("close:later");
        Ok(())
    });

    assert!(run.after_suite().is_ok());
    assert!(log.contains("close:later"));
}

/// Test: closers are skipped when the suite failed
#[test]
fn test_closers_skipped_on_failure() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::failing_after("A", &log));

    let mut run = chain.before_suite();
    let closer_log = log.clone();
    run.close_after_suite(move || {
        closer_log.push("close");
        Ok(())
    });

    assert!(matches!(run.after_suite(), Err(SuiteError::Failed(_))));
    assert!(!log.contains("close"));
}

/// Test: a run tears down the chain that set it up, never another one
#[test]
fn test_run_is_bound_to_its_chain() {
    let log = EventLog::new();
    let x = SuiteRuleChain::new(RecordingSuiteRule::ok("X", &log));
    let y = SuiteRuleChain::new(RecordingSuiteRule::ok("Y", &log));

    let run = y.before_suite();
    run.after_suite().unwrap();

    assert_eq!(log.events(), vec!["Y.before", "Y.after"]);
    assert_eq!(x.len(), 1);
}

// ============================================================================
// Whole-suite runs
// ============================================================================

/// Test: consecutive runs report only their own failures
#[test]
fn test_consecutive_runs_are_independent() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::failing_before("A", &log));

    for _ in 0..3 {
        let err = chain.before_suite().after_suite().unwrap_err();
        assert_eq!(err.failures().map(|f| f.len()), Some(1));
    }
}

/// Test: run() drives setup, body and teardown in order
#[test]
fn test_run_wraps_body() {
    let log = EventLog::new();
    let chain = abc(&log);

    let body_log = log.clone();
    chain
        .run(&HarnessConfig::default(), move |run| {
            body_log.push("body");
            assert!(run.errors().is_empty());
        })
        .unwrap();

    assert_eq!(
        log.events(),
        vec!["A.before", "B.before", "C.before", "body", "C.after", "B.after", "A.after"]
    );
}

/// Test: abort_on_suite_failure turns failures into a panic
#[test]
#[should_panic(expected = "A::after: A could not stop")]
fn test_run_aborts_when_configured() {
    let log = EventLog::new();
    let chain = SuiteRuleChain::new(RecordingSuiteRule::failing_after("A", &log));
    let config = HarnessConfig {
        abort_on_suite_failure: true,
        ..HarnessConfig::default()
    };
    let _ = chain.run(&config, |_| {});
}
