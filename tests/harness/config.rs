//! Harness configuration loading

use rulechain::{init_logging, HarnessConfig, RuleChain, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tempfile::TempDir;

/// Test: the env var points load() at a file
#[test]
fn test_load_from_env_var() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "log_level = \"warn\"\ncapture_panics = false\n").unwrap();

    std::env::set_var(CONFIG_ENV_VAR, &path);
    let loaded = HarnessConfig::load();
    std::env::remove_var(CONFIG_ENV_VAR);

    let config = loaded.unwrap();
    assert_eq!(config.log_level, "warn");
    assert!(!config.capture_panics);
    init_logging(&config).unwrap();
}

/// Test: capture_panics = false lets foreign panics reach libtest
#[test]
fn test_capture_panics_setting_applies_to_chain() {
    let config = HarnessConfig::from_toml_str("capture_panics = false").unwrap();
    let chain = RuleChain::default().with_config(&config);

    let result = catch_unwind(AssertUnwindSafe(|| {
        chain.run_test("explodes", |_| panic!("not a rule failure"));
    }));
    assert!(result.is_err());
}
