//! Harness Integration Tests
//!
//! Rule chains, suite chains and assertions driven through the public API.

#[path = "../common/mod.rs"]
mod common;

mod config;
mod suite_chain;
