//! Registry Integration Tests
//!
//! The process-wide chains, driven through free functions. Every test holds
//! the registry guard so they run one at a time against a reset registry.

#[path = "../common/mod.rs"]
mod common;
