//! Common test utilities for the workflow integration tests.
//!
//! This module provides:
//! - A temporary Unity project with fake `git` and `gh` executables
//! - Helpers to drive the wizard's tick loop
//! - Event assertions

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
pub use fixtures::*;
