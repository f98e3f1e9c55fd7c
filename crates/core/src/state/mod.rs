//! State management for the setup wizard.
//!
//! This module provides:
//! - The step status state machine and its snapshot-based re-derivation
//! - The persisted provisioning record

pub mod record;
pub mod steps;
