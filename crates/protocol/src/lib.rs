//! # csk-protocol
//!
//! Core protocol definitions and data models for ci-setup-kit.
//!
//! This crate defines all shared data structures used for:
//! - Configuration file parsing (`.ci-setup/config.toml`)
//! - Setup wizard step state
//! - Project artifact snapshots and detected tools
//! - Remote workflow run records
//! - Communication between the panel and the workflow core
//!
//! ## Modules
//!
//! - [`artifact_models`]: Artifact presence and tool detection results
//! - [`config_models`]: Global configuration from config.toml
//! - [`process_models`]: Runner channels
//! - [`run_models`]: Remote workflow runs and build dispatch inputs
//! - [`step_models`]: Wizard steps and their status
//! - [`ipc`]: Operations and Events between the panel and the core
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other ci-setup-kit crates

pub mod artifact_models;
pub mod config_models;
pub mod ipc;
pub mod process_models;
pub mod run_models;
pub mod step_models;

// Re-export all public types for convenience
pub use artifact_models::*;
pub use config_models::*;
pub use ipc::*;
pub use process_models::*;
pub use run_models::*;
pub use step_models::*;
