//! # csk-core
//!
//! Engine of ci-setup-kit, a setup wizard that bootstraps CI/CD for a Unity
//! game project by orchestrating external CLIs (git, gh, firebase, gcloud).
//!
//! This crate provides:
//! - A non-blocking, queue-serialized external process runner
//! - A status snapshot of the project's CI/CD artifacts
//! - The four-step setup workflow and its state machine
//! - Template generation and configuration loading
//!
//! ## Modules
//!
//! - [`runner`]: Process runner, tool search path and output pump
//! - [`snapshot`]: Artifact and repository status collection
//! - [`state`]: Step statuses and the persisted provisioning record
//! - [`workflow`]: The wizard and its step handlers
//! - [`init`]: Embedded templates and artifact generation
//! - [`config`]: `.ci-setup/config.toml` loading

pub mod config;
pub mod init;
pub mod runner;
pub mod snapshot;
pub mod state;
pub mod workflow;
