//! Generation of the CI/CD boilerplate files.
//!
//! This module renders the embedded templates into a Unity project:
//! - Build and provisioning workflows (`.github/workflows/`)
//! - Ruby dependency manifest and lock (`Gemfile`, `Gemfile.lock`)
//! - fastlane lane definitions and certificate repository (`fastlane/`)
//! - A Unity `.gitignore`
//!
//! # Example
//!
//! ```no_run
//! use csk_core::init::generate_artifacts;
//! use std::path::Path;
//!
//! let report = generate_artifacts(Path::new("."), "Space Goats");
//! println!("wrote {} files", report.written.len());
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_artifacts, GenerationReport};
pub use templates::{render, template_name};
