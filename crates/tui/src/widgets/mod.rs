//! TUI widgets module.
//!
//! This module contains the panels of the setup wizard.

pub mod artifacts_view;
pub mod output_view;
pub mod runs_view;
pub mod wizard_view;

pub use artifacts_view::{render_artifacts, ProjectHeader};
pub use output_view::render_output;
pub use runs_view::render_runs;
pub use wizard_view::render_wizard;
