//! Main entry point for the csk-tui binary.
//!
//! This executable opens the setup wizard for the project in the current
//! directory.

use anyhow::Result;
use csk_tui::{init_file_logging, run_app};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let root = Path::new(".");
    init_file_logging(root, false)?;
    run_app(root).await
}
