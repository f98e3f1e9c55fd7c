//! # csk-tui
//!
//! Terminal User Interface for ci-setup-kit.
//!
//! This crate provides the interactive setup wizard panel. It owns a
//! `csk-core` [`Wizard`](csk_core::workflow::Wizard), turns key presses
//! into `Op`s and renders the `Event`s the wizard reports.

pub mod app;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::{Context, Result};
use csk_core::workflow::Wizard;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::mpsc::unbounded_channel;
use tracing::Level;

/// Log file of the interactive panel, relative to the project root.
pub const LOG_FILE: &str = ".ci-setup/wizard.log";

/// Run the wizard for the Unity project at `root` until the user quits.
pub async fn run_app(root: &Path) -> Result<()> {
    let (event_tx, event_rx) = unbounded_channel();
    let wizard = Wizard::open(root, event_tx)?;

    let mut tui = Tui::init()?;
    let mut app = App::new(wizard, event_rx);
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}

/// Send `tracing` output to [`LOG_FILE`], since stderr belongs to the
/// terminal while the panel is open.
pub fn init_file_logging(root: &Path, verbose: bool) -> Result<()> {
    let path = root.join(LOG_FILE);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
