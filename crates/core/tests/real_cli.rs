//! Tests against the real git installation.
//!
//! Run with: `cargo test --features e2e-cli-tests`

#![cfg(feature = "e2e-cli-tests")]

use csk_core::workflow::Wizard;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;

#[tokio::test]
async fn test_detects_installed_git() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, _rx) = unbounded_channel();
    let mut wizard = Wizard::open(dir.path(), tx).unwrap();

    wizard.detect_tools();
    for _ in 0..1000 {
        wizard.tick();
        if !wizard.is_busy() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let git = wizard.tools().iter().find(|t| t.name == "git").unwrap();
    assert!(git.found, "git should be installed for e2e tests");
    assert!(git.version.as_deref().unwrap_or_default().starts_with("git version"));
}
