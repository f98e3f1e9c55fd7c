//! Output-based step decisions.
//!
//! The external tools are judged by what they print, not by their exit
//! codes. Each rule lives here so it can be tested on captured text.

use crate::snapshot::ComponentSnapshot;
use csk_protocol::StepStatus;

/// Substrings of git's stderr that mean the publish did not happen.
pub const PUBLISH_FAILURE_MARKERS: [&str; 4] = [
    "fatal:",
    "error: failed to push",
    "! [rejected]",
    "error: pathspec",
];

/// Failed iff the publish script's stderr carries a git failure marker.
pub fn publish_outcome(stderr: &str) -> StepStatus {
    if PUBLISH_FAILURE_MARKERS
        .iter()
        .any(|marker| stderr.contains(marker))
    {
        StepStatus::Failed
    } else {
        StepStatus::Done
    }
}

/// Done iff the provisioning output reports `completed` and nowhere says
/// `failed`, ignoring case. The runner's `$ ` command echo lines are not
/// part of the output judged.
pub fn provision_outcome(output: &str) -> StepStatus {
    let output: String = output
        .lines()
        .filter(|line| !line.starts_with("$ "))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    if output.contains("completed") && !output.contains("failed") {
        StepStatus::Done
    } else {
        StepStatus::Failed
    }
}

/// Done iff both backend config files arrived with the pull.
pub fn synchronize_outcome(snapshot: &ComponentSnapshot) -> StepStatus {
    if snapshot.backend_configs_present() {
        StepStatus::Done
    } else {
        StepStatus::Failed
    }
}
