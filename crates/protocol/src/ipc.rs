//! Panel/core communication protocol.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands issued by the panel (button presses, key bindings)
//! - `Event`: State changes reported by the workflow core
//!
//! Events double as repaint signals: the panel schedules a frame whenever
//! one arrives.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::artifact_models::ToolStatus;
use crate::run_models::{BuildTarget, Distribution, RunInfo};
use crate::step_models::{StepStatus, WizardStep};

/// Operations sent from the panel to the workflow core.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "runStep",
///   "payload": { "step": "publish" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Execute one wizard step.
    RunStep { step: WizardStep },

    /// Re-read the project snapshot and re-derive step statuses.
    Refresh,

    /// Check the external tools on the background channel.
    DetectTools,

    /// Fetch the most recent remote workflow runs.
    FetchRuns,

    /// Dispatch the build workflow.
    TriggerBuild {
        target: BuildTarget,
        distribution: Distribution,
    },

    /// Empty the foreground runner's output.
    ClearOutput,

    /// Leave the panel.
    Shutdown,
}

/// Events sent from the workflow core to the panel.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A wizard step changed status.
    StepStatusChanged { step: WizardStep, status: StepStatus },

    /// A new project snapshot replaced the previous one.
    SnapshotRefreshed,

    /// A tool check finished.
    ToolDetected { tool: ToolStatus },

    /// The recent run list was replaced.
    RunsUpdated { runs: Vec<RunInfo> },

    /// A build dispatch finished; `accepted` is false when the CLI
    /// reported an error.
    BuildDispatched {
        target: BuildTarget,
        distribution: Distribution,
        accepted: bool,
    },
}
