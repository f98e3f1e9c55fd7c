//! Setup wizard step models.
//!
//! This module defines the ordered steps of the CI/CD setup wizard and the
//! status each of them carries through a session.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One gated stage of the setup wizard.
///
/// Steps are strictly ordered: a step can only start once its predecessor
/// has reached [`StepStatus::Done`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    /// Write the pipeline, fastlane, dependency and ignore files.
    Generate,

    /// Stage, commit and push the generated files.
    Publish,

    /// Run the remote provisioning workflow that creates the backend project.
    Provision,

    /// Pull the provisioned backend config files into the working copy.
    Synchronize,
}

impl WizardStep {
    /// All steps in execution order.
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Generate,
        WizardStep::Publish,
        WizardStep::Provision,
        WizardStep::Synchronize,
    ];

    /// Zero-based position of this step in the wizard.
    pub fn index(self) -> usize {
        match self {
            WizardStep::Generate => 0,
            WizardStep::Publish => 1,
            WizardStep::Provision => 2,
            WizardStep::Synchronize => 3,
        }
    }

    /// The step that must be Done before this one may start.
    pub fn predecessor(self) -> Option<WizardStep> {
        match self {
            WizardStep::Generate => None,
            WizardStep::Publish => Some(WizardStep::Generate),
            WizardStep::Provision => Some(WizardStep::Publish),
            WizardStep::Synchronize => Some(WizardStep::Provision),
        }
    }

    /// Short label shown in the panel and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Generate => "Generate CI files",
            WizardStep::Publish => "Commit & push",
            WizardStep::Provision => "Provision Firebase",
            WizardStep::Synchronize => "Pull backend configs",
        }
    }
}

/// Lifecycle status of a single wizard step.
///
/// Happy path: Pending -> InProgress -> Done.
/// A step may also go InProgress -> Failed, and a Failed step may be
/// retried, entering InProgress again.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// Not started in this session and not detected as complete.
    #[default]
    Pending,

    /// The step's external commands are running.
    InProgress,

    /// The step finished successfully or was detected as complete.
    Done,

    /// The step's decision rule reported a failure.
    Failed,
}

impl StepStatus {
    /// Whether the step is finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Done | StepStatus::Failed)
    }
}
