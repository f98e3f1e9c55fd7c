//! Wizard step state machine.
//!
//! This module provides functions for managing the lifecycle of the four
//! wizard steps, including status transitions, gating and event emission.

use crate::snapshot::ComponentSnapshot;
use csk_protocol::{ArtifactKind, Event, StepStatus, WizardStep};
use tokio::sync::mpsc::UnboundedSender;

/// Status of every wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepBoard {
    statuses: [StepStatus; 4],
}

impl StepBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, step: WizardStep) -> StepStatus {
        self.statuses[step.index()]
    }

    /// Steps paired with their status, in wizard order.
    pub fn iter(&self) -> impl Iterator<Item = (WizardStep, StepStatus)> + '_ {
        WizardStep::ALL.into_iter().map(|step| (step, self.status(step)))
    }

    /// Whether the panel should let the user start `step`: its predecessor
    /// is Done and the step itself is Pending or Failed.
    ///
    /// The handlers do not check this themselves.
    pub fn is_enabled(&self, step: WizardStep) -> bool {
        let own = matches!(self.status(step), StepStatus::Pending | StepStatus::Failed);
        let gate = step
            .predecessor()
            .map_or(true, |prev| self.status(prev) == StepStatus::Done);
        own && gate
    }

    pub fn any_in_progress(&self) -> bool {
        self.statuses.contains(&StepStatus::InProgress)
    }

    /// The step currently InProgress, if any.
    pub fn running(&self) -> Option<WizardStep> {
        self.iter()
            .find(|(_, status)| *status == StepStatus::InProgress)
            .map(|(step, _)| step)
    }

    /// The first step that is not Done, if any.
    pub fn current(&self) -> Option<WizardStep> {
        self.iter()
            .find(|(_, status)| *status != StepStatus::Done)
            .map(|(step, _)| step)
    }
}

/// Set a status and report the change. Unchanged statuses emit nothing.
fn set_status(
    board: &mut StepBoard,
    step: WizardStep,
    status: StepStatus,
    events_tx: &UnboundedSender<Event>,
) {
    let slot = &mut board.statuses[step.index()];
    if *slot == status {
        return;
    }
    tracing::info!(step = ?step, from = ?*slot, to = ?status, "step status changed");
    *slot = status;
    let _ = events_tx.send(Event::StepStatusChanged { step, status });
}

/// Transition the step to InProgress and emit event.
pub fn start_step(board: &mut StepBoard, step: WizardStep, events_tx: &UnboundedSender<Event>) {
    set_status(board, step, StepStatus::InProgress, events_tx);
}

/// Mark the step as Done and emit event.
pub fn complete_step(board: &mut StepBoard, step: WizardStep, events_tx: &UnboundedSender<Event>) {
    set_status(board, step, StepStatus::Done, events_tx);
}

/// Mark the step as Failed and emit event.
pub fn fail_step(board: &mut StepBoard, step: WizardStep, events_tx: &UnboundedSender<Event>) {
    set_status(board, step, StepStatus::Failed, events_tx);
}

/// Apply a step's terminal outcome.
pub fn finish_step(
    board: &mut StepBoard,
    step: WizardStep,
    outcome: StepStatus,
    events_tx: &UnboundedSender<Event>,
) {
    match outcome {
        StepStatus::Done => complete_step(board, step, events_tx),
        _ => fail_step(board, step, events_tx),
    }
}

/// Whether the snapshot alone shows the step as complete.
pub fn derived_done(step: WizardStep, snapshot: &ComponentSnapshot) -> bool {
    match step {
        WizardStep::Generate => snapshot.all_generated_present(),
        WizardStep::Publish => snapshot.is_tracked(),
        WizardStep::Provision => {
            snapshot.is_present(ArtifactKind::ServiceAccountBinding)
                || snapshot.backend_configs_present()
        }
        WizardStep::Synchronize => snapshot.backend_configs_present(),
    }
}

/// Re-derive every step that is not InProgress from a fresh snapshot.
///
/// A step detected as complete becomes Done. Otherwise a Failed step stays
/// Failed so its failure remains visible, and anything else becomes Pending.
pub fn rederive_from_snapshot(
    board: &mut StepBoard,
    snapshot: &ComponentSnapshot,
    events_tx: &UnboundedSender<Event>,
) {
    for step in WizardStep::ALL {
        let current = board.status(step);
        if current == StepStatus::InProgress {
            continue;
        }
        let next = if derived_done(step, snapshot) {
            StepStatus::Done
        } else if current == StepStatus::Failed {
            StepStatus::Failed
        } else {
            StepStatus::Pending
        };
        set_status(board, step, next, events_tx);
    }
}
