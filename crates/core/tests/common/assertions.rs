//! Event assertion helpers.

use csk_protocol::{Event, StepStatus, WizardStep};

/// Statuses reported for `step`, in emission order.
pub fn step_transitions(events: &[Event], step: WizardStep) -> Vec<StepStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::StepStatusChanged { step: s, status } if *s == step => Some(*status),
            _ => None,
        })
        .collect()
}

/// Assert that `step` only reached a terminal status after InProgress.
pub fn assert_went_through_in_progress(events: &[Event], step: WizardStep) {
    let transitions = step_transitions(events, step);
    let Some(first_terminal) = transitions.iter().position(|s| s.is_terminal()) else {
        panic!("{step:?} never finished: {transitions:?}");
    };
    assert!(
        transitions[..first_terminal].contains(&StepStatus::InProgress),
        "{step:?} finished without InProgress: {transitions:?}"
    );
}

pub fn has_snapshot_refresh(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::SnapshotRefreshed))
}
