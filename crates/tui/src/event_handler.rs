//! Event handling utilities for the TUI.
//!
//! This module provides functions for handling:
//! - Core events (from the wizard), turned into notices for the status bar
//! - Keyboard events, turned into wizard operations

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use csk_core::state::steps::StepBoard;
use csk_protocol::{BuildTarget, Distribution, Event, Op, StepStatus, WizardStep};

/// Oldest notices are dropped beyond this.
const MAX_NOTICES: usize = 50;

/// Panel state that lives only in the UI.
#[derive(Debug, Default)]
pub struct PanelState {
    /// Index into [`WizardStep::ALL`].
    pub selected: usize,
    pub target: BuildTarget,
    pub distribution: Distribution,
    /// Status messages, newest last.
    pub notices: Vec<String>,
}

impl PanelState {
    pub fn selected_step(&self) -> WizardStep {
        WizardStep::ALL[self.selected.min(WizardStep::ALL.len() - 1)]
    }

    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    pub fn latest_notice(&self) -> Option<&str> {
        self.notices.last().map(String::as_str)
    }
}

/// Handle an event received from the wizard.
pub fn handle_core_event(panel: &mut PanelState, event: Event) {
    match event {
        Event::StepStatusChanged { step, status } => match status {
            StepStatus::InProgress => panel.push_notice(format!("{} started", step.label())),
            StepStatus::Done => panel.push_notice(format!("{} done", step.label())),
            StepStatus::Failed => panel.push_notice(format!(
                "{} failed, see output (Enter to retry)",
                step.label()
            )),
            StepStatus::Pending => {}
        },
        Event::ToolDetected { tool } => {
            if !tool.found {
                panel.push_notice(format!("{} not found on PATH", tool.name));
            } else if !tool.meets_minimum {
                panel.push_notice(format!(
                    "{} {} is too old",
                    tool.name,
                    tool.version.unwrap_or_default()
                ));
            } else if tool.authenticated == Some(false) {
                panel.push_notice(format!(
                    "{} is not logged in (run {} auth login)",
                    tool.name, tool.name
                ));
            }
        }
        Event::BuildDispatched {
            target,
            distribution,
            accepted,
        } => {
            if accepted {
                panel.push_notice(format!(
                    "Build dispatched: {} / {}",
                    target.as_input(),
                    distribution.as_input()
                ));
            } else {
                panel.push_notice("Build dispatch was rejected, see output");
            }
        }
        Event::SnapshotRefreshed | Event::RunsUpdated { .. } => {}
    }
}

/// Handle a keyboard event from the user.
///
/// Returns the operation to apply to the wizard, if any. `Op::Shutdown`
/// means the application should exit.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    panel: &mut PanelState,
    steps: &StepBoard,
) -> Option<Op> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Op::Shutdown),
        KeyCode::Up | KeyCode::Char('k') => {
            panel.selected = panel.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            panel.selected = (panel.selected + 1).min(WizardStep::ALL.len() - 1);
            None
        }
        KeyCode::Enter => {
            let step = panel.selected_step();
            if steps.is_enabled(step) {
                Some(Op::RunStep { step })
            } else {
                panel.push_notice(locked_reason(step, steps));
                None
            }
        }
        KeyCode::Char('r') => Some(Op::Refresh),
        KeyCode::Char('t') => Some(Op::DetectTools),
        KeyCode::Char('l') => Some(Op::FetchRuns),
        KeyCode::Char('c') => match steps.running() {
            Some(step) => {
                panel.push_notice(busy_reason(step));
                None
            }
            None => Some(Op::ClearOutput),
        },
        KeyCode::Char('p') => {
            panel.target = panel.target.next();
            None
        }
        KeyCode::Char('d') => {
            panel.distribution = panel.distribution.next();
            None
        }
        KeyCode::Char('b') => match steps.running() {
            Some(step) => {
                panel.push_notice(busy_reason(step));
                None
            }
            None => Some(Op::TriggerBuild {
                target: panel.target,
                distribution: panel.distribution,
            }),
        },
        _ => None,
    }
}

fn busy_reason(step: WizardStep) -> String {
    format!("{} is running, wait for it to finish", step.label())
}

fn locked_reason(step: WizardStep, steps: &StepBoard) -> String {
    match steps.status(step) {
        StepStatus::InProgress => format!("{} is already running", step.label()),
        StepStatus::Done => format!("{} is already done", step.label()),
        _ => match step.predecessor() {
            Some(prev) => format!("{} needs {} first", step.label(), prev.label()),
            None => format!("{} is not available", step.label()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csk_core::state::steps::{complete_step, start_step};
    use csk_protocol::ToolStatus;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_quit_keys() {
        let mut panel = PanelState::default();
        let steps = StepBoard::new();

        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let op = handle_keyboard_event(KeyEvent::from(code), &mut panel, &steps);
            assert!(matches!(op, Some(Op::Shutdown)));
        }
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut panel = PanelState::default();
        let steps = StepBoard::new();

        handle_keyboard_event(KeyEvent::from(KeyCode::Up), &mut panel, &steps);
        assert_eq!(panel.selected, 0);

        for _ in 0..10 {
            handle_keyboard_event(KeyEvent::from(KeyCode::Down), &mut panel, &steps);
        }
        assert_eq!(panel.selected_step(), WizardStep::Synchronize);

        handle_keyboard_event(KeyEvent::from(KeyCode::Char('k')), &mut panel, &steps);
        assert_eq!(panel.selected_step(), WizardStep::Provision);
    }

    #[test]
    fn test_enter_runs_only_enabled_steps() {
        let mut panel = PanelState::default();
        let mut steps = StepBoard::new();
        let (tx, _rx) = unbounded_channel();

        panel.selected = 1;
        let op = handle_keyboard_event(KeyEvent::from(KeyCode::Enter), &mut panel, &steps);
        assert!(op.is_none());
        assert_eq!(panel.latest_notice(), Some("Commit & push needs Generate CI files first"));

        complete_step(&mut steps, WizardStep::Generate, &tx);
        let op = handle_keyboard_event(KeyEvent::from(KeyCode::Enter), &mut panel, &steps);
        assert!(matches!(
            op,
            Some(Op::RunStep {
                step: WizardStep::Publish
            })
        ));
    }

    #[test]
    fn test_build_selection_cycles() {
        let mut panel = PanelState::default();
        let steps = StepBoard::new();

        handle_keyboard_event(KeyEvent::from(KeyCode::Char('p')), &mut panel, &steps);
        handle_keyboard_event(KeyEvent::from(KeyCode::Char('d')), &mut panel, &steps);
        let op = handle_keyboard_event(KeyEvent::from(KeyCode::Char('b')), &mut panel, &steps);

        assert!(matches!(
            op,
            Some(Op::TriggerBuild {
                target: BuildTarget::Both,
                distribution: Distribution::TestFlight,
            })
        ));
    }

    #[test]
    fn test_build_and_clear_wait_for_running_step() {
        let mut panel = PanelState::default();
        let mut steps = StepBoard::new();
        let (tx, _rx) = unbounded_channel();
        complete_step(&mut steps, WizardStep::Generate, &tx);
        start_step(&mut steps, WizardStep::Publish, &tx);

        for code in [KeyCode::Char('b'), KeyCode::Char('c')] {
            let op = handle_keyboard_event(KeyEvent::from(code), &mut panel, &steps);
            assert!(op.is_none());
            assert_eq!(
                panel.latest_notice(),
                Some("Commit & push is running, wait for it to finish")
            );
        }

        complete_step(&mut steps, WizardStep::Publish, &tx);
        let op = handle_keyboard_event(KeyEvent::from(KeyCode::Char('c')), &mut panel, &steps);
        assert!(matches!(op, Some(Op::ClearOutput)));
    }

    #[test]
    fn test_core_events_become_notices() {
        let mut panel = PanelState::default();

        handle_core_event(
            &mut panel,
            Event::StepStatusChanged {
                step: WizardStep::Publish,
                status: StepStatus::Failed,
            },
        );
        assert_eq!(
            panel.latest_notice(),
            Some("Commit & push failed, see output (Enter to retry)")
        );

        handle_core_event(
            &mut panel,
            Event::ToolDetected {
                tool: ToolStatus {
                    name: "node".to_string(),
                    found: true,
                    version: Some("v18.19.0".to_string()),
                    meets_minimum: false,
                    authenticated: None,
                },
            },
        );
        assert_eq!(panel.latest_notice(), Some("node v18.19.0 is too old"));

        handle_core_event(
            &mut panel,
            Event::ToolDetected {
                tool: ToolStatus {
                    name: "gh".to_string(),
                    found: true,
                    version: Some("gh version 2.49.0".to_string()),
                    meets_minimum: true,
                    authenticated: Some(false),
                },
            },
        );
        assert_eq!(
            panel.latest_notice(),
            Some("gh is not logged in (run gh auth login)")
        );

        handle_core_event(&mut panel, Event::SnapshotRefreshed);
        assert_eq!(panel.notices.len(), 3);
    }

    #[test]
    fn test_notices_are_capped() {
        let mut panel = PanelState::default();
        for i in 0..(MAX_NOTICES + 5) {
            panel.push_notice(format!("notice {i}"));
        }
        assert_eq!(panel.notices.len(), MAX_NOTICES);
        assert_eq!(panel.notices[0], "notice 5");
    }
}
