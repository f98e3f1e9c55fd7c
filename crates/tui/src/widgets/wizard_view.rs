//! Step list of the setup wizard.
//!
//! Shows every step with its status, color-coded, and marks steps that
//! cannot be started yet.

use csk_core::state::steps::StepBoard;
use csk_protocol::{StepStatus, WizardStep};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

fn status_style(status: StepStatus) -> Style {
    match status {
        StepStatus::Pending => Style::default().fg(Color::Yellow),
        StepStatus::InProgress => Style::default().fg(Color::Green),
        StepStatus::Done => Style::default().fg(Color::Cyan),
        StepStatus::Failed => Style::default().fg(Color::Red),
    }
}

fn status_text(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "Pending",
        StepStatus::InProgress => "Running",
        StepStatus::Done => "Done",
        StepStatus::Failed => "Failed",
    }
}

/// Renders the steps as a table with the selected one highlighted.
pub fn render_wizard(frame: &mut Frame, area: Rect, steps: &StepBoard, selected: usize) {
    let rows: Vec<Row> = steps
        .iter()
        .map(|(step, status)| {
            let label_style = if steps.is_enabled(step) || status != StepStatus::Pending {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(format!("{}", step.index() + 1)),
                Cell::from(step.label()).style(label_style),
                Cell::from(status_text(status)).style(status_style(status)),
            ])
        })
        .collect();

    let header = Row::new(vec![Cell::from("#"), Cell::from("Step"), Cell::from("Status")]).style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Length(2),
        Constraint::Min(22),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Setup (Enter to run)"),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    table_state.select(Some(selected.min(WizardStep::ALL.len() - 1)));

    frame.render_stateful_widget(table, area, &mut table_state);
}
