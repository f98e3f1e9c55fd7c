//! Recent remote workflow runs.

use csk_protocol::RunInfo;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

fn run_state(run: &RunInfo) -> (String, Style) {
    if !run.is_finished() {
        return (run.status.clone(), Style::default().fg(Color::Yellow));
    }
    match run.conclusion.as_deref() {
        Some("success") => ("success".to_string(), Style::default().fg(Color::Green)),
        Some(other) => (other.to_string(), Style::default().fg(Color::Red)),
        None => (run.status.clone(), Style::default()),
    }
}

pub fn render_runs(frame: &mut Frame, area: Rect, runs: &[RunInfo]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Recent builds (l to reload, b to build)");

    if runs.is_empty() {
        let paragraph = Paragraph::new("No runs found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = runs
        .iter()
        .map(|run| {
            let (state, style) = run_state(run);
            let created = run
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(run.id.to_string()),
                Cell::from(run.title.clone()),
                Cell::from(state).style(style),
                Cell::from(run.branch.clone()),
                Cell::from(created),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Run", "Title", "Result", "Branch", "Created"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            ),
        )
        .block(block);
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(runs: &[RunInfo]) -> String {
        let backend = TestBackend::new(90, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_runs(frame, area, runs);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_no_runs() {
        let content = render_to_string(&[]);
        assert!(content.contains("No runs found."));
    }

    #[test]
    fn test_render_runs() {
        let runs = vec![
            RunInfo {
                id: 42,
                title: "Build iOS".to_string(),
                status: "in_progress".to_string(),
                conclusion: None,
                branch: "main".to_string(),
                created_at: None,
            },
            RunInfo {
                id: 41,
                title: "Build Android".to_string(),
                status: "completed".to_string(),
                conclusion: Some("failure".to_string()),
                branch: "main".to_string(),
                created_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()),
            },
        ];

        let content = render_to_string(&runs);

        assert!(content.contains("Build iOS"));
        assert!(content.contains("in_progress"));
        assert!(content.contains("failure"));
        assert!(content.contains("2026-03-01 09:30"));
    }
}
