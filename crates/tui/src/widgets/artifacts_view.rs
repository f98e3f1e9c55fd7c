//! Project summary: identity, artifact presence, detected tools and, once
//! the backend exists, the GitHub secrets still to set.

use csk_core::snapshot::ComponentSnapshot;
use csk_core::workflow::secrets::SecretGroup;
use csk_protocol::{ArtifactKind, ToolStatus};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

/// Names shown in the header above the artifact table.
#[derive(Debug, Clone, Copy)]
pub struct ProjectHeader<'a> {
    pub game_name: &'a str,
    pub project_id: &'a str,
}

pub fn render_artifacts(
    frame: &mut Frame,
    area: Rect,
    header: ProjectHeader<'_>,
    snapshot: &ComponentSnapshot,
    tools: &[ToolStatus],
    secrets: Option<&[SecretGroup]>,
) {
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let secrets_height = secrets.map_or(0, |groups| {
        let rows: usize = groups
            .iter()
            .map(|group| secret_line_len(group).div_ceil(inner_width))
            .sum();
        rows as u16 + 2
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(ArtifactKind::ALL.len() as u16 + 3),
            Constraint::Length(3),
            Constraint::Length(secrets_height),
        ])
        .split(area);

    let branch = snapshot.branch().unwrap_or("(no branch)");
    let title_line = Line::from(vec![
        Span::styled(
            header.game_name.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  project: {}  branch: {branch}", header.project_id)),
    ]);
    frame.render_widget(
        Paragraph::new(title_line).block(Block::default().borders(Borders::ALL).title("Project")),
        chunks[0],
    );

    let rows: Vec<Row> = ArtifactKind::ALL
        .iter()
        .map(|&kind| {
            let (state, style) = if snapshot.is_present(kind) {
                ("Present", Style::default().fg(Color::Green))
            } else {
                ("Missing", Style::default().fg(Color::DarkGray))
            };
            Row::new(vec![
                Cell::from(kind.label()),
                Cell::from(state).style(style),
                Cell::from(snapshot.detail(kind).unwrap_or("").to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Length(8),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Artifact", "State", "Detail"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            ),
        )
        .block(Block::default().borders(Borders::ALL).title("Artifacts"));
    frame.render_widget(table, chunks[1]);

    frame.render_widget(
        Paragraph::new(tools_line(tools))
            .block(Block::default().borders(Borders::ALL).title("Tools (t to re-check)")),
        chunks[2],
    );

    if let Some(groups) = secrets {
        let lines: Vec<Line> = groups
            .iter()
            .map(|group| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", group.purpose),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(group.names.join(", ")),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("GitHub secrets to set"),
            ),
            chunks[3],
        );
    }
}

fn secret_line_len(group: &SecretGroup) -> usize {
    group.purpose.len() + 2 + group.names.join(", ").len()
}

fn tools_line(tools: &[ToolStatus]) -> Line<'static> {
    if tools.is_empty() {
        return Line::from(Span::styled(
            "checking...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut spans = Vec::new();
    for tool in tools {
        let logged_out = tool.authenticated == Some(false);
        let style = match (tool.found, tool.meets_minimum && !logged_out) {
            (true, true) => Style::default().fg(Color::Green),
            (true, false) => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::Red),
        };
        let text = match &tool.version {
            Some(version) if tool.found && logged_out => {
                format!("{} {version} (not logged in)", tool.name)
            }
            Some(version) if tool.found => format!("{} {version}", tool.name),
            _ => format!("{} missing", tool.name),
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}
