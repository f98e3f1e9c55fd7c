//! Foreground process output with a scrollbar.
//!
//! The view always follows the tail so the latest lines of a running step
//! stay visible.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Renders `output` under a title naming the running command, if any.
pub fn render_output(frame: &mut Frame, area: Rect, output: &str, command: Option<&str>) {
    let title = match command {
        Some(command) => format!("Output - {command}"),
        None => "Output".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let lines: Vec<Line> = if output.is_empty() {
        vec![Line::from(Span::styled(
            "No output yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        output.lines().map(styled_line).collect()
    };

    let total_lines = lines.len();
    let visible_lines = area.height.saturating_sub(2) as usize;
    let scroll_offset = total_lines.saturating_sub(visible_lines);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);

    if total_lines > visible_lines {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .viewport_content_length(visible_lines)
            .position(scroll_offset);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn styled_line(line: &str) -> Line<'_> {
    let style = if line.starts_with("$ ") {
        Style::default().fg(Color::Cyan)
    } else if line.starts_with("error") || line.starts_with("fatal:") {
        Style::default().fg(Color::Red)
    } else if line.starts_with("warning") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(Span::styled(line, style))
}
