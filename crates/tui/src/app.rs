//! TUI application state and event loop.
//!
//! This module defines the main `App` struct. It owns the wizard and drives
//! it from the TUI tick, so every runner continuation executes on this
//! task between two draws.

use anyhow::Result;
use crossterm::event::KeyEvent;
use csk_core::workflow::{HostHooks, Wizard};
use csk_protocol::{Event, Op};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::StreamExt;

use crate::event_handler::{self, PanelState};
use crate::tui::{FrameRequester, Tui, TuiEvent, TICK_RATE};
use crate::widgets::{render_artifacts, render_output, render_runs, render_wizard, ProjectHeader};

const KEY_HELP: &str =
    "↑↓ select  Enter run  r refresh  p platform  d distribution  b build  c clear  q quit";

/// Wizard hooks that schedule a redraw.
struct RepaintHooks {
    frames: FrameRequester,
}

impl HostHooks for RepaintHooks {
    fn request_repaint(&mut self) {
        self.frames.schedule_frame();
    }
}

/// Main TUI application state.
pub struct App {
    pub wizard: Wizard,
    /// Channel to receive events from the wizard.
    pub event_rx: UnboundedReceiver<Event>,
    pub panel: PanelState,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    pub fn new(wizard: Wizard, event_rx: UnboundedReceiver<Event>) -> Self {
        Self {
            wizard,
            event_rx,
            panel: PanelState::default(),
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle wizard events and terminal input
    /// concurrently.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let frames = tui.frame_requester();
        self.wizard.set_hooks(RepaintHooks {
            frames: frames.clone(),
        });
        self.wizard.activate();

        let mut tui_events = tui.event_stream(TICK_RATE);
        frames.schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    event_handler::handle_core_event(&mut self.panel, event);
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    self.handle_tui_event(tui, &frames, tui_event)?;
                }
            }
        }

        tracing::info!("leaving the wizard");
        Ok(())
    }

    fn handle_tui_event(
        &mut self,
        tui: &mut Tui,
        frames: &FrameRequester,
        event: TuiEvent,
    ) -> Result<()> {
        match event {
            TuiEvent::Key(key_event) => {
                self.handle_key_event(key_event);
                frames.schedule_frame();
            }
            TuiEvent::Tick => {
                if self.wizard.tick() {
                    frames.schedule_frame();
                }
            }
            TuiEvent::Draw => {
                tui.draw(|frame| {
                    self.render(frame);
                })?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match event_handler::handle_keyboard_event(
            key_event,
            &mut self.panel,
            self.wizard.steps(),
        ) {
            Some(Op::Shutdown) => self.should_exit = true,
            Some(op) => self.wizard.apply(op),
            None => {}
        }
    }

    /// Render the TUI.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(18),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(columns[0]);

        render_wizard(frame, left[0], self.wizard.steps(), self.panel.selected);

        let foreground = self.wizard.foreground();
        render_output(
            frame,
            left[1],
            &foreground.combined_output(),
            foreground.current_command(),
        );

        let game_name = self.wizard.game_name();
        let project_id = self.wizard.project_id();
        render_artifacts(
            frame,
            columns[1],
            ProjectHeader {
                game_name: &game_name,
                project_id: &project_id,
            },
            self.wizard.snapshot(),
            self.wizard.tools(),
            self.wizard.secrets_checklist(),
        );

        render_runs(frame, rows[1], self.wizard.runs());
        self.render_status_bar(frame, rows[2]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let build = format!(
            "[{} / {}] ",
            self.panel.target.as_input(),
            self.panel.distribution.as_input()
        );
        let line = match self.panel.latest_notice() {
            Some(notice) => Line::from(vec![
                Span::styled(build, Style::default().fg(Color::Cyan)),
                Span::styled(notice.to_string(), Style::default().fg(Color::Yellow)),
            ]),
            None => Line::from(vec![
                Span::styled(build, Style::default().fg(Color::Cyan)),
                Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray)),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
