//! The setup wizard.
//!
//! [`Wizard`] owns the two process runners, the status snapshot and the
//! step board. UI actions arrive as [`Op`]s; each step handler marks its
//! step InProgress, issues chained runner requests, and settles the step in
//! the continuation of the last one. Every change is reported as an
//! [`Event`] on the channel given to [`Wizard::open`].
//!
//! The host drives the wizard by calling [`Wizard::tick`] once per event
//! loop iteration.

pub mod decision;
pub mod identity;
pub mod remote;
pub mod scripts;
pub mod secrets;
mod steps;
pub mod tools;

use crate::config::load_config;
use crate::runner::{self, ProcessRunner, RunnerHost, ToolEnvironment};
use crate::snapshot::{ComponentSnapshot, StatusCollector};
use crate::state::steps::{rederive_from_snapshot, StepBoard};
use anyhow::{Context, Result};
use csk_protocol::{Channel, Event, GlobalConfig, Op, RunInfo, ToolStatus};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

/// Callbacks into the application embedding the wizard.
pub trait HostHooks {
    /// Re-scan project assets after files changed underneath the host.
    fn refresh_assets(&mut self) {}

    /// Ask for the panel to be redrawn.
    fn request_repaint(&mut self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default)]
pub struct NoHooks;

impl HostHooks for NoHooks {}

pub struct Wizard {
    root: PathBuf,
    config: GlobalConfig,
    foreground: ProcessRunner<Wizard>,
    background: ProcessRunner<Wizard>,
    collector: StatusCollector,
    steps: StepBoard,
    runs: Vec<RunInfo>,
    tools: Vec<ToolStatus>,
    events_tx: UnboundedSender<Event>,
    hooks: Box<dyn HostHooks>,
}

impl RunnerHost for Wizard {
    fn runner(&mut self, channel: Channel) -> &mut ProcessRunner<Wizard> {
        match channel {
            Channel::Foreground => &mut self.foreground,
            Channel::Background => &mut self.background,
        }
    }
}

impl Wizard {
    /// Open the wizard for the Unity project at `root`.
    ///
    /// Loads `.ci-setup/config.toml`; nothing is read from the project tree
    /// until [`activate`](Self::activate) or [`refresh`](Self::refresh).
    pub fn open(root: &Path, events_tx: UnboundedSender<Event>) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("project directory {} is not accessible", root.display()))?;
        let config = load_config(&root).context("failed to load .ci-setup/config.toml")?;
        Ok(Self::with_config(root, config, events_tx))
    }

    /// Build a wizard from an already loaded configuration.
    pub fn with_config(
        root: PathBuf,
        config: GlobalConfig,
        events_tx: UnboundedSender<Event>,
    ) -> Self {
        let env = ToolEnvironment::detect();
        Self {
            foreground: ProcessRunner::new(Channel::Foreground, env.clone()),
            background: ProcessRunner::new(Channel::Background, env),
            collector: StatusCollector::new(root.clone()),
            root,
            config,
            steps: StepBoard::new(),
            runs: Vec::new(),
            tools: Vec::new(),
            events_tx,
            hooks: Box::new(NoHooks),
        }
    }

    pub fn set_hooks(&mut self, hooks: impl HostHooks + 'static) {
        self.hooks = Box::new(hooks);
    }

    /// Panel opened: snapshot the project, then start tool detection and a
    /// run-list fetch in the background.
    pub fn activate(&mut self) {
        tracing::info!(root = %self.root.display(), "wizard activated");
        self.refresh();
        self.detect_tools();
        self.fetch_runs();
    }

    /// Re-read the project and re-derive every step not in progress.
    pub fn refresh(&mut self) {
        self.collector.refresh();
        rederive_from_snapshot(&mut self.steps, self.collector.snapshot(), &self.events_tx);
        let _ = self.events_tx.send(Event::SnapshotRefreshed);
        self.hooks.request_repaint();
    }

    /// Handle one UI action.
    pub fn apply(&mut self, op: Op) {
        tracing::debug!(?op, "applying op");
        match op {
            Op::RunStep { step } => self.run_step(step),
            Op::Refresh => self.refresh(),
            Op::DetectTools => self.detect_tools(),
            Op::FetchRuns => self.fetch_runs(),
            Op::TriggerBuild {
                target,
                distribution,
            } => {
                self.trigger_build(target, distribution);
            }
            Op::ClearOutput => {
                self.clear_output();
            }
            // Leaving the loop is up to the host.
            Op::Shutdown => {}
        }
    }

    /// Empty the foreground output unless a step still needs it to decide
    /// its outcome. Returns whether the output was cleared.
    pub fn clear_output(&mut self) -> bool {
        if let Some(step) = self.steps.running() {
            tracing::debug!(step = step.label(), "keeping output of the running step");
            return false;
        }
        self.foreground.clear_output();
        true
    }

    /// Poll both runners once. Returns true when a repaint is due.
    pub fn tick(&mut self) -> bool {
        let foreground = runner::tick(self, Channel::Foreground);
        let background = runner::tick(self, Channel::Background);
        foreground || background
    }

    /// Any process running or queued on either channel.
    pub fn is_busy(&self) -> bool {
        self.foreground.is_busy() || self.background.is_busy()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn steps(&self) -> &StepBoard {
        &self.steps
    }

    pub fn snapshot(&self) -> &ComponentSnapshot {
        self.collector.snapshot()
    }

    pub fn foreground(&self) -> &ProcessRunner<Wizard> {
        &self.foreground
    }

    pub fn background(&self) -> &ProcessRunner<Wizard> {
        &self.background
    }

    /// Most recent remote runs, newest first.
    pub fn runs(&self) -> &[RunInfo] {
        &self.runs
    }

    pub fn tools(&self) -> &[ToolStatus] {
        &self.tools
    }

    pub fn game_name(&self) -> String {
        identity::game_name(&self.config, self.collector.snapshot(), &self.root)
    }

    pub fn project_id(&self) -> String {
        identity::project_id(&self.config.project_prefix, &self.game_name())
    }
}
