//! Non-interactive commands.
//!
//! A [`Session`] drives the same wizard as the panel, ticking it on a timer
//! until both runners are idle and echoing foreground output as it grows.

use color_eyre::eyre::{bail, eyre, Result};
use colored::Colorize;
use csk_core::workflow::Wizard;
use csk_protocol::{
    ArtifactKind, BuildTarget, Distribution, Event, StepStatus, ToolStatus, WizardStep,
};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

const TICK: Duration = Duration::from_millis(50);

pub struct Session {
    wizard: Wizard,
    events: UnboundedReceiver<Event>,
    printed: usize,
}

impl Session {
    pub fn open(project: &Path) -> Result<Self> {
        let (tx, events) = unbounded_channel();
        let mut wizard = Wizard::open(project, tx).map_err(|e| eyre!(e))?;
        wizard.refresh();
        Ok(Self {
            wizard,
            events,
            printed: 0,
        })
    }

    /// Tick until nothing is running or queued.
    async fn drive(&mut self) {
        loop {
            self.wizard.tick();
            self.echo_stdout();
            if !self.wizard.is_busy() {
                break;
            }
            tokio::time::sleep(TICK).await;
        }
    }

    fn echo_stdout(&mut self) {
        let stdout = self.wizard.foreground().stdout();
        // Output was cleared between chained requests.
        if stdout.len() < self.printed {
            self.printed = 0;
        }
        if stdout.len() > self.printed {
            print!("{}", &stdout[self.printed..]);
            self.printed = stdout.len();
        }
    }

    fn echo_stderr(&self) {
        let stderr = self.wizard.foreground().stderr();
        if !stderr.is_empty() {
            eprint!("{}", stderr.red());
        }
    }

    pub fn print_status(&self) {
        let wizard = &self.wizard;
        let snapshot = wizard.snapshot();
        println!(
            "{} {}  project: {}  branch: {}",
            "Game:".bold(),
            wizard.game_name(),
            wizard.project_id(),
            snapshot.branch().unwrap_or("(no branch)")
        );
        println!();
        for kind in ArtifactKind::ALL {
            let state = if snapshot.is_present(kind) {
                "Present".green()
            } else {
                "Missing".dimmed()
            };
            println!(
                "  {:<24} {:<8} {}",
                kind.label(),
                state,
                snapshot.detail(kind).unwrap_or("")
            );
        }
        println!();
        for (step, status) in wizard.steps().iter() {
            println!("  {}. {:<22} {}", step.index() + 1, step.label(), colored_status(status));
        }

        if let Some(groups) = wizard.secrets_checklist() {
            println!();
            println!("{}", "Set these GitHub secrets (repository or organization):".bold());
            for group in groups {
                println!("  {:<26} {}", group.purpose, group.names.join(", "));
            }
        }
    }

    pub async fn run_step(&mut self, step: WizardStep) -> Result<()> {
        let steps = self.wizard.steps();
        if !steps.is_enabled(step) {
            match step.predecessor() {
                Some(prev) if steps.status(prev) != StepStatus::Done => {
                    bail!("{} needs {} first", step.label(), prev.label())
                }
                _ => {
                    println!("{} is already done", step.label());
                    return Ok(());
                }
            }
        }

        self.wizard.run_step(step);
        self.drive().await;
        self.echo_stderr();

        let status = self.wizard.steps().status(step);
        println!("{} {}", step.label().bold(), colored_status(status));
        match status {
            StepStatus::Failed => Err(eyre!("{} failed", step.label())),
            _ => Ok(()),
        }
    }

    pub async fn runs(&mut self, json: bool) -> Result<()> {
        self.wizard.fetch_runs();
        self.drive().await;

        let runs = self.wizard.runs();
        if json {
            println!("{}", serde_json::to_string_pretty(runs)?);
            return Ok(());
        }
        if runs.is_empty() {
            println!("No runs found.");
        }
        for run in runs {
            let result = match (run.is_finished(), run.conclusion.as_deref()) {
                (true, Some("success")) => "success".green(),
                (true, Some(other)) => other.red(),
                _ => run.status.as_str().yellow(),
            };
            let created = run
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!(
                "{:>12}  {:<30} {:<12} {:<14} {}",
                run.id, run.title, result, run.branch, created
            );
        }
        Ok(())
    }

    pub async fn doctor(&mut self, json: bool) -> Result<()> {
        self.wizard.detect_tools();
        self.drive().await;

        let tools = self.wizard.tools();
        if json {
            println!("{}", serde_json::to_string_pretty(tools)?);
        } else {
            for tool in tools {
                println!("  {}", tool_line(tool));
            }
        }

        let missing: Vec<&str> = tools
            .iter()
            .filter(|tool| {
                !tool.found || !tool.meets_minimum || tool.authenticated == Some(false)
            })
            .map(|tool| tool.name.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(eyre!("missing, outdated or logged out: {}", missing.join(", ")))
        }
    }

    pub async fn build(&mut self, target: BuildTarget, distribution: Distribution) -> Result<()> {
        self.wizard.trigger_build(target, distribution);
        self.drive().await;
        self.echo_stderr();

        let mut accepted = false;
        while let Ok(event) = self.events.try_recv() {
            if let Event::BuildDispatched { accepted: a, .. } = event {
                accepted = a;
            }
        }
        if !accepted {
            bail!("build dispatch was rejected");
        }

        println!(
            "Build dispatched: {} / {}",
            target.as_input(),
            distribution.as_input()
        );
        if let Some(run) = self.wizard.runs().first() {
            println!("Latest run: {} {} ({})", run.id, run.title, run.status);
        }
        Ok(())
    }
}

fn colored_status(status: StepStatus) -> colored::ColoredString {
    match status {
        StepStatus::Pending => "Pending".yellow(),
        StepStatus::InProgress => "Running".green(),
        StepStatus::Done => "Done".cyan(),
        StepStatus::Failed => "Failed".red(),
    }
}

fn tool_line(tool: &ToolStatus) -> String {
    if let (Some(version), true, Some(false)) = (&tool.version, tool.found, tool.authenticated) {
        return format!(
            "{} {} {} is not logged in (run {} auth login)",
            "!!".yellow(),
            tool.name,
            version,
            tool.name
        );
    }
    match (&tool.version, tool.found, tool.meets_minimum) {
        (Some(version), true, true) => format!("{} {} {}", "ok".green(), tool.name, version),
        (Some(version), true, false) => {
            format!("{} {} {} is too old", "!!".yellow(), tool.name, version)
        }
        _ => format!("{} {} not found", "--".red(), tool.name),
    }
}
