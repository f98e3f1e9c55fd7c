//! External tool detection on the background channel.

use super::Wizard;
use crate::runner::{run, ProcessRequest};
use csk_protocol::{Channel, Event, ToolStatus};
use once_cell::sync::Lazy;
use regex::Regex;

/// Oldest Node.js major version the Firebase CLI runs on.
pub const MIN_NODE_MAJOR: u32 = 20;

static NODE_MAJOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"v?(\d+)\.").expect("valid node version regex"));

/// First line a `--version` check printed, skipping the runner's echo line.
pub fn version_line(stdout: &str, stderr: &str) -> Option<String> {
    let first = |text: &str| {
        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("$ "))
            .map(str::to_string)
    };
    first(stdout).or_else(|| first(stderr))
}

/// Major version from `node --version` output such as `v20.11.1`.
pub fn node_major(version: &str) -> Option<u32> {
    NODE_MAJOR
        .captures(version)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Turn a finished version check into a status.
pub fn version_status(
    name: &str,
    exit_code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> ToolStatus {
    let version = if exit_code == Some(0) {
        version_line(stdout, stderr)
    } else {
        None
    };
    let found = version.is_some();
    let meets_minimum = match (name, version.as_deref()) {
        (_, None) => false,
        ("node", Some(v)) => node_major(v).is_some_and(|major| major >= MIN_NODE_MAJOR),
        _ => true,
    };
    ToolStatus {
        name: name.to_string(),
        found,
        version,
        meets_minimum,
        authenticated: None,
    }
}

/// Record the result of `gh auth status` on the detected `gh` entry.
///
/// Returns the updated entry, or `None` when `gh` itself was not found and
/// the login state means nothing.
pub fn record_auth(tools: &mut [ToolStatus], exit_code: Option<i32>) -> Option<ToolStatus> {
    let gh = tools.iter_mut().find(|tool| tool.name == "gh" && tool.found)?;
    gh.authenticated = Some(exit_code == Some(0));
    Some(gh.clone())
}

impl Wizard {
    /// Queue a `--version` check for every external tool, then check that
    /// `gh` is logged in.
    pub fn detect_tools(&mut self) {
        let tools = &self.config.tools;
        let checks = [
            ("git", tools.git.clone()),
            ("gh", tools.gh.clone()),
            ("firebase", tools.firebase.clone()),
            ("gcloud", tools.gcloud.clone()),
            ("node", tools.node.clone()),
        ];
        for (name, executable) in checks {
            let request = ProcessRequest::new(
                executable,
                "--version",
                self.root.clone(),
                move |wizard: &mut Wizard| wizard.finish_version_check(name),
            );
            run(self, Channel::Background, request);
        }

        let request = ProcessRequest::new(
            self.config.tools.gh.clone(),
            "auth status",
            self.root.clone(),
            |wizard: &mut Wizard| wizard.finish_auth_check(),
        );
        run(self, Channel::Background, request);
    }

    fn finish_auth_check(&mut self) {
        let exit_code = self.background.last_exit_code();
        self.background.clear_output();

        let Some(gh) = record_auth(&mut self.tools, exit_code) else {
            return;
        };
        if gh.authenticated == Some(false) {
            tracing::warn!("gh is not logged in");
        }
        let _ = self.events_tx.send(Event::ToolDetected { tool: gh });
    }

    fn finish_version_check(&mut self, name: &str) {
        let runner = &mut self.background;
        let status = version_status(
            name,
            runner.last_exit_code(),
            runner.stdout(),
            runner.stderr(),
        );
        runner.clear_output();

        if !status.found {
            tracing::warn!(tool = name, "tool not found");
        } else if !status.meets_minimum {
            tracing::warn!(tool = name, version = ?status.version, "tool is too old");
        } else {
            tracing::debug!(tool = name, version = ?status.version, "tool detected");
        }

        match self.tools.iter_mut().find(|t| t.name == status.name) {
            Some(existing) => *existing = status.clone(),
            None => self.tools.push(status.clone()),
        }
        let _ = self.events_tx.send(Event::ToolDetected { tool: status });
    }
}
