//! Remote workflow runs: listing recent runs and dispatching builds.

use super::Wizard;
use crate::runner::{run, ProcessRequest};
use csk_protocol::{BuildTarget, Channel, Distribution, Event, RunInfo, RUN_HISTORY_LEN};

/// JSON fields requested from `gh run list`.
const RUN_FIELDS: &str = "databaseId,displayTitle,status,conclusion,headBranch,createdAt";

pub fn run_list_arguments() -> String {
    format!("run list --limit {RUN_HISTORY_LEN} --json {RUN_FIELDS}")
}

pub fn build_dispatch_arguments(
    workflow: &str,
    target: BuildTarget,
    distribution: Distribution,
) -> String {
    format!(
        "workflow run {workflow} -f buildTarget={} -f distribution={}",
        target.as_input(),
        distribution.as_input()
    )
}

/// Parse the output of `gh run list --json`.
///
/// The text may carry other lines (the runner's echo line, warnings), so
/// each top-level `{...}` object is cut out and deserialized on its own.
/// Objects that do not deserialize are skipped. The result is newest first
/// and holds at most [`RUN_HISTORY_LEN`] runs.
pub fn parse_run_list(output: &str) -> Vec<RunInfo> {
    let mut runs: Vec<RunInfo> = json_objects(output)
        .into_iter()
        .filter_map(|object| match serde_json::from_str::<RunInfo>(object) {
            Ok(run) => Some(run),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparsable run entry");
                None
            }
        })
        .collect();
    runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    runs.truncate(RUN_HISTORY_LEN);
    runs
}

impl Wizard {
    /// List the latest runs on the background channel.
    pub fn fetch_runs(&mut self) {
        let request = ProcessRequest::new(
            self.config.tools.gh.clone(),
            run_list_arguments(),
            self.root.clone(),
            |wizard: &mut Wizard| {
                let runs = parse_run_list(wizard.background.stdout());
                wizard.background.clear_output();
                tracing::debug!(count = runs.len(), "run list updated");
                wizard.runs = runs.clone();
                let _ = wizard.events_tx.send(Event::RunsUpdated { runs });
            },
        );
        run(self, Channel::Background, request);
    }

    /// Dispatch the build workflow, then refresh the run list.
    ///
    /// Refused while a step is in progress: the step's outcome is decided
    /// from the foreground output, which the dispatch would clear and mix
    /// into. Returns whether the dispatch was issued.
    pub fn trigger_build(&mut self, target: BuildTarget, distribution: Distribution) -> bool {
        if let Some(step) = self.steps.running() {
            tracing::warn!(step = step.label(), "build dispatch refused while a step is running");
            return false;
        }
        if !self.foreground.is_busy() {
            self.foreground.clear_output();
        }
        let arguments =
            build_dispatch_arguments(&self.config.build_workflow, target, distribution);
        let request = ProcessRequest::new(
            self.config.tools.gh.clone(),
            arguments,
            self.root.clone(),
            move |wizard: &mut Wizard| {
                let accepted = wizard.foreground.last_exit_code() == Some(0);
                tracing::info!(
                    build_target = target.as_input(),
                    distribution = distribution.as_input(),
                    accepted,
                    "build dispatch finished"
                );
                let _ = wizard.events_tx.send(Event::BuildDispatched {
                    target,
                    distribution,
                    accepted,
                });
                wizard.fetch_runs();
            },
        );
        run(self, Channel::Foreground, request);
        true
    }
}

/// Top-level balanced `{...}` spans, honoring JSON string quoting.
fn json_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    objects.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    objects
}
