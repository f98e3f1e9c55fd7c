//! Bash scripts for the Publish and Provision steps.
//!
//! Each step runs as a single process, so the multi-command logic (staging
//! and pushing, polling and watching a remote run) is rendered into a script
//! under `.ci-setup/` and handed to bash.

use crate::state::record::{StateError, StateResult, STATE_DIR};
use csk_protocol::{ArtifactKind, GlobalConfig};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const PUBLISH_SCRIPT: &str = "publish.sh";
pub const PROVISION_SCRIPT: &str = "provision.sh";

/// Inputs of the remote provisioning workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionInputs {
    pub project_id: String,
    pub game_name: String,
    pub ios_bundle_id: String,
    pub android_bundle_id: String,
    pub service_account: String,
}

/// Single-quote `value` for bash.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Stage the generated files, commit them if anything changed, and push.
pub fn publish_script(git: &str, game_name: &str) -> String {
    let paths: Vec<String> = ArtifactKind::GENERATED
        .iter()
        .map(|kind| shell_quote(kind.relative_path()))
        .collect();
    let message = shell_quote(&format!("Add CI/CD setup for {game_name}"));

    let mut script = String::from("#!/usr/bin/env bash\nset -e\n\n");
    let _ = writeln!(script, "GIT={}", shell_quote(git));
    let _ = writeln!(script, "\"$GIT\" add -- {}", paths.join(" "));
    let _ = writeln!(script, "if \"$GIT\" diff --cached --quiet; then");
    let _ = writeln!(script, "  echo \"nothing new to commit\"");
    let _ = writeln!(script, "else");
    let _ = writeln!(script, "  \"$GIT\" commit -m {message}");
    let _ = writeln!(script, "fi");
    let _ = writeln!(script, "\"$GIT\" push -u origin HEAD");
    script
}

/// Wait for the provisioning workflow to exist on the remote, dispatch it,
/// watch the new run and print its status and conclusion.
pub fn provision_script(config: &GlobalConfig, inputs: &ProvisionInputs) -> String {
    let attempts = config.poll_attempts;
    let interval = config.poll_interval_secs;

    let mut script = String::from("#!/usr/bin/env bash\nset -u\n\n");
    let _ = writeln!(script, "GH={}", shell_quote(&config.tools.gh));
    let _ = writeln!(
        script,
        "WORKFLOW={}",
        shell_quote(&config.provision_workflow)
    );
    script.push('\n');

    let _ = writeln!(script, "attempt=1");
    let _ = writeln!(
        script,
        "until \"$GH\" workflow view \"$WORKFLOW\" >/dev/null 2>&1; do"
    );
    let _ = writeln!(script, "  if [ \"$attempt\" -ge {attempts} ]; then");
    let _ = writeln!(
        script,
        "    echo \"workflow $WORKFLOW not found on the remote after {attempts} attempts\" >&2"
    );
    let _ = writeln!(script, "    exit 1");
    let _ = writeln!(script, "  fi");
    let _ = writeln!(
        script,
        "  echo \"waiting for $WORKFLOW on the remote (attempt $attempt/{attempts})\""
    );
    let _ = writeln!(script, "  attempt=$((attempt + 1))");
    let _ = writeln!(script, "  sleep {interval}");
    let _ = writeln!(script, "done");
    script.push('\n');

    let fields = [
        ("project_id", &inputs.project_id),
        ("game_name", &inputs.game_name),
        ("ios_bundle_id", &inputs.ios_bundle_id),
        ("android_bundle_id", &inputs.android_bundle_id),
        ("service_account", &inputs.service_account),
    ];
    let _ = write!(script, "\"$GH\" workflow run \"$WORKFLOW\"");
    for (name, value) in fields {
        let _ = write!(script, " -f {}", shell_quote(&format!("{name}={value}")));
    }
    let _ = writeln!(script, " || exit 1");
    let _ = writeln!(script, "sleep {}", config.dispatch_settle_secs);
    script.push('\n');

    let _ = writeln!(
        script,
        "run_id=$(\"$GH\" run list --workflow \"$WORKFLOW\" --limit 1 --json databaseId --jq '.[0].databaseId')"
    );
    let _ = writeln!(script, "if [ -z \"$run_id\" ]; then");
    let _ = writeln!(
        script,
        "  echo \"no run of $WORKFLOW found after dispatch\" >&2"
    );
    let _ = writeln!(script, "  exit 1");
    let _ = writeln!(script, "fi");
    let _ = writeln!(script, "echo \"watching run $run_id\"");
    let _ = writeln!(script, "\"$GH\" run watch \"$run_id\" || true");
    script.push('\n');

    let _ = writeln!(
        script,
        "status=$(\"$GH\" run view \"$run_id\" --json status --jq '.status')"
    );
    let _ = writeln!(
        script,
        "conclusion=$(\"$GH\" run view \"$run_id\" --json conclusion --jq '.conclusion')"
    );
    let _ = writeln!(script, "echo \"status: $status conclusion: $conclusion\"");
    let _ = writeln!(script, "if [ \"$conclusion\" != \"success\" ]; then");
    let _ = writeln!(
        script,
        "  echo \"provisioning failed (conclusion: ${{conclusion:-unknown}})\" >&2"
    );
    let _ = writeln!(script, "  exit 1");
    let _ = writeln!(script, "fi");
    script
}

/// Write a script into the state directory and return its path relative to
/// `root`, with `/` separators so bash accepts it on every platform.
pub fn write_script(root: &Path, name: &str, content: &str) -> StateResult<String> {
    let dir = root.join(STATE_DIR);
    fs::create_dir_all(&dir).map_err(|source| StateError::DirectoryCreate {
        path: dir.clone(),
        source,
    })?;
    let path = dir.join(name);
    fs::write(&path, content).map_err(|source| StateError::FileWrite { path, source })?;
    Ok(format!("{STATE_DIR}/{name}"))
}
