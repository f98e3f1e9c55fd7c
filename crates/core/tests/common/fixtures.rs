//! Test fixtures: a temporary Unity project wired to fake CLIs.
//!
//! The fake `git` and `gh` scripts log every invocation under `.fake/` and
//! change behavior when marker files exist there:
//! - `.fake/push-rejected`: `git push` is rejected
//! - `.fake/push-slow`: a rejected `git push` lingers for a second after
//!   reporting the rejection
//! - `.fake/add-fails`: `git add` fails with a pathspec error
//! - `.fake/remote/*`: copied into `Assets/Settings/` by `git pull`
//! - `.fake/workflow-missing`: `gh workflow view` never finds the workflow
//! - `.fake/conclusion`: conclusion reported by `gh run view` (default `success`)
//! - `.fake/runs.json`: output of `gh run list`
//! - `.fake/logged-out`: `gh auth status` reports no login

#![allow(dead_code)]

use csk_core::workflow::Wizard;
use csk_protocol::Event;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

const PROJECT_SETTINGS: &str = "PlayerSettings:
  companyName: Acme
  productName: Space Goats
  applicationIdentifier:
    Android: com.acme.spacegoats
    iPhone: com.acme.spacegoats
";

const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> .fake/git.log
case "$1" in
  add)
    if [ -f .fake/add-fails ]; then
      echo "fatal: pathspec 'Gemfile.lock' did not match any files" >&2
      exit 128
    fi
    ;;
  diff)
    exit 1
    ;;
  commit)
    echo "[main 1a2b3c4] $3"
    ;;
  push)
    if [ -f .fake/push-rejected ]; then
      echo "To github.com:acme/space-goats.git" >&2
      echo " ! [rejected]        main -> main (fetch first)" >&2
      echo "error: failed to push some refs to 'github.com:acme/space-goats.git'" >&2
      if [ -f .fake/push-slow ]; then
        sleep 1
      fi
      exit 1
    fi
    echo "To github.com:acme/space-goats.git" >&2
    echo "   1a2b3c4..5d6e7f8  main -> main" >&2
    ;;
  pull)
    if [ -d .fake/remote ]; then
      mkdir -p Assets/Settings
      cp .fake/remote/* Assets/Settings/
    fi
    echo "Already up to date."
    ;;
  --version)
    echo "git version 2.44.0"
    ;;
esac
exit 0
"#;

const FAKE_GH: &str = r#"#!/bin/sh
echo "gh $*" >> .fake/gh.log
case "$1 $2" in
  "auth status")
    if [ -f .fake/logged-out ]; then
      echo "You are not logged into any GitHub hosts. To log in, run: gh auth login" >&2
      exit 1
    fi
    echo "github.com" >&2
    echo "  - Logged in to github.com account acme (keyring)" >&2
    ;;
  "workflow view")
    if [ -f .fake/workflow-missing ]; then
      echo "could not find any workflows named firebase-setup.yml" >&2
      exit 1
    fi
    ;;
  "workflow run")
    echo "Created workflow_dispatch event for $3 at main"
    ;;
  "run list")
    case "$*" in
      *--jq*) echo 4242 ;;
      *) cat .fake/runs.json 2>/dev/null || echo "[]" ;;
    esac
    ;;
  "run watch")
    echo "Run firebase-setup (4242) completed"
    ;;
  "run view")
    case "$*" in
      *status*) echo completed ;;
      *) cat .fake/conclusion 2>/dev/null || echo success ;;
    esac
    ;;
  "--version "*)
    echo "gh version 2.49.0 (2024-05-13)"
    ;;
esac
exit 0
"#;

pub const ANDROID_CONFIG: &str = r#"{
  "project_info": {
    "project_number": "123456789",
    "project_id": "hcg-space-goats"
  }
}"#;

pub const IOS_CONFIG: &str = "<plist version=\"1.0\">
<dict>
  <key>PROJECT_ID</key>
  <string>hcg-space-goats</string>
</dict>
</plist>";

/// A temporary Unity project. Kept alive for the duration of a test.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create a marker or data file under `.fake/`.
    pub fn fake_file(&self, name: &str, content: &str) {
        let path = self.root().join(".fake").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn remove_fake_file(&self, name: &str) {
        let _ = fs::remove_file(self.root().join(".fake").join(name));
    }

    /// Make the next `git pull` deliver both backend configs.
    pub fn stage_remote_backend_configs(&self) {
        self.fake_file("remote/google-services.json", ANDROID_CONFIG);
        self.fake_file("remote/GoogleService-Info.plist", IOS_CONFIG);
    }

    /// Invocations the fake tool logged, one per line.
    pub fn tool_log(&self, tool: &str) -> String {
        fs::read_to_string(self.root().join(".fake").join(format!("{tool}.log")))
            .unwrap_or_default()
    }

    /// Point a `[tools]` entry at a shell wrapper under `.fake/<dir>/` that
    /// execs the real tool. Returns the wrapper path.
    pub fn wrap_tool(&self, dir: &str, tool: &str) -> PathBuf {
        let wrapper_dir = self.root().join(".fake").join(dir);
        fs::create_dir_all(&wrapper_dir).unwrap();
        let wrapper = wrapper_dir.join(tool);
        write_executable(&wrapper, &format!("#!/bin/sh\nexec {tool} \"$@\"\n"));

        // `[tools]` is the last table of the config.
        let config_path = self.root().join(".ci-setup/config.toml");
        let mut config = fs::read_to_string(&config_path).unwrap();
        config.push_str(&format!("{tool} = \"{}\"\n", wrapper.display()));
        fs::write(config_path, config).unwrap();
        wrapper
    }

    pub fn read(&self, relative: &str) -> Option<String> {
        fs::read_to_string(self.root().join(relative)).ok()
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    let mut permissions = fs::metadata(path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).unwrap();
}

/// Create a Unity project whose config points `git` and `gh` at the fakes,
/// and `firebase` at a path that does not exist.
pub fn unity_project() -> TestProject {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("ProjectSettings")).unwrap();
    fs::write(
        root.join("ProjectSettings/ProjectSettings.asset"),
        PROJECT_SETTINGS,
    )
    .unwrap();

    let bin = root.join(".fake/bin");
    fs::create_dir_all(&bin).unwrap();
    let git = bin.join("git");
    let gh = bin.join("gh");
    write_executable(&git, FAKE_GIT);
    write_executable(&gh, FAKE_GH);
    let missing: PathBuf = bin.join("firebase");

    let config = format!(
        r#"poll_attempts = 2
poll_interval_secs = 0
dispatch_settle_secs = 0

[tools]
git = "{}"
gh = "{}"
firebase = "{}"
"#,
        git.display(),
        gh.display(),
        missing.display()
    );
    fs::create_dir_all(root.join(".ci-setup")).unwrap();
    fs::write(root.join(".ci-setup/config.toml"), config).unwrap();

    TestProject { dir }
}

/// Open a wizard on the project with an event receiver.
pub fn open_wizard(project: &TestProject) -> (Wizard, UnboundedReceiver<Event>) {
    let (tx, rx) = unbounded_channel();
    let wizard = Wizard::open(project.root(), tx).unwrap();
    (wizard, rx)
}

/// Tick the wizard until both runners are idle.
pub async fn settle(wizard: &mut Wizard) {
    for _ in 0..1000 {
        wizard.tick();
        if !wizard.is_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "wizard still busy: {:?}\n{}",
        wizard.foreground().current_command(),
        wizard.foreground().combined_output()
    );
}

/// Everything received so far.
pub fn drain_events(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
