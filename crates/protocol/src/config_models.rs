//! Global configuration models for `.ci-setup/config.toml`.
//!
//! Every field has a default, so an absent or partial file is valid.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Project-wide settings from `.ci-setup/config.toml`.
///
/// # Example
///
/// ```toml
/// # .ci-setup/config.toml
/// game_name = "Space Goats"
/// poll_attempts = 20
///
/// [tools]
/// gh = "/opt/homebrew/bin/gh"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct GlobalConfig {
    /// Overrides the game name read from `ProjectSettings.asset`.
    pub game_name: Option<String>,

    /// Prefix of the derived Firebase project id.
    pub project_prefix: String,

    /// Service account granted App Distribution admin on the new project.
    pub service_account: String,

    /// File name of the build workflow under `.github/workflows/`.
    pub build_workflow: String,

    /// File name of the provisioning workflow under `.github/workflows/`.
    pub provision_workflow: String,

    /// How many times to look for the provisioning workflow before giving up.
    pub poll_attempts: u32,

    /// Fixed sleep between those lookups.
    pub poll_interval_secs: u32,

    /// Sleep between dispatching the workflow and listing its run.
    pub dispatch_settle_secs: u32,

    /// Executable names or paths of the external tools.
    pub tools: ToolPaths,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            game_name: None,
            project_prefix: "hcg-".to_string(),
            service_account: "ci-distribution@hcgamesfirebase.iam.gserviceaccount.com".to_string(),
            build_workflow: "build.yml".to_string(),
            provision_workflow: "firebase-setup.yml".to_string(),
            poll_attempts: 10,
            poll_interval_secs: 6,
            dispatch_settle_secs: 5,
            tools: ToolPaths::default(),
        }
    }
}

/// Executables used by the wizard, resolved against the corrected `PATH`
/// unless given as absolute paths.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct ToolPaths {
    pub git: String,
    pub gh: String,
    pub bash: String,
    pub firebase: String,
    pub gcloud: String,
    pub node: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            gh: "gh".to_string(),
            bash: "bash".to_string(),
            firebase: "firebase".to_string(),
            gcloud: "gcloud".to_string(),
            node: "node".to_string(),
        }
    }
}
