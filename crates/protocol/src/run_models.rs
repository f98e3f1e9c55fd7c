//! Remote workflow run models.
//!
//! Runs are listed with `gh run list --json ...`; field names follow the
//! GitHub CLI's JSON output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Number of recent runs kept for display.
pub const RUN_HISTORY_LEN: usize = 5;

/// One remote workflow run.
///
/// Run lists are ordered most-recent-first and replaced wholesale on every
/// fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct RunInfo {
    #[serde(rename = "databaseId")]
    #[ts(type = "number")]
    pub id: u64,

    #[serde(rename = "displayTitle", default)]
    pub title: String,

    /// `queued`, `in_progress`, `completed`, ...
    #[serde(default)]
    pub status: String,

    /// `success`, `failure`, `cancelled`, ... `None` while the run is active.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub conclusion: Option<String>,

    #[serde(rename = "headBranch", default)]
    pub branch: String,

    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RunInfo {
    pub fn is_finished(&self) -> bool {
        self.status == "completed"
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Platform input of the build workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
pub enum BuildTarget {
    Android,
    #[default]
    #[serde(rename = "iOS")]
    Ios,
    Both,
}

impl BuildTarget {
    /// Value passed to the workflow's `buildTarget` input.
    pub fn as_input(self) -> &'static str {
        match self {
            BuildTarget::Android => "Android",
            BuildTarget::Ios => "iOS",
            BuildTarget::Both => "Both",
        }
    }

    pub fn next(self) -> Self {
        match self {
            BuildTarget::Android => BuildTarget::Ios,
            BuildTarget::Ios => BuildTarget::Both,
            BuildTarget::Both => BuildTarget::Android,
        }
    }
}

/// Distribution input of the build workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
pub enum Distribution {
    /// Build only, upload nowhere.
    #[default]
    #[serde(rename = "None")]
    NoUpload,
    TestFlight,
    Firebase,
}

impl Distribution {
    /// Value passed to the workflow's `distribution` input.
    pub fn as_input(self) -> &'static str {
        match self {
            Distribution::NoUpload => "None",
            Distribution::TestFlight => "TestFlight",
            Distribution::Firebase => "Firebase",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Distribution::NoUpload => Distribution::TestFlight,
            Distribution::TestFlight => Distribution::Firebase,
            Distribution::Firebase => Distribution::NoUpload,
        }
    }
}
