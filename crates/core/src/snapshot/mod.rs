//! Status snapshot of the project tree.
//!
//! [`StatusCollector::refresh`] reads a fixed set of well-known files and
//! in-repository metadata and replaces the previous [`ComponentSnapshot`]
//! wholesale. Every check is independent and best-effort: unreadable or
//! malformed files resolve to [`ArtifactState::Missing`] or `None` instead of
//! raising an error.

pub mod extract;

use crate::state::record;
use chrono::{DateTime, Utc};
use csk_protocol::{ArtifactKind, ArtifactState};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the Unity player settings, relative to the project root.
pub const PROJECT_SETTINGS_PATH: &str = "ProjectSettings/ProjectSettings.asset";

/// Presence of one artifact plus the identifier extracted from it, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub state: ArtifactState,
    pub detail: Option<String>,
}

impl ArtifactInfo {
    fn present(detail: Option<String>) -> Self {
        Self {
            state: ArtifactState::Present,
            detail,
        }
    }

    fn missing() -> Self {
        Self::default()
    }
}

/// Identity of the game as declared in `ProjectSettings.asset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub product_name: Option<String>,
    pub ios_bundle_id: Option<String>,
    pub android_bundle_id: Option<String>,
}

/// Point-in-time view of which CI/CD artifacts and backend configs exist.
///
/// Immutable once collected.
#[derive(Debug, Clone, Default)]
pub struct ComponentSnapshot {
    artifacts: BTreeMap<ArtifactKind, ArtifactInfo>,
    project: ProjectMetadata,
    branch: Option<String>,
    origin_url: Option<String>,
    tracked: bool,
    taken_at: Option<DateTime<Utc>>,
}

impl ComponentSnapshot {
    /// Read everything under `root`.
    pub fn collect(root: &Path) -> Self {
        let artifacts = ArtifactKind::ALL
            .into_iter()
            .map(|kind| (kind, check_artifact(root, kind)))
            .collect();

        let git_dir = locate_git_dir(root);
        let branch = git_dir
            .as_deref()
            .and_then(|dir| read_text(&dir.join("HEAD")))
            .and_then(|head| extract::head_branch(&head));
        let origin_url = git_dir
            .as_deref()
            .and_then(|dir| read_text(&dir.join("config")))
            .and_then(|config| extract::origin_url(&config));
        let tracked = git_dir
            .as_deref()
            .and_then(|dir| fs::read(dir.join("index")).ok())
            .map(|index| {
                ArtifactKind::GENERATED
                    .iter()
                    .all(|kind| extract::index_lists_path(&index, kind.relative_path()))
            })
            .unwrap_or(false);

        Self {
            artifacts,
            project: read_project_metadata(root),
            branch,
            origin_url,
            tracked,
            taken_at: Some(Utc::now()),
        }
    }

    pub fn info(&self, kind: ArtifactKind) -> ArtifactInfo {
        self.artifacts.get(&kind).cloned().unwrap_or_default()
    }

    pub fn state(&self, kind: ArtifactKind) -> ArtifactState {
        self.artifacts
            .get(&kind)
            .map(|info| info.state)
            .unwrap_or_default()
    }

    pub fn is_present(&self, kind: ArtifactKind) -> bool {
        self.state(kind).is_present()
    }

    pub fn detail(&self, kind: ArtifactKind) -> Option<&str> {
        self.artifacts
            .get(&kind)
            .and_then(|info| info.detail.as_deref())
    }

    /// Every file the Generate step writes exists.
    pub fn all_generated_present(&self) -> bool {
        ArtifactKind::GENERATED
            .iter()
            .all(|kind| self.is_present(*kind))
    }

    /// Both Firebase config files exist and name a project.
    pub fn backend_configs_present(&self) -> bool {
        self.is_present(ArtifactKind::IosBackendConfig)
            && self.is_present(ArtifactKind::AndroidBackendConfig)
    }

    /// The generated files are committed.
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn origin_url(&self) -> Option<&str> {
        self.origin_url.as_deref()
    }

    pub fn project(&self) -> &ProjectMetadata {
        &self.project
    }

    /// Game name the build workflow was generated for.
    pub fn tracked_game_name(&self) -> Option<&str> {
        self.detail(ArtifactKind::BuildPipeline)
    }

    /// Firebase project named by the backend configs, Android first.
    pub fn backend_project_id(&self) -> Option<&str> {
        self.detail(ArtifactKind::AndroidBackendConfig)
            .or_else(|| self.detail(ArtifactKind::IosBackendConfig))
    }

    pub fn certificate_repository(&self) -> Option<&str> {
        self.detail(ArtifactKind::CertificateRepository)
    }

    pub fn service_account(&self) -> Option<&str> {
        self.detail(ArtifactKind::ServiceAccountBinding)
    }

    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        self.taken_at
    }
}

/// Owns the current snapshot of one project root.
#[derive(Debug)]
pub struct StatusCollector {
    root: PathBuf,
    current: ComponentSnapshot,
}

impl StatusCollector {
    /// Create a collector. The snapshot stays empty until the first
    /// [`refresh`](Self::refresh).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: ComponentSnapshot::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot(&self) -> &ComponentSnapshot {
        &self.current
    }

    /// Re-read the project and replace the snapshot.
    pub fn refresh(&mut self) -> &ComponentSnapshot {
        self.current = ComponentSnapshot::collect(&self.root);
        tracing::debug!(
            root = %self.root.display(),
            generated = self.current.all_generated_present(),
            tracked = self.current.is_tracked(),
            backend = self.current.backend_configs_present(),
            "status snapshot refreshed"
        );
        &self.current
    }
}

fn read_text(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

fn check_artifact(root: &Path, kind: ArtifactKind) -> ArtifactInfo {
    let path = root.join(kind.relative_path());
    match kind {
        ArtifactKind::BuildPipeline => present_with(&path, extract::workflow_game_name),
        ArtifactKind::CertificateRepository => present_with(&path, extract::match_git_url),
        // A config file that names no project is as good as absent.
        ArtifactKind::IosBackendConfig => identified_by(&path, extract::plist_project_id),
        ArtifactKind::AndroidBackendConfig => identified_by(&path, extract::json_project_id),
        ArtifactKind::ServiceAccountBinding => match record::read_record(root) {
            Some(binding) if !binding.service_account.is_empty() => {
                ArtifactInfo::present(Some(binding.service_account))
            }
            _ => ArtifactInfo::missing(),
        },
        _ => {
            if path.is_file() {
                ArtifactInfo::present(None)
            } else {
                ArtifactInfo::missing()
            }
        }
    }
}

/// Present when the file exists; the detail is best-effort.
fn present_with(path: &Path, field: fn(&str) -> Option<String>) -> ArtifactInfo {
    if !path.is_file() {
        return ArtifactInfo::missing();
    }
    ArtifactInfo::present(read_text(path).and_then(|content| field(&content)))
}

/// Present only when the file exists and the identifier can be extracted.
fn identified_by(path: &Path, field: fn(&str) -> Option<String>) -> ArtifactInfo {
    match read_text(path).and_then(|content| field(&content)) {
        Some(id) => ArtifactInfo::present(Some(id)),
        None => ArtifactInfo::missing(),
    }
}

fn read_project_metadata(root: &Path) -> ProjectMetadata {
    let Some(content) = read_text(&root.join(PROJECT_SETTINGS_PATH)) else {
        return ProjectMetadata::default();
    };
    ProjectMetadata {
        product_name: extract::unity_product_name(&content),
        ios_bundle_id: extract::unity_ios_bundle_id(&content),
        android_bundle_id: extract::unity_android_bundle_id(&content),
    }
}

/// `.git` is usually a directory, but worktrees use a `gitdir:` pointer file.
fn locate_git_dir(root: &Path) -> Option<PathBuf> {
    let dot_git = root.join(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }
    let pointer = read_text(&dot_git).and_then(|content| extract::gitdir_pointer(&content))?;
    let dir = root.join(pointer);
    dir.is_dir().then_some(dir)
}
