//! Artifact and tool detection models.
//!
//! An artifact is a generated or externally produced file whose presence
//! signals how far the CI/CD setup has progressed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Every artifact class the status collector checks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    /// `.github/workflows/build.yml`
    BuildPipeline,
    /// `.github/workflows/firebase-setup.yml`
    ProvisionWorkflow,
    /// `Gemfile`
    DependencyManifest,
    /// `Gemfile.lock`
    DependencyLock,
    /// `fastlane/Fastfile`
    LaneDefinitions,
    /// `fastlane/Matchfile`
    CertificateRepository,
    /// `.gitignore`
    IgnoreFile,
    /// `Assets/Settings/GoogleService-Info.plist`
    IosBackendConfig,
    /// `Assets/Settings/google-services.json`
    AndroidBackendConfig,
    /// `.ci-setup/state.toml`
    ServiceAccountBinding,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 10] = [
        ArtifactKind::BuildPipeline,
        ArtifactKind::ProvisionWorkflow,
        ArtifactKind::DependencyManifest,
        ArtifactKind::DependencyLock,
        ArtifactKind::LaneDefinitions,
        ArtifactKind::CertificateRepository,
        ArtifactKind::IgnoreFile,
        ArtifactKind::IosBackendConfig,
        ArtifactKind::AndroidBackendConfig,
        ArtifactKind::ServiceAccountBinding,
    ];

    /// Artifacts written by the Generate step.
    pub const GENERATED: [ArtifactKind; 7] = [
        ArtifactKind::BuildPipeline,
        ArtifactKind::ProvisionWorkflow,
        ArtifactKind::DependencyManifest,
        ArtifactKind::DependencyLock,
        ArtifactKind::LaneDefinitions,
        ArtifactKind::CertificateRepository,
        ArtifactKind::IgnoreFile,
    ];

    /// Project-relative path of the artifact, using `/` separators.
    pub fn relative_path(self) -> &'static str {
        match self {
            ArtifactKind::BuildPipeline => ".github/workflows/build.yml",
            ArtifactKind::ProvisionWorkflow => ".github/workflows/firebase-setup.yml",
            ArtifactKind::DependencyManifest => "Gemfile",
            ArtifactKind::DependencyLock => "Gemfile.lock",
            ArtifactKind::LaneDefinitions => "fastlane/Fastfile",
            ArtifactKind::CertificateRepository => "fastlane/Matchfile",
            ArtifactKind::IgnoreFile => ".gitignore",
            ArtifactKind::IosBackendConfig => "Assets/Settings/GoogleService-Info.plist",
            ArtifactKind::AndroidBackendConfig => "Assets/Settings/google-services.json",
            ArtifactKind::ServiceAccountBinding => ".ci-setup/state.toml",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::BuildPipeline => "Build pipeline",
            ArtifactKind::ProvisionWorkflow => "Provisioning workflow",
            ArtifactKind::DependencyManifest => "Gemfile",
            ArtifactKind::DependencyLock => "Gemfile.lock",
            ArtifactKind::LaneDefinitions => "Fastfile",
            ArtifactKind::CertificateRepository => "Matchfile",
            ArtifactKind::IgnoreFile => ".gitignore",
            ArtifactKind::IosBackendConfig => "iOS Firebase config",
            ArtifactKind::AndroidBackendConfig => "Android Firebase config",
            ArtifactKind::ServiceAccountBinding => "CI service account",
        }
    }
}

/// Presence of a single artifact.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactState {
    Present,
    #[default]
    Missing,
}

impl ArtifactState {
    pub fn is_present(self) -> bool {
        self == ArtifactState::Present
    }
}

/// Result of probing one external tool on the background channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ToolStatus {
    /// Tool name as configured (e.g. "gh", "firebase").
    pub name: String,

    /// Whether the tool could be launched and reported a version.
    pub found: bool,

    /// First non-empty line the tool printed for `--version`.
    pub version: Option<String>,

    /// False when the tool is installed but older than required
    /// (Node.js below v20 cannot run the Firebase CLI).
    pub meets_minimum: bool,

    /// Login state for tools that need an account (`gh auth status`).
    /// `None` when not checked.
    #[serde(default)]
    pub authenticated: Option<bool>,
}
