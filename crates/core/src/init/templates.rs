//! Embedded CI/CD template files.
//!
//! Templates live in the workspace `templates/` directory and are embedded
//! with `rust-embed`. Each one is an opaque function of the game name: every
//! `@GAME_NAME@` placeholder is replaced on render.

use csk_protocol::ArtifactKind;
use rust_embed::RustEmbed;

/// Placeholder substituted with the game name.
pub const GAME_NAME_PLACEHOLDER: &str = "@GAME_NAME@";

/// Embedded template files from the workspace `templates/` directory.
///
/// With the `debug-embed` feature the files are still compiled in for debug
/// builds, so tests see exactly what a release binary ships.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Template file backing a generated artifact.
pub fn template_name(kind: ArtifactKind) -> Option<&'static str> {
    match kind {
        ArtifactKind::BuildPipeline => Some("build.yml"),
        ArtifactKind::ProvisionWorkflow => Some("firebase-setup.yml"),
        ArtifactKind::DependencyManifest => Some("Gemfile"),
        ArtifactKind::DependencyLock => Some("Gemfile.lock"),
        ArtifactKind::LaneDefinitions => Some("Fastfile"),
        ArtifactKind::CertificateRepository => Some("Matchfile"),
        ArtifactKind::IgnoreFile => Some("gitignore"),
        ArtifactKind::IosBackendConfig
        | ArtifactKind::AndroidBackendConfig
        | ArtifactKind::ServiceAccountBinding => None,
    }
}

/// Raw template content by file name.
pub fn get_template(name: &str) -> Option<String> {
    TemplateAssets::get(name).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// Template content with the game name filled in.
pub fn render(name: &str, game_name: &str) -> Option<String> {
    get_template(name).map(|content| content.replace(GAME_NAME_PLACEHOLDER, game_name))
}
