//! Writing template artifacts into a project.

use super::error::{InitError, InitResult};
use super::templates::{render, template_name};
use csk_protocol::ArtifactKind;
use std::fs;
use std::path::Path;

/// What a generation pass did with each artifact.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<ArtifactKind>,
    /// Already present; left untouched.
    pub skipped: Vec<ArtifactKind>,
    pub failed: Vec<(ArtifactKind, InitError)>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every generated artifact that does not exist yet under `root`.
///
/// Existing files are never overwritten, so a second pass is a no-op. A
/// failure on one artifact is recorded and the remaining ones are still
/// attempted.
pub fn generate_artifacts(root: &Path, game_name: &str) -> GenerationReport {
    let mut report = GenerationReport::default();

    for kind in ArtifactKind::GENERATED {
        let target = root.join(kind.relative_path());
        if target.exists() {
            report.skipped.push(kind);
            continue;
        }
        match write_artifact(root, kind, game_name) {
            Ok(()) => {
                tracing::info!(path = %target.display(), "generated artifact");
                report.written.push(kind);
            }
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "failed to generate artifact");
                report.failed.push((kind, e));
            }
        }
    }

    report
}

/// Render one artifact's template and write it to its project path.
fn write_artifact(root: &Path, kind: ArtifactKind, game_name: &str) -> InitResult<()> {
    let name = template_name(kind)
        .ok_or_else(|| InitError::TemplateNotFound(kind.relative_path().to_string()))?;
    let content =
        render(name, game_name).ok_or_else(|| InitError::TemplateNotFound(name.to_string()))?;

    let target_path = root.join(kind.relative_path());

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })?;

    Ok(())
}
