//! Tool search path correction.
//!
//! A GUI or TUI process frequently inherits a minimal environment that lacks
//! the directories package managers install CLI tools into (Homebrew, npm
//! global prefix). [`ToolEnvironment`] builds a corrected `PATH` for child
//! processes and resolves executables against it, with an independent
//! fallback search of the same directories.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Corrected tool search environment shared by all runners.
#[derive(Debug, Clone)]
pub struct ToolEnvironment {
    /// Directories that take precedence over everything inherited.
    priority_dirs: Vec<PathBuf>,
    /// Directories appended when missing from the inherited `PATH`.
    extra_dirs: Vec<PathBuf>,
    /// The corrected `PATH` value handed to child processes.
    path: OsString,
}

impl ToolEnvironment {
    /// Build the environment from the current process `PATH` and the
    /// platform's package-manager directories.
    pub fn detect() -> Self {
        let (priority, extra) = default_dirs();
        Self::with_dirs(env::var_os("PATH"), priority, extra)
    }

    /// Build the environment from an explicit base `PATH`.
    pub fn with_dirs(
        base_path: Option<OsString>,
        priority_dirs: Vec<PathBuf>,
        extra_dirs: Vec<PathBuf>,
    ) -> Self {
        let path = corrected_path(base_path.as_deref(), &priority_dirs, &extra_dirs);
        Self {
            priority_dirs,
            extra_dirs,
            path,
        }
    }

    /// The `PATH` value to pass to child processes.
    pub fn path_var(&self) -> &OsStr {
        &self.path
    }

    /// Resolve an executable name to a launchable path.
    ///
    /// Absolute paths are accepted when they point at a file. Other names
    /// are looked up on the corrected `PATH` first; if that fails the
    /// package-manager directories are searched directly.
    pub fn resolve(&self, executable: &str, working_dir: &Path) -> Option<PathBuf> {
        let candidate = Path::new(executable);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        if let Ok(found) = which::which_in(executable, Some(&self.path), working_dir) {
            return Some(found);
        }

        self.priority_dirs
            .iter()
            .chain(self.extra_dirs.iter())
            .flat_map(|dir| executable_names(executable).map(move |name| dir.join(name)))
            .find(|path| path.is_file())
    }
}

impl Default for ToolEnvironment {
    fn default() -> Self {
        Self::detect()
    }
}

/// Prepend the priority directories (removing their inherited positions)
/// and append the extra directories that are not already present.
fn corrected_path(base: Option<&OsStr>, priority: &[PathBuf], extra: &[PathBuf]) -> OsString {
    let mut parts: Vec<PathBuf> = base
        .map(|p| env::split_paths(p).collect())
        .unwrap_or_default();

    parts.retain(|p| !priority.contains(p));
    for dir in extra {
        if !parts.contains(dir) {
            parts.push(dir.clone());
        }
    }

    let ordered = priority.iter().cloned().chain(parts);
    env::join_paths(ordered)
        .unwrap_or_else(|_| base.map(OsStr::to_os_string).unwrap_or_default())
}

#[cfg(not(windows))]
fn default_dirs() -> (Vec<PathBuf>, Vec<PathBuf>) {
    let priority = vec![
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/opt/homebrew/sbin"),
    ];
    let mut extra = vec![PathBuf::from("/usr/local/bin")];
    if let Some(home) = dirs::home_dir() {
        extra.push(home.join(".npm-global").join("bin"));
    }
    (priority, extra)
}

#[cfg(windows)]
fn default_dirs() -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut extra = Vec::new();
    if let Some(app_data) = dirs::data_dir() {
        extra.push(app_data.join("npm"));
    }
    (Vec::new(), extra)
}

#[cfg(not(windows))]
fn executable_names(name: &str) -> impl Iterator<Item = String> {
    std::iter::once(name.to_string())
}

#[cfg(windows)]
fn executable_names(name: &str) -> impl Iterator<Item = String> {
    let name = name.to_string();
    ["", ".exe", ".cmd", ".bat"]
        .into_iter()
        .map(move |ext| format!("{name}{ext}"))
}
