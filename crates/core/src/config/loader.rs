//! Loader for `.ci-setup/config.toml`.

use crate::config::error::{ConfigError, ConfigResult};
use crate::state::record::STATE_DIR;
use csk_protocol::GlobalConfig;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(CONFIG_FILE)
}

/// Loads the global configuration for the project at `root`.
///
/// A missing file yields the defaults; a present file may set any subset of
/// the fields.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, is not valid
/// TOML, or holds a value the wizard cannot work with.
///
/// # Example
///
/// ```rust,no_run
/// use csk_core::config::load_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("."))?;
/// println!("polling {} times", config.poll_attempts);
/// # Ok(())
/// # }
/// ```
pub fn load_config(root: &Path) -> ConfigResult<GlobalConfig> {
    let path = config_path(root);

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(GlobalConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
        path: path.clone(),
        source,
    })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.clone(),
            source,
        })?;

    validate(&config).map_err(|reason| ConfigError::InvalidConfig {
        path: path.clone(),
        reason,
    })?;

    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

fn validate(config: &GlobalConfig) -> Result<(), String> {
    if config.poll_attempts == 0 {
        return Err("poll_attempts must be at least 1".to_string());
    }
    if config.build_workflow.trim().is_empty() || config.provision_workflow.trim().is_empty() {
        return Err("workflow file names must not be empty".to_string());
    }
    let tools = &config.tools;
    for (name, value) in [
        ("git", &tools.git),
        ("gh", &tools.gh),
        ("bash", &tools.bash),
        ("firebase", &tools.firebase),
        ("gcloud", &tools.gcloud),
        ("node", &tools.node),
    ] {
        if value.trim().is_empty() {
            return Err(format!("tools.{name} must not be empty"));
        }
    }
    Ok(())
}
