//! Game name and backend project id derivation.

use crate::snapshot::ComponentSnapshot;
use csk_protocol::GlobalConfig;
use std::path::Path;

/// The configured name, else Unity's `productName`, else the name of the
/// project directory.
pub fn game_name(config: &GlobalConfig, snapshot: &ComponentSnapshot, root: &Path) -> String {
    config
        .game_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| snapshot.project().product_name.clone())
        .or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "Game".to_string())
}

/// `<prefix><lowercased name with spaces replaced by '-'>`.
pub fn project_id(prefix: &str, game_name: &str) -> String {
    format!("{prefix}{}", game_name.to_lowercase().replace(' ', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_project_id() {
        assert_eq!(project_id("hcg-", "Space Goats"), "hcg-space-goats");
        assert_eq!(project_id("hcg-", "Tetris"), "hcg-tetris");
        assert_eq!(project_id("acme-", "Big  Gap"), "acme-big--gap");
    }

    #[test]
    fn test_game_name_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("GoatProject");
        fs::create_dir_all(root.join("ProjectSettings")).unwrap();

        let config = GlobalConfig::default();
        let empty = ComponentSnapshot::collect(&root);
        assert_eq!(game_name(&config, &empty, &root), "GoatProject");

        fs::write(
            root.join("ProjectSettings/ProjectSettings.asset"),
            "  productName: Space Goats\n",
        )
        .unwrap();
        let with_settings = ComponentSnapshot::collect(&root);
        assert_eq!(game_name(&config, &with_settings, &root), "Space Goats");

        let overridden = GlobalConfig {
            game_name: Some("Goat Rush".to_string()),
            ..GlobalConfig::default()
        };
        assert_eq!(game_name(&overridden, &with_settings, &root), "Goat Rush");
    }
}
