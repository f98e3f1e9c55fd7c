//! Lightweight field extraction from project files.
//!
//! None of these are real parsers: each pulls one named value out of a
//! well-known file with a regular expression and returns `None` when the
//! value is not there.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name length bits of an index entry's flags word.
const INDEX_NAME_MASK: u16 = 0x0FFF;
/// Set when a v3 entry carries a second flags word.
const INDEX_EXTENDED_FLAG: u16 = 0x4000;

static JSON_PROJECT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""project_id"\s*:\s*"([^"]+)""#).expect("valid project_id regex"));

static PLIST_PROJECT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<key>PROJECT_ID</key>\s*<string>([^<]+)</string>")
        .expect("valid plist PROJECT_ID regex")
});

static WORKFLOW_GAME_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*game_name:\s*"?([^"\n]+?)"?\s*$"#).expect("valid game_name regex")
});

static MATCH_GIT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"git_url\(\s*"([^"]+)"\s*\)"#).expect("valid git_url regex"));

static UNITY_PRODUCT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*productName:\s*(.+?)\s*$").expect("valid productName regex")
});

static UNITY_IOS_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)applicationIdentifier:.*?iPhone:\s*([\w.\-]+)").expect("valid iPhone id regex")
});

static UNITY_ANDROID_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)applicationIdentifier:.*?Android:\s*([\w.\-]+)")
        .expect("valid Android id regex")
});

fn first_capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `"project_id": "..."` from `google-services.json`.
pub fn json_project_id(content: &str) -> Option<String> {
    first_capture(&JSON_PROJECT_ID, content)
}

/// `PROJECT_ID` from `GoogleService-Info.plist`.
pub fn plist_project_id(content: &str) -> Option<String> {
    first_capture(&PLIST_PROJECT_ID, content)
}

/// The `game_name` input the build workflow passes to the shared pipeline.
pub fn workflow_game_name(content: &str) -> Option<String> {
    first_capture(&WORKFLOW_GAME_NAME, content)
}

/// Certificate repository URL from a fastlane `Matchfile`.
pub fn match_git_url(content: &str) -> Option<String> {
    first_capture(&MATCH_GIT_URL, content)
}

/// `productName` from `ProjectSettings.asset`.
pub fn unity_product_name(content: &str) -> Option<String> {
    first_capture(&UNITY_PRODUCT_NAME, content)
}

/// iOS bundle identifier from `ProjectSettings.asset`.
pub fn unity_ios_bundle_id(content: &str) -> Option<String> {
    first_capture(&UNITY_IOS_ID, content)
}

/// Android package name from `ProjectSettings.asset`.
pub fn unity_android_bundle_id(content: &str) -> Option<String> {
    first_capture(&UNITY_ANDROID_ID, content)
}

/// Branch name from the contents of `.git/HEAD`; a detached HEAD yields the
/// abbreviated commit.
pub fn head_branch(content: &str) -> Option<String> {
    let head = content.trim();
    if let Some(reference) = head.strip_prefix("ref:") {
        let reference = reference.trim();
        return Some(
            reference
                .strip_prefix("refs/heads/")
                .unwrap_or(reference)
                .to_string(),
        );
    }
    (head.len() >= 7 && head.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| head[..7].to_string())
}

/// `url` of `[remote "origin"]` from `.git/config`.
pub fn origin_url(config: &str) -> Option<String> {
    let mut in_origin = false;
    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_origin = line == r#"[remote "origin"]"#;
            continue;
        }
        if !in_origin {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "url" {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// `gitdir: <path>` from a `.git` file (worktrees and submodules).
pub fn gitdir_pointer(content: &str) -> Option<String> {
    content
        .trim()
        .strip_prefix("gitdir:")
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Whether the raw bytes of `.git/index` list `path` as an entry.
///
/// Index entries store a flags word holding the name length, then the path
/// followed by a NUL byte. A match only counts when that length agrees, so
/// `Packages/Gemfile` does not list `Gemfile`. Uncompressed (v2/v3) format
/// only.
pub fn index_lists_path(index: &[u8], path: &str) -> bool {
    let name = path.as_bytes();
    if name.is_empty() {
        return false;
    }
    let name_len = name.len().min(INDEX_NAME_MASK as usize) as u16;
    let flags_at = |at: usize| {
        index
            .get(at..at + 2)
            .map(|bytes| u16::from_be_bytes([bytes[0], bytes[1]]))
    };

    let mut needle = name.to_vec();
    needle.push(0);
    index
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle.as_slice())
        .any(|(start, _)| {
            // The flags word right before the name carries its length; v3
            // extended entries put two more flag bytes in between.
            let plain = start.checked_sub(2).and_then(flags_at);
            let extended = start.checked_sub(4).and_then(flags_at);
            plain.is_some_and(|flags| flags & INDEX_NAME_MASK == name_len)
                || extended.is_some_and(|flags| {
                    flags & INDEX_EXTENDED_FLAG != 0 && flags & INDEX_NAME_MASK == name_len
                })
        })
}

/// Flags word followed by the NUL-terminated path, as stored in an index entry.
#[cfg(test)]
pub(crate) fn index_entry(path: &str) -> Vec<u8> {
    let flags = path.len().min(INDEX_NAME_MASK as usize) as u16;
    let mut entry = flags.to_be_bytes().to_vec();
    entry.extend_from_slice(path.as_bytes());
    entry.push(0);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_project_id() {
        let content = r#"{
  "project_info": {
    "project_number": "1234",
    "project_id": "demo-123",
    "storage_bucket": "demo-123.appspot.com"
  }
}"#;
        assert_eq!(json_project_id(content).as_deref(), Some("demo-123"));
        assert_eq!(json_project_id("{ not json at all"), None);
        assert_eq!(json_project_id(r#"{"project_id": ""}"#), None);
    }

    #[test]
    fn test_plist_project_id() {
        let content = "<dict>\n\t<key>PROJECT_ID</key>\n\t<string>hcg-space-goats</string>\n</dict>";
        assert_eq!(plist_project_id(content).as_deref(), Some("hcg-space-goats"));
        assert_eq!(plist_project_id("<dict></dict>"), None);
    }

    #[test]
    fn test_workflow_game_name() {
        let content = "    with:\n      game_name: \"Space Goats\"\n      build_target: \"iOS\"\n";
        assert_eq!(workflow_game_name(content).as_deref(), Some("Space Goats"));
    }

    #[test]
    fn test_match_git_url() {
        let content = "git_url(\"https://github.com/acme/ios-certificates.git\")\nstorage_mode(\"git\")\n";
        assert_eq!(
            match_git_url(content).as_deref(),
            Some("https://github.com/acme/ios-certificates.git")
        );
    }

    #[test]
    fn test_unity_project_settings() {
        let content = "PlayerSettings:
  companyName: Homecooked
  productName: Space Goats
  applicationIdentifier:
    Android: com.homecooked.spacegoats
    iPhone: com.homecooked.space-goats
  buildNumber:
";
        assert_eq!(unity_product_name(content).as_deref(), Some("Space Goats"));
        assert_eq!(
            unity_ios_bundle_id(content).as_deref(),
            Some("com.homecooked.space-goats")
        );
        assert_eq!(
            unity_android_bundle_id(content).as_deref(),
            Some("com.homecooked.spacegoats")
        );
        assert_eq!(unity_ios_bundle_id("productName: X"), None);
    }

    #[test]
    fn test_head_branch() {
        assert_eq!(head_branch("ref: refs/heads/main\n").as_deref(), Some("main"));
        assert_eq!(
            head_branch("ref: refs/heads/feature/ci\n").as_deref(),
            Some("feature/ci")
        );
        assert_eq!(
            head_branch("3f2a9c1d0e9b8a7f6e5d4c3b2a190817263544aa\n").as_deref(),
            Some("3f2a9c1")
        );
        assert_eq!(head_branch("garbage"), None);
    }

    #[test]
    fn test_origin_url() {
        let config = r#"[core]
	repositoryformatversion = 0
[remote "upstream"]
	url = git@github.com:other/repo.git
[remote "origin"]
	url = git@github.com:acme/space-goats.git
	fetch = +refs/heads/*:refs/remotes/origin/*
"#;
        assert_eq!(
            origin_url(config).as_deref(),
            Some("git@github.com:acme/space-goats.git")
        );
        assert_eq!(origin_url("[core]\n\tbare = false\n"), None);
    }

    #[test]
    fn test_gitdir_pointer() {
        assert_eq!(
            gitdir_pointer("gitdir: ../.git/worktrees/ci\n").as_deref(),
            Some("../.git/worktrees/ci")
        );
        assert_eq!(gitdir_pointer("nonsense"), None);
    }

    #[test]
    fn test_index_lists_path() {
        let mut index = b"DIRC\0\0\0\x02".to_vec();
        index.extend_from_slice(b"\x00\x07Gemfile\0\0\0");
        index.extend_from_slice(b"\x00\x0cGemfile.lock\0\0");

        assert!(index_lists_path(&index, "Gemfile"));
        assert!(index_lists_path(&index, "Gemfile.lock"));
        assert!(!index_lists_path(&index, "fastlane/Fastfile"));
        assert!(!index_lists_path(&index, ""));
    }

    #[test]
    fn test_index_path_suffix_is_not_a_match() {
        let mut index = b"DIRC\0\0\0\x02".to_vec();
        index.extend_from_slice(&index_entry("Packages/Gemfile"));
        index.extend_from_slice(&index_entry("fastlane/old/Fastfile"));

        assert!(index_lists_path(&index, "Packages/Gemfile"));
        assert!(!index_lists_path(&index, "Gemfile"));
        assert!(!index_lists_path(&index, "Fastfile"));
        assert!(!index_lists_path(&index, "old/Fastfile"));
    }

    #[test]
    fn test_index_extended_entry() {
        let mut index = b"DIRC\0\0\0\x03".to_vec();
        // Extended bit set, then the two extra flag bytes.
        index.extend_from_slice(b"\x40\x07\x00\x00Gemfile\0");

        assert!(index_lists_path(&index, "Gemfile"));
    }
}
