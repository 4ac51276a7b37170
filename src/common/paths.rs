//! Configuration file locations
//!
//! A `uperf-harness.toml` in the working directory wins over the per-user
//! file, so a checkout can carry its own lab settings.

use std::path::{Path, PathBuf};

/// Name used for the per-user config directory
const APP_NAME: &str = "uperf-harness";

/// Config file looked up in the current working directory
pub const LOCAL_CONFIG_FILE: &str = "uperf-harness.toml";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/uperf-harness/`
/// - macOS: `~/Library/Application Support/uperf-harness/`
/// - Windows: `%APPDATA%\uperf-harness\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Resolve the configuration file to load, if any exists
///
/// Checks `dir/uperf-harness.toml` first, then the per-user file.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let local = dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(LOCAL_CONFIG_FILE);
        std::fs::write(&local, "").unwrap();

        assert_eq!(find_config(dir.path()), Some(local));
    }

    #[test]
    fn test_user_config_path_is_toml() {
        if let Some(path) = user_config_path() {
            assert_eq!(path.file_name().unwrap(), "config.toml");
        }
    }
}
