/// Persisted display preference
///
/// A single JSON file in the user's config directory holding the
/// dark/light flag. The file is written explicitly on first run so the
/// preference always exists on disk afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Defaults to light mode
    #[serde(default)]
    pub dark_mode: bool,
}

/// Where the preference file lives:
/// - Linux: ~/.config/photo-journal/preferences.json
/// - macOS: ~/Library/Application Support/photo-journal/preferences.json
/// - Windows: %APPDATA%\photo-journal\preferences.json
pub fn preferences_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("photo-journal");
    path.push("preferences.json");
    path
}

impl Preferences {
    /// Load the stored preference, writing the default on first run
    pub fn load_or_init(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(preferences) => preferences,
                Err(e) => {
                    log::warn!("unreadable preference file, using defaults: {e}");
                    Self::default()
                }
            },
            Err(_) => {
                let preferences = Self::default();
                if let Err(e) = preferences.save(path) {
                    log::warn!("could not write initial preferences: {e}");
                }
                preferences
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_light_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let preferences = Preferences::load_or_init(&path);
        assert!(!preferences.dark_mode);
        assert!(path.exists(), "first run should persist the default");
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let preferences = Preferences { dark_mode: true };
        preferences.save(&path).unwrap();

        assert_eq!(Preferences::load_or_init(&path), preferences);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(Preferences::load_or_init(&path), Preferences::default());
    }
}
