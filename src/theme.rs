//! Light/dark theme preference.
//!
//! The preference is a single string persisted in a small JSON file:
//! `"light"` selects the light theme, anything else (or no file at all)
//! means dark. Storage problems are logged and never surface to the gallery.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

const APP_DIR: &str = "slide-gallery";
const THEME_FILE: &str = "theme.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn preference(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "☀️",
            Theme::Dark => "🌙",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    theme: Option<String>,
}

/// Where the preference lives. Without a path the theme is session-only.
#[derive(Debug, Clone, Default)]
pub struct ThemeStore {
    path: Option<PathBuf>,
}

impl ThemeStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// `<config dir>/slide-gallery/theme.json`, if the platform has one.
    pub fn default_location() -> Self {
        Self::new(dirs::config_dir().map(|dir| dir.join(APP_DIR).join(THEME_FILE)))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads the stored theme, falling back to dark on any problem.
    pub fn load(&self) -> Theme {
        let Some(path) = &self.path else {
            return Theme::default();
        };
        if !path.exists() {
            return Theme::default();
        }

        match Self::read(path) {
            Ok(theme) => theme,
            Err(e) => {
                warn!("Ignoring theme preference at {}: {}", path.display(), e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = ThemeFile {
            theme: Some(theme.preference().to_string()),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        debug!("Saved theme preference {} to {}", theme.preference(), path.display());
        Ok(())
    }

    fn read(path: &Path) -> Result<Theme> {
        let contents = fs::read_to_string(path)?;
        let file: ThemeFile = serde_json::from_str(&contents)?;
        Ok(Theme::from_preference(file.theme.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn only_light_selects_light() {
        assert_eq!(Theme::from_preference(Some("light")), Theme::Light);
        assert_eq!(Theme::from_preference(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_preference(Some("LIGHT")), Theme::Dark);
        assert_eq!(Theme::from_preference(None), Theme::Dark);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let store = ThemeStore::new(Some(temp_dir.path().join("nested").join("theme.json")));

        assert_eq!(store.load(), Theme::Dark);
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load(), Theme::Light);
        store.save(Theme::Light.toggled()).unwrap();
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn corrupt_file_falls_back_to_dark() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("theme.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(ThemeStore::new(Some(path)).load(), Theme::Dark);
    }

    #[test]
    fn missing_store_is_session_only() {
        let store = ThemeStore::new(None);
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load(), Theme::Dark);
    }
}
