use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pdf::{DEFAULT_MAX_DISPLAYED_PAGES, WINDOW_SPAN};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pdfsight";

/// Upper bound for `thumbnail_scale`
const MAX_THUMBNAIL_SCALE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Capacity of the render window
    #[serde(default = "default_max_displayed_pages")]
    pub max_displayed_pages: usize,

    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    /// Upper bound for the `auto` zoom mode
    #[serde(default = "default_max_auto_zoom")]
    pub max_auto_zoom: f32,

    #[serde(default = "default_thumbnail_scale")]
    pub thumbnail_scale: f32,

    #[serde(default = "default_thumbnail_cache_size")]
    pub thumbnail_cache_size: usize,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_max_displayed_pages() -> usize {
    DEFAULT_MAX_DISPLAYED_PAGES
}

fn default_zoom_step() -> f32 {
    0.2
}

fn default_max_auto_zoom() -> f32 {
    1.25
}

fn default_thumbnail_scale() -> f32 {
    0.5
}

fn default_thumbnail_cache_size() -> usize {
    32
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            max_displayed_pages: default_max_displayed_pages(),
            zoom_step: default_zoom_step(),
            max_auto_zoom: default_max_auto_zoom(),
            thumbnail_scale: default_thumbnail_scale(),
            thumbnail_cache_size: default_thumbnail_cache_size(),
        }
    }
}

impl ViewerSettings {
    /// Replace out-of-range values with defaults
    fn sanitize(&mut self) {
        if self.max_displayed_pages < WINDOW_SPAN {
            warn!(
                "max_displayed_pages {} is below the render window span, using {WINDOW_SPAN}",
                self.max_displayed_pages
            );
            self.max_displayed_pages = WINDOW_SPAN;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            warn!("Invalid zoom_step {}, using default", self.zoom_step);
            self.zoom_step = default_zoom_step();
        }
        if !(self.max_auto_zoom.is_finite() && self.max_auto_zoom > 0.0) {
            warn!("Invalid max_auto_zoom {}, using default", self.max_auto_zoom);
            self.max_auto_zoom = default_max_auto_zoom();
        }
        if !(self.thumbnail_scale > 0.0 && self.thumbnail_scale <= MAX_THUMBNAIL_SCALE) {
            warn!("Invalid thumbnail_scale {}, using default", self.thumbnail_scale);
            self.thumbnail_scale = default_thumbnail_scale();
        }
    }
}

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `path`, or from the default config location.
///
/// A missing default config file is created with defaults. Any read or parse
/// failure is logged and falls back to defaults.
pub fn load_settings(path: Option<&Path>) -> ViewerSettings {
    if let Some(path) = path {
        return load_settings_from_path(path).unwrap_or_default();
    }

    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return ViewerSettings::default();
    };

    if path.exists() {
        load_settings_from_path(&path).unwrap_or_default()
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        let settings = ViewerSettings::default();
        save_settings_to_file(&settings, &path);
        settings
    }
}

pub fn load_settings_from_path(path: &Path) -> Option<ViewerSettings> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<ViewerSettings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }
                settings.sanitize();
                Some(settings)
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                None
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            None
        }
    }
}

fn migrate_settings(settings: &mut ViewerSettings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    settings.version = CURRENT_VERSION;
}

pub fn save_settings_to_file(settings: &ViewerSettings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    match fs::write(path, generate_settings_yaml(settings)) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &ViewerSettings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str("# Pages kept materialized around the focused page (at least 9)\n");
    content.push_str(&format!(
        "max_displayed_pages: {}\n",
        settings.max_displayed_pages
    ));
    content.push_str(&format!("zoom_step: {}\n", settings.zoom_step));
    content.push_str(&format!("max_auto_zoom: {}\n", settings.max_auto_zoom));
    content.push_str(&format!("thumbnail_scale: {}\n", settings.thumbnail_scale));
    content.push_str(&format!(
        "thumbnail_cache_size: {}\n",
        settings.thumbnail_cache_size
    ));

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_viewer_config() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.max_displayed_pages, 9);
        assert_eq!(settings.zoom_step, 0.2);
        assert_eq!(settings.max_auto_zoom, 1.25);
        assert_eq!(settings.thumbnail_scale, 0.5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "version: 1\nmax_displayed_pages: 15\n").unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings.max_displayed_pages, 15);
        assert_eq!(settings.zoom_step, 0.2);
    }

    #[test]
    fn round_trips_through_generated_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let settings = ViewerSettings {
            max_displayed_pages: 12,
            thumbnail_cache_size: 8,
            ..ViewerSettings::default()
        };

        save_settings_to_file(&settings, &path);
        assert_eq!(load_settings_from_path(&path), Some(settings));
    }

    #[test]
    fn invalid_values_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_displayed_pages: 2\nzoom_step: -1\n").unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.max_displayed_pages, WINDOW_SPAN);
        assert_eq!(settings.zoom_step, 0.2);
    }

    #[test]
    fn oversized_thumbnail_scale_is_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "thumbnail_scale: 60\n").unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.thumbnail_scale, 0.5);

        fs::write(&path, "thumbnail_scale: 1.0\n").unwrap();
        assert_eq!(load_settings_from_path(&path).unwrap().thumbnail_scale, 1.0);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_displayed_pages: [not a number]\n").unwrap();

        assert_eq!(load_settings(Some(&path)), ViewerSettings::default());
        assert_eq!(
            load_settings(Some(&dir.path().join("missing.yaml"))),
            ViewerSettings::default()
        );
    }

    #[test]
    fn old_version_is_migrated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "version: 0\n").unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.version, CURRENT_VERSION);
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(&format!("version: {CURRENT_VERSION}")));
    }
}
