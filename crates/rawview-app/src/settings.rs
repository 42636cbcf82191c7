use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::media::{ChannelOrder, Geometry};

/// Persisted defaults for headerless files (`~/.config/rawview/settings.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// Storage order of interleaved RGB24 files.
    pub rgb_order: ChannelOrder,
    /// Initial window size relative to the video size.
    pub window_scale: f32,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            width: 640,
            height: 480,
            frame_rate: 30.0,
            rgb_order: ChannelOrder::Rgb,
            window_scale: 1.0,
        }
    }
}

impl SettingsConfig {
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rawview").join("settings.json"))
    }

    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            return;
        };
        match self.save_to(&path) {
            Ok(()) => log::info!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width, self.height, self.frame_rate)
    }
}
