// SPDX-License-Identifier: MPL-2.0

use crate::config::{APP_ID, DEFAULT_COPY_RESET_MS, DEFAULT_MAX_INPUT_HEIGHT, SETTINGS_FILE};
use crate::hooks::host::ScrollBehavior;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tunables shared by every hook instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    /// Cap applied by the input's auto-grow, in pixels
    pub max_input_height: u32,
    /// Delay before a copied state is reset, in milliseconds
    pub copy_reset_ms: u64,
    /// Animate auto-scroll jumps when the host supports it
    pub smooth_scroll: bool,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            max_input_height: DEFAULT_MAX_INPUT_HEIGHT,
            copy_reset_ms: DEFAULT_COPY_RESET_MS,
            smooth_scroll: true,
        }
    }
}

impl HookSettings {
    pub fn copy_reset_delay(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }

    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        }
    }

    /// Get the settings file path (~/.config/io.github.sethcottle.ChatHooks/hooks.json)
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push(SETTINGS_FILE);
            p
        })
    }

    /// Load settings from the user config dir. On first run the defaults are
    /// written there so they can be edited.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_or_init(&path),
            None => Self::default(),
        }
    }

    /// Like [`HookSettings::load_from`], but writes the defaults to `path`
    /// when no file exists yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }

        let settings = Self::default();
        if let Err(e) = settings.save_to(path) {
            tracing::warn!("could not write default settings to {}: {e}", path.display());
        }
        settings
    }

    /// Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        Ok(())
    }
}
