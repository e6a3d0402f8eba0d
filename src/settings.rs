use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MapStyle {
    #[default]
    Streets,
    Outdoor,
    Aquarelle,
    Bright,
    Dark,
}

impl MapStyle {
    /// Tile style id understood by the map vendor.
    pub fn tile_style(&self) -> &'static str {
        match self {
            MapStyle::Streets => "streets-v2",
            MapStyle::Outdoor => "outdoor-v2",
            MapStyle::Aquarelle => "winter",
            MapStyle::Bright => "bright-v2",
            MapStyle::Dark => "dataviz-dark",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub language: String,
    pub theme: String,
    pub map_style: MapStyle,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: "en".into(),
            theme: "light".into(),
            map_style: MapStyle::Streets,
        }
    }
}

/// Fields to change. Anything left out is reset to its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub language: Option<String>,
    pub theme: Option<String>,
    pub map_style: Option<MapStyle>,
}

impl SettingsUpdate {
    fn over_defaults(self) -> UserSettings {
        let defaults = UserSettings::default();
        UserSettings {
            language: self.language.unwrap_or(defaults.language),
            theme: self.theme.unwrap_or(defaults.theme),
            map_style: self.map_style.unwrap_or(defaults.map_style),
        }
    }
}

/// User preferences persisted as JSON next to the archive.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn update(&self, update: SettingsUpdate) -> Result<UserSettings> {
        let mut guard = self.write();
        let updated = update.over_defaults();
        self.persist(&updated)?;
        *guard = updated.clone();
        Ok(updated)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
