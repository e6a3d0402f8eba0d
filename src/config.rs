use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const ENV_DATA_DIR: &str = "STORYSHELL_DATA_DIR";
pub const ENV_NATIVE_TRANSITIONS: &str = "STORYSHELL_NATIVE_TRANSITIONS";
pub const ENV_DEBUG: &str = "STORYSHELL_DEBUG";

/// Shell configuration, read from an optional JSON file and then overridden
/// by `STORYSHELL_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    /// Durable storage root. Without it the archive reports itself unavailable.
    pub data_dir: Option<PathBuf>,
    pub database_file: String,
    pub settings_file: String,
    /// Whether the host offers native view transitions.
    pub native_transitions: bool,
    pub transition_settle_ms: u64,
    pub debug: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: "storyshell.sqlite3".into(),
            settings_file: "settings.json".into(),
            native_transitions: true,
            transition_settle_ms: 250,
            debug: false,
        }
    }
}

fn flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl ShellConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            _ => Self::default(),
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|dir| !dir.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = lookup(ENV_NATIVE_TRANSITIONS) {
            self.native_transitions = flag(&value);
        }
        if let Some(value) = lookup(ENV_DEBUG) {
            self.debug = flag(&value);
        }
        self
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(&self.database_file))
    }

    pub fn settings_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(&self.settings_file))
    }
}
