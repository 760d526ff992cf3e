use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::log_warn;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserSettings {
    pub tick_interval_ms: u64,
    pub default_minutes_amount: u32,
    pub task_suggestions: Vec<String>,
    pub set_terminal_title: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            default_minutes_amount: 25,
            task_suggestions: vec![
                "Project 1".into(),
                "Project 2".into(),
                "Project 3".into(),
            ],
            set_terminal_title: true,
        }
    }
}

impl UserSettings {
    /// Tick period, never shorter than 10ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(10))
    }
}

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
                log_warn!("Ignoring malformed settings at {}: {}", path.display(), err);
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

    pub fn settings(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: UserSettings) -> Result<()> {
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let store = SettingsStore::new(tmp.path().join("settings.json")).unwrap();
        assert_eq!(store.settings(), UserSettings::default());
        assert_eq!(store.settings().tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.settings(), UserSettings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"tick_interval_ms": 250}"#).unwrap();
        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.tick_interval(), Duration::from_millis(250));
        assert_eq!(settings.default_minutes_amount, 25);
    }

    #[test]
    fn update_persists_across_reopen() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let path = tmp.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut settings = store.settings();
        settings.task_suggestions = vec!["Reading".into()];
        settings.set_terminal_title = false;
        store.update(settings.clone()).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.settings(), settings);
    }

    #[test]
    fn tick_interval_has_a_floor() {
        let settings = UserSettings {
            tick_interval_ms: 0,
            ..UserSettings::default()
        };
        assert_eq!(settings.tick_interval(), Duration::from_millis(10));
    }
}
