//! JSON-backed configuration and schedule store.
//!
//! Persists user settings and the per-note schedule map in one
//! `config.json`. A missing file is created with defaults; a corrupt file
//! falls back to defaults rather than failing startup. Interior locking
//! lets the scheduler's tick thread read settings while callers mutate
//! entries.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RevisitError};
use crate::notes::NoteKind;
use crate::store::{ReminderMode, ScheduleStore, SettingsSource, StoredSchedule};

/// User-facing settings persisted alongside the schedules.
/// Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_folder: String,
    pub md_editor_path: String,
    pub img_editor_path: String,
}

/// Stored rule text: a single string (legacy format) or a list of sibling
/// strings. Always written back as a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RuleText {
    One(String),
    Many(Vec<String>),
}

impl RuleText {
    fn to_vec(&self) -> Vec<String> {
        match self {
            RuleText::One(s) => vec![s.clone()],
            RuleText::Many(list) => list.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleRecord {
    mode: ReminderMode,
    #[serde(rename = "schedule")]
    rules: RuleText,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigData {
    settings: Settings,
    notes_schedule: BTreeMap<String, ScheduleRecord>,
}

/// The JSON config store. Implements [`ScheduleStore`] and
/// [`SettingsSource`]; every mutation is saved to disk immediately.
pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<ConfigData>,
}

impl ConfigStore {
    /// Default config location: `<config dir>/revisit/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("revisit")
            .join("config.json")
    }

    /// Open (or create) the config file at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            match Self::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    log::error!(
                        "Failed to load config from {}: {e}. Using defaults.",
                        path.display()
                    );
                    ConfigData::default()
                }
            }
        } else {
            log::info!("No config file at {}, creating defaults", path.display());
            let data = ConfigData::default();
            Self::write(&path, &data)?;
            data
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read(path: &Path) -> Result<ConfigData> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(path: &Path, data: &ConfigData) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, ConfigData>> {
        self.data.read().map_err(|e| RevisitError::Store(e.to_string()))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, ConfigData>> {
        self.data.write().map_err(|e| RevisitError::Store(e.to_string()))
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Settings {
        self.read_lock().map(|d| d.settings.clone()).unwrap_or_default()
    }

    /// Replace the settings and persist immediately.
    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        let mut data = self.write_lock()?;
        data.settings = settings;
        Self::write(&self.path, &data)
    }
}

impl ScheduleStore for ConfigStore {
    fn all_entries(&self) -> Result<Vec<StoredSchedule>> {
        let data = self.read_lock()?;
        Ok(data
            .notes_schedule
            .iter()
            .map(|(note_id, record)| {
                StoredSchedule::new(note_id.clone(), record.mode, record.rules.to_vec())
            })
            .collect())
    }

    fn entry(&self, note_id: &str) -> Result<Option<StoredSchedule>> {
        let data = self.read_lock()?;
        Ok(data.notes_schedule.get(note_id).map(|record| {
            StoredSchedule::new(note_id.to_string(), record.mode, record.rules.to_vec())
        }))
    }

    fn set_entry(&self, note_id: &str, entry: Option<StoredSchedule>) -> Result<()> {
        let mut data = self.write_lock()?;
        match entry {
            Some(entry) => {
                data.notes_schedule.insert(
                    note_id.to_string(),
                    ScheduleRecord {
                        mode: entry.mode,
                        rules: RuleText::Many(entry.rules),
                    },
                );
            }
            None => {
                data.notes_schedule.remove(note_id);
            }
        }
        Self::write(&self.path, &data)
    }
}

impl SettingsSource for ConfigStore {
    fn data_folder(&self) -> Option<PathBuf> {
        let folder = self.settings().data_folder;
        if folder.is_empty() {
            None
        } else {
            Some(PathBuf::from(folder))
        }
    }

    fn editor_for(&self, kind: NoteKind) -> Option<PathBuf> {
        let settings = self.settings();
        let path = match kind {
            NoteKind::Markdown => settings.md_editor_path,
            NoteKind::Image => settings.img_editor_path,
            NoteKind::Unknown => return None,
        };
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}
