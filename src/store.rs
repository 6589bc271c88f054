//! Schedule store and settings trait definitions.
//!
//! The scheduler and analyzer only ever read schedules through these
//! narrow interfaces; [`crate::config::ConfigStore`] is the shipped
//! implementation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::notes::NoteKind;

/// How a reminder surfaces when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMode {
    /// Passive system notification; clicking it opens the note.
    Notify,
    /// Launch the note in its editor directly.
    Open,
}

/// One persisted reminder: a note, a mode, and the encoded rule strings.
///
/// Week rules with several weekdays are stored as sibling strings, one
/// weekday per string, never combined in one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSchedule {
    pub note_id: String,
    pub mode: ReminderMode,
    pub rules: Vec<String>,
}

impl StoredSchedule {
    pub fn new(note_id: impl Into<String>, mode: ReminderMode, rules: Vec<String>) -> Self {
        Self {
            note_id: note_id.into(),
            mode,
            rules,
        }
    }
}

/// Narrow read/write interface over the persisted schedule entries.
pub trait ScheduleStore: Send + Sync {
    /// Every stored entry.
    fn all_entries(&self) -> Result<Vec<StoredSchedule>>;

    /// The entry for one note, if any.
    fn entry(&self, note_id: &str) -> Result<Option<StoredSchedule>>;

    /// Replace the entry for a note wholesale; `None` deletes it.
    fn set_entry(&self, note_id: &str, entry: Option<StoredSchedule>) -> Result<()>;
}

/// Read access to the user settings the fire path needs.
pub trait SettingsSource: Send + Sync {
    /// The folder holding the note files; `None` while unset.
    fn data_folder(&self) -> Option<PathBuf>;

    /// Configured editor for a note type; `None` while unset.
    fn editor_for(&self, kind: NoteKind) -> Option<PathBuf>;
}
