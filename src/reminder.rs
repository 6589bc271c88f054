//! Reminder dispatch: resolves a fired job into a notification or an
//! editor launch.
//!
//! Everything here follows a catch-log-continue policy; no failure in the
//! fire path may reach the tick loop. Missing preconditions (unset data
//! folder, vanished file) are logged and skipped without retry; the next
//! scheduled fire re-checks them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::notes::NoteKind;
use crate::platform::{Notifier, Opener};
use crate::store::{ReminderMode, SettingsSource};

const NOTIFICATION_TITLE: &str = "Note reminder";
const NOTIFICATION_DURATION: Duration = Duration::from_secs(10);

/// Fire-side collaborator bundle. Cloning shares the underlying
/// capabilities.
#[derive(Clone)]
pub struct Reminder {
    settings: Arc<dyn SettingsSource>,
    notifier: Arc<dyn Notifier>,
    opener: Arc<dyn Opener>,
}

impl Reminder {
    pub fn new(
        settings: Arc<dyn SettingsSource>,
        notifier: Arc<dyn Notifier>,
        opener: Arc<dyn Opener>,
    ) -> Self {
        Self {
            settings,
            notifier,
            opener,
        }
    }

    /// Fire a reminder for a note in the given mode.
    pub fn trigger(&self, note_id: &str, mode: ReminderMode) {
        log::info!("Reminder fired: note='{note_id}', mode={mode:?}");

        let Some(folder) = self.settings.data_folder() else {
            log::error!("Cannot fire reminder for '{note_id}': data folder is not set");
            return;
        };
        let path = folder.join(note_id);
        if !path.exists() {
            log::error!("Cannot fire reminder, file does not exist: {}", path.display());
            return;
        }

        match mode {
            ReminderMode::Notify => self.show_notification(note_id, path),
            ReminderMode::Open => self.open_in_editor(note_id, &path),
        }
    }

    fn show_notification(&self, note_id: &str, path: PathBuf) {
        let this = self.clone();
        let note = note_id.to_string();
        let on_click = Box::new(move || this.open_in_editor(&note, &path));
        let message = format!("Time to revisit your note:\n{note_id}");
        match self.notifier.show_notification(
            NOTIFICATION_TITLE,
            &message,
            NOTIFICATION_DURATION,
            on_click,
        ) {
            Ok(()) => log::info!("Notification sent for '{note_id}'"),
            Err(e) => log::error!("Failed to show notification for '{note_id}': {e}"),
        }
    }

    /// Open the note with the configured editor for its type, falling back
    /// to the platform default handler on any failure.
    pub fn open_in_editor(&self, note_id: &str, path: &Path) {
        let editor = self
            .settings
            .editor_for(NoteKind::of(note_id))
            .filter(|p| p.exists());

        if let Some(editor) = editor {
            log::info!(
                "Opening '{}' with editor '{}'",
                path.display(),
                editor.display()
            );
            match self.opener.launch(&editor, path) {
                Ok(()) => return,
                Err(e) => log::error!("Editor launch failed: {e}"),
            }
        } else {
            log::warn!(
                "Editor path unset or missing, opening '{}' with the default handler",
                path.display()
            );
        }

        if let Err(e) = self.opener.default_open(path) {
            log::error!("Failed to open '{}': {e}", path.display());
        }
    }
}
