//! Note discovery and type detection.
//!
//! Notes are plain files in the user's data folder; the type is derived
//! from the file extension and selects which editor opens the note.

use std::path::Path;

/// Supported note file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Markdown,
    Image,
    Unknown,
}

const MD_EXTS: &[&str] = &["md", "markdown"];
const IMG_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

impl NoteKind {
    /// Classify a note by its file extension (case-insensitive).
    pub fn of(filename: &str) -> NoteKind {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some(e) if MD_EXTS.contains(&e) => NoteKind::Markdown,
            Some(e) if IMG_EXTS.contains(&e) => NoteKind::Image,
            _ => NoteKind::Unknown,
        }
    }
}

/// List the supported note files in the data folder, sorted by name.
/// A missing or unreadable folder yields an empty list.
pub fn scan_notes(folder: &Path) -> Vec<String> {
    if !folder.is_dir() {
        log::warn!("Data folder '{}' does not exist or is not set", folder.display());
        return Vec::new();
    }

    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to read data folder '{}': {e}", folder.display());
            return Vec::new();
        }
    };

    let mut notes = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if NoteKind::of(name) != NoteKind::Unknown {
                notes.push(name.to_string());
            }
        }
    }
    notes.sort();
    notes
}
