//! Capability traits for notifications and file opening, plus the default
//! system-backed implementations.
//!
//! The scheduler core only talks to these traits; OS toast backends and
//! alternate launchers plug in without touching the fire path.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::error::{Result, RevisitError};

/// Callback invoked when a notification is clicked.
pub type ClickAction = Box<dyn FnOnce() + Send + 'static>;

/// Toast-style notification capability.
pub trait Notifier: Send + Sync {
    fn show_notification(
        &self,
        title: &str,
        message: &str,
        duration: Duration,
        on_click: ClickAction,
    ) -> Result<()>;
}

/// File launching capability. Implementations spawn and never wait.
pub trait Opener: Send + Sync {
    /// Launch a specific program with the file as its argument.
    fn launch(&self, program: &Path, file: &Path) -> Result<()>;

    /// Open the file with the platform default handler.
    fn default_open(&self, file: &Path) -> Result<()>;
}

/// Notifier that only writes to the log. Real toast backends implement
/// [`Notifier`] on top of their OS bindings.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_notification(
        &self,
        title: &str,
        message: &str,
        duration: Duration,
        _on_click: ClickAction,
    ) -> Result<()> {
        log::info!(
            "[notification {}s] {title}: {}",
            duration.as_secs(),
            message.replace('\n', " ")
        );
        Ok(())
    }
}

/// Opener backed by subprocess spawning.
#[derive(Debug, Default)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn launch(&self, program: &Path, file: &Path) -> Result<()> {
        Command::new(program)
            .arg(file)
            .spawn()
            .map_err(|e| RevisitError::Launch(format!("{}: {e}", program.display())))?;
        Ok(())
    }

    fn default_open(&self, file: &Path) -> Result<()> {
        default_open_command(file)
            .spawn()
            .map_err(|e| RevisitError::Launch(format!("default open {}: {e}", file.display())))?;
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn default_open_command(file: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(file);
    command
}

#[cfg(target_os = "macos")]
fn default_open_command(file: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(file);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_open_command(file: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(file);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_accepts_click_action() {
        let notifier = LogNotifier;
        let result = notifier.show_notification(
            "Note reminder",
            "Time to revisit:\na.md",
            Duration::from_secs(10),
            Box::new(|| {}),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_system_opener_missing_program_is_launch_error() {
        let opener = SystemOpener;
        let err = opener
            .launch(Path::new("/nonexistent/editor-binary"), Path::new("a.md"))
            .unwrap_err();
        assert!(matches!(err, RevisitError::Launch(_)));
    }
}
