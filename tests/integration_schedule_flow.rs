//! End-to-end schedule flow tests
//!
//! Exercises the config store, rule codec, scheduler and analyzer together
//! the way the application wires them: save a rule, reload the scheduler,
//! analyze occupancy, and suggest the next slot.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use revisit::analyzer::Analyzer;
use revisit::config::ConfigStore;
use revisit::error::Result;
use revisit::notes::NoteKind;
use revisit::platform::{ClickAction, Notifier, Opener};
use revisit::reminder::Reminder;
use revisit::rule::{ScheduleRule, TimeOfDay, Weekday, codec};
use revisit::scheduler::JobScheduler;
use revisit::store::{ReminderMode, ScheduleStore, SettingsSource, StoredSchedule};
use tempfile::TempDir;

struct NullNotifier;

impl Notifier for NullNotifier {
    fn show_notification(
        &self,
        _title: &str,
        _message: &str,
        _duration: Duration,
        _on_click: ClickAction,
    ) -> Result<()> {
        Ok(())
    }
}

struct NullOpener;

impl Opener for NullOpener {
    fn launch(&self, _program: &Path, _file: &Path) -> Result<()> {
        Ok(())
    }

    fn default_open(&self, _file: &Path) -> Result<()> {
        Ok(())
    }
}

fn open_store(dir: &TempDir) -> Arc<ConfigStore> {
    Arc::new(ConfigStore::open(dir.path().join("config.json")).unwrap())
}

fn scheduler_for(store: Arc<ConfigStore>) -> JobScheduler {
    let reminder = Reminder::new(store.clone(), Arc::new(NullNotifier), Arc::new(NullOpener));
    JobScheduler::new(store, reminder).with_tick_interval(Duration::from_millis(10))
}

/// Saving weekdays {monday, wednesday} at 10:30 produces the stored list
/// from the wire-format contract, and reload registers one job per string.
#[test]
fn test_save_weekly_rule_and_reload() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let rule = ScheduleRule::weekly(
        [Weekday::Monday, Weekday::Wednesday],
        TimeOfDay::new(10, 30).unwrap(),
    );
    rule.validate().unwrap();
    let encoded = codec::encode(&rule);
    assert_eq!(
        encoded,
        vec![
            "every().monday.at('10:30')".to_string(),
            "every().wednesday.at('10:30')".to_string(),
        ]
    );
    store
        .set_entry("a.md", Some(StoredSchedule::new("a.md", ReminderMode::Open, encoded)))
        .unwrap();

    let scheduler = scheduler_for(store);
    scheduler.reload().unwrap();
    assert_eq!(scheduler.job_count(), 2);
}

/// A mixed store with one unparseable entry still loads the valid one.
#[test]
fn test_reload_isolates_bad_entries() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .set_entry(
            "bad.md",
            Some(StoredSchedule::new(
                "bad.md",
                ReminderMode::Notify,
                vec!["__import__('os')".to_string()],
            )),
        )
        .unwrap();
    store
        .set_entry(
            "good.md",
            Some(StoredSchedule::new(
                "good.md",
                ReminderMode::Open,
                vec!["every(2).hours".to_string()],
            )),
        )
        .unwrap();

    let scheduler = scheduler_for(store);
    scheduler.reload().unwrap();
    assert_eq!(scheduler.job_count(), 1);
}

/// Start, mutate the store, reload while the tick loop runs, stop.
#[test]
fn test_running_scheduler_survives_reload_and_clear() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .set_entry(
            "a.md",
            Some(StoredSchedule::new(
                "a.md",
                ReminderMode::Open,
                vec!["every(30).minutes".to_string()],
            )),
        )
        .unwrap();

    let scheduler = scheduler_for(store.clone());
    scheduler.start();
    assert_eq!(scheduler.job_count(), 1);

    store
        .set_entry(
            "b.md",
            Some(StoredSchedule::new(
                "b.md",
                ReminderMode::Notify,
                vec!["every().friday.at('16:00')".to_string()],
            )),
        )
        .unwrap();
    scheduler.reload().unwrap();
    assert_eq!(scheduler.job_count(), 2);

    store.set_entry("a.md", None).unwrap();
    store.set_entry("b.md", None).unwrap();
    scheduler.reload().unwrap();
    assert_eq!(scheduler.job_count(), 0);

    scheduler.stop();
}

/// The analyzer reads the same store and its suggestion re-encodes into a
/// rule the codec accepts (the suggest-then-save loop).
#[test]
fn test_suggestion_round_trips_through_codec() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .set_entry(
            "a.md",
            Some(StoredSchedule::new(
                "a.md",
                ReminderMode::Notify,
                vec!["every().days.at('08:00')".to_string()],
            )),
        )
        .unwrap();

    let analyzer = Analyzer::default();
    let grid = analyzer.analyze(&store.all_entries().unwrap());
    let (day, hour) = analyzer.find_least_busy(&grid);

    // 08:00 is occupied on every day; the next work slot is suggested.
    assert_eq!(day, Weekday::Monday);
    assert_eq!(hour, "09");

    let at: TimeOfDay = format!("{hour}:00").parse().unwrap();
    let rule = ScheduleRule::weekly([day], at);
    rule.validate().unwrap();
    let encoded = codec::encode(&rule);
    assert_eq!(encoded, vec!["every().monday.at('09:00')".to_string()]);
    assert_eq!(codec::decode_rules(&encoded).unwrap(), rule);
}

/// Settings reach the fire path through the SettingsSource trait.
#[test]
fn test_config_store_settings_feed_the_reminder() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let mut settings = store.settings();
    settings.data_folder = dir.path().display().to_string();
    store.update_settings(settings).unwrap();

    assert_eq!(store.data_folder(), Some(dir.path().to_path_buf()));
    assert_eq!(store.editor_for(NoteKind::Markdown), None);

    // Triggering against an existing file must not panic even with null
    // capabilities.
    std::fs::File::create(dir.path().join("a.md")).unwrap();
    let reminder = Reminder::new(store.clone(), Arc::new(NullNotifier), Arc::new(NullOpener));
    reminder.trigger("a.md", ReminderMode::Notify);
    reminder.trigger("a.md", ReminderMode::Open);
}

/// Stopping twice and restarting is safe; dropping a running scheduler
/// shuts it down.
#[test]
fn test_scheduler_lifecycle_idempotence() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let scheduler = scheduler_for(store);

    scheduler.start();
    scheduler.start();
    scheduler.stop();
    scheduler.stop();
    scheduler.start();
    drop(scheduler);
}

fn _assert_traits() {
    fn is_send_sync<T: Send + Sync>() {}
    is_send_sync::<JobScheduler>();
    is_send_sync::<Arc<ConfigStore>>();
}
