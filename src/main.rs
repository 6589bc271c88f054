use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;

use revisit::analyzer::Analyzer;
use revisit::config::ConfigStore;
use revisit::notes::scan_notes;
use revisit::platform::{LogNotifier, SystemOpener};
use revisit::reminder::Reminder;
use revisit::rule::{ScheduleRule, TimeOfDay, Unit, Weekday, codec};
use revisit::scheduler::JobScheduler;
use revisit::store::{ReminderMode, ScheduleStore, StoredSchedule};

mod cli;

use cli::{Cli, Commands};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env().init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ConfigStore::default_path);
    let store = Arc::new(
        ConfigStore::open(&config_path)
            .context(format!("Failed to open config at {}", config_path.display()))?,
    );

    match cli.command {
        Commands::Run => run_scheduler(store),
        Commands::List => list_notes(&store),
        Commands::Set {
            note,
            mode,
            interval,
            unit,
            weekday,
            at,
        } => set_schedule(&store, &note, &mode, interval, &unit, &weekday, at.as_deref()),
        Commands::Clear { note } => clear_schedule(&store, &note),
        Commands::Suggest => suggest_slot(&store),
        Commands::Settings {
            data_folder,
            md_editor,
            img_editor,
        } => update_settings(&store, data_folder, md_editor, img_editor),
    }
}

fn run_scheduler(store: Arc<ConfigStore>) -> Result<()> {
    info!("Starting reminder scheduler");
    let reminder = Reminder::new(
        store.clone(),
        Arc::new(LogNotifier),
        Arc::new(SystemOpener),
    );
    let scheduler = JobScheduler::new(store, reminder);
    scheduler.start();
    println!(
        "{} {} jobs active",
        "Scheduler running.".green(),
        scheduler.job_count()
    );

    // Foreground daemon: the tick thread does the work.
    loop {
        std::thread::sleep(Duration::from_secs(3600));
    }
}

fn list_notes(store: &Arc<ConfigStore>) -> Result<()> {
    let settings = store.settings();
    if settings.data_folder.is_empty() {
        println!("{}", "Data folder is not set; run `revisit settings --data-folder <path>`".yellow());
        return Ok(());
    }
    let notes = scan_notes(&PathBuf::from(&settings.data_folder));
    if notes.is_empty() {
        println!("No notes found in {}", settings.data_folder);
        return Ok(());
    }
    for note in notes {
        match store.entry(&note)? {
            Some(entry) => println!(
                "{} [{:?}] {}",
                note.green(),
                entry.mode,
                entry.rules.join(", ")
            ),
            None => println!("{note}"),
        }
    }
    Ok(())
}

fn set_schedule(
    store: &Arc<ConfigStore>,
    note: &str,
    mode: &str,
    interval: u32,
    unit: &str,
    weekdays: &[String],
    at: Option<&str>,
) -> Result<()> {
    let mode = match mode {
        "notify" => ReminderMode::Notify,
        "open" => ReminderMode::Open,
        other => bail!("unknown mode '{other}' (expected notify or open)"),
    };
    let unit = match unit {
        "minute" => Unit::Minute,
        "hour" => Unit::Hour,
        "day" => Unit::Day,
        "week" => Unit::Week,
        other => bail!("unknown unit '{other}' (expected minute, hour, day or week)"),
    };
    let weekdays = weekdays
        .iter()
        .map(|w| {
            Weekday::from_token(w).ok_or_else(|| eyre::eyre!("unknown weekday '{w}'"))
        })
        .collect::<Result<BTreeSet<_>>>()?;
    let time_of_day = at
        .map(|s| s.parse::<TimeOfDay>())
        .transpose()
        .context("Invalid --at time")?;

    let rule = ScheduleRule {
        interval,
        unit,
        weekdays,
        time_of_day,
    };
    // Invalid rules are rejected here, before anything reaches the store.
    rule.validate().context("Rejected schedule")?;

    let rules = codec::encode(&rule);
    store.set_entry(note, Some(StoredSchedule::new(note, mode, rules.clone())))?;
    println!("{} {} -> {}", "Saved:".green(), note, rules.join(", "));
    Ok(())
}

fn clear_schedule(store: &Arc<ConfigStore>, note: &str) -> Result<()> {
    store.set_entry(note, None)?;
    println!("{} {}", "Cleared:".green(), note);
    Ok(())
}

fn suggest_slot(store: &Arc<ConfigStore>) -> Result<()> {
    let analyzer = Analyzer::default();
    let entries = store.all_entries()?;
    let grid = analyzer.analyze(&entries);
    let (day, hour) = analyzer.find_least_busy(&grid);

    let at: TimeOfDay = format!("{hour}:00").parse().context("bucket hour")?;
    let rule = ScheduleRule::weekly([day], at);
    let encoded = codec::encode(&rule);

    println!(
        "Least busy slot: {} at {}:00",
        day.to_string().cyan(),
        hour
    );
    println!("Suggested rule: {}", encoded.join(", ").green());
    Ok(())
}

fn update_settings(
    store: &Arc<ConfigStore>,
    data_folder: Option<PathBuf>,
    md_editor: Option<PathBuf>,
    img_editor: Option<PathBuf>,
) -> Result<()> {
    let mut settings = store.settings();
    if let Some(folder) = data_folder {
        settings.data_folder = folder.display().to_string();
    }
    if let Some(editor) = md_editor {
        settings.md_editor_path = editor.display().to_string();
    }
    if let Some(editor) = img_editor {
        settings.img_editor_path = editor.display().to_string();
    }
    store.update_settings(settings)?;
    println!("{}", "Settings saved.".green());
    Ok(())
}
