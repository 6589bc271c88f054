//! CLI command definitions using clap.
//!
//! Subcommands:
//! - run: run the reminder scheduler in the foreground
//! - list: list notes and their schedules
//! - set/clear: edit a note's schedule
//! - suggest: recommend the least busy slot for a new reminder
//! - settings: update data folder and editor paths

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Revisit - recurring reminders for personal note files
#[derive(Parser, Debug)]
#[command(name = "revisit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reminder scheduler in the foreground
    Run,

    /// List notes in the data folder and their schedules
    List,

    /// Set the schedule for a note
    Set {
        /// Note file name (relative to the data folder)
        note: String,

        /// Reminder mode (notify, open)
        #[arg(short, long, default_value = "notify")]
        mode: String,

        /// Repeat interval (positive integer)
        #[arg(short, long, default_value_t = 1)]
        interval: u32,

        /// Recurrence unit (minute, hour, day, week)
        #[arg(short, long)]
        unit: String,

        /// Weekday selection for week rules; repeatable
        #[arg(short, long)]
        weekday: Vec<String>,

        /// Fire time as HH:MM (required for day and week rules)
        #[arg(short, long)]
        at: Option<String>,
    },

    /// Remove the schedule for a note
    Clear {
        /// Note file name
        note: String,
    },

    /// Recommend the least busy weekly slot for a new reminder
    Suggest,

    /// Update settings
    Settings {
        /// Folder holding the note files
        #[arg(long)]
        data_folder: Option<PathBuf>,

        /// Editor used for markdown notes
        #[arg(long)]
        md_editor: Option<PathBuf>,

        /// Editor used for image notes
        #[arg(long)]
        img_editor: Option<PathBuf>,
    },
}
