//! Revisit - recurring reminders for personal note files
//!
//! Revisit turns per-note schedule rules into live reminder jobs. The
//! core pieces are a textual rule codec, a background job scheduler with
//! atomic reload, and a weekly occupancy analyzer that recommends the
//! least busy slot for a new rule.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod notes;
pub mod platform;
pub mod reminder;
pub mod rule;
pub mod scheduler;
pub mod store;

pub use error::{Result, RevisitError};
