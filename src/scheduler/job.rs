//! Scheduler-internal job representation and recurrence arithmetic.
//!
//! Jobs are ephemeral: derived from stored rules on reload, discarded
//! wholesale on the next reload, never persisted.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Datelike, Duration, Local, NaiveTime, TimeZone};

use crate::rule::{ScheduleRule, TimeOfDay, Unit, Weekday};
use crate::store::ReminderMode;

/// When a job repeats. One recurrence per decoded sub-rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    EveryMinutes(u32),
    EveryHours(u32),
    Daily { every: u32, at: Option<TimeOfDay> },
    Weekly { day: Weekday, at: TimeOfDay },
}

impl Recurrence {
    /// Expand a decoded rule into its recurrences: one for minute/hour/day
    /// rules, one per selected weekday for week rules.
    pub fn from_rule(rule: &ScheduleRule) -> Vec<Recurrence> {
        match rule.unit {
            Unit::Minute => vec![Recurrence::EveryMinutes(rule.interval)],
            Unit::Hour => vec![Recurrence::EveryHours(rule.interval)],
            Unit::Day => vec![Recurrence::Daily {
                every: rule.interval,
                at: rule.time_of_day,
            }],
            Unit::Week => match rule.time_of_day {
                Some(at) => rule
                    .weekdays
                    .iter()
                    .map(|&day| Recurrence::Weekly { day, at })
                    .collect(),
                // A week rule without a time violates the invariants and
                // cannot be scheduled.
                None => Vec::new(),
            },
        }
    }

    /// First fire time when a job is registered at `now`.
    pub fn first_fire(&self, now: DateTime<Local>) -> DateTime<Local> {
        match *self {
            Recurrence::EveryMinutes(n) => now + Duration::minutes(n as i64),
            Recurrence::EveryHours(n) => now + Duration::hours(n as i64),
            Recurrence::Daily { at: Some(at), .. } => {
                let candidate = at_time(now, at);
                if candidate > now {
                    candidate
                } else {
                    candidate + Duration::days(1)
                }
            }
            Recurrence::Daily { every, at: None } => now + Duration::days(every as i64),
            Recurrence::Weekly { day, at } => {
                let ahead = (day.to_chrono().num_days_from_monday() as i64
                    - now.weekday().num_days_from_monday() as i64)
                    .rem_euclid(7);
                let candidate = at_time(now, at) + Duration::days(ahead);
                if candidate > now {
                    candidate
                } else {
                    candidate + Duration::days(7)
                }
            }
        }
    }

    /// Next fire time after a fire observed at `fired`. Timed recurrences
    /// re-anchor to the scheduled time so late ticks do not drift.
    pub fn next_fire(&self, fired: DateTime<Local>) -> DateTime<Local> {
        match *self {
            Recurrence::EveryMinutes(n) => fired + Duration::minutes(n as i64),
            Recurrence::EveryHours(n) => fired + Duration::hours(n as i64),
            Recurrence::Daily {
                every,
                at: Some(at),
            } => at_time(fired, at) + Duration::days(every as i64),
            Recurrence::Daily { every, at: None } => fired + Duration::days(every as i64),
            // A fire can be observed on a later calendar day than scheduled
            // (suspend, long stall). Re-find the weekday from `fired` rather
            // than adding a week to the observation day.
            Recurrence::Weekly { .. } => self.first_fire(fired),
        }
    }
}

/// Anchor `at` on the date of `reference`, resolving DST gaps to the
/// reference instant.
fn at_time(reference: DateTime<Local>, at: TimeOfDay) -> DateTime<Local> {
    let time = NaiveTime::from_hms_opt(at.hour as u32, at.minute as u32, 0).unwrap_or_default();
    let naive = reference.date_naive().and_time(time);
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt,
        None => reference,
    }
}

/// A live timer derived from one stored sub-rule, bound to a note and a
/// reminder mode. The full job set is rebuilt on every reload; only the
/// tick thread advances the fire time.
#[derive(Debug)]
pub struct Job {
    pub note_id: String,
    pub mode: ReminderMode,
    pub recurrence: Recurrence,
    next_fire: AtomicI64,
}

impl Job {
    pub fn new(
        note_id: String,
        mode: ReminderMode,
        recurrence: Recurrence,
        now: DateTime<Local>,
    ) -> Self {
        let first = recurrence.first_fire(now);
        Self {
            note_id,
            mode,
            recurrence,
            next_fire: AtomicI64::new(first.timestamp()),
        }
    }

    /// Epoch seconds of the next scheduled fire.
    pub fn next_fire_at(&self) -> i64 {
        self.next_fire.load(Ordering::Acquire)
    }

    /// True when the job is due at `now`.
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        now.timestamp() >= self.next_fire_at()
    }

    /// Advance past a fire observed at `now`.
    pub fn advance(&self, now: DateTime<Local>) {
        let next = self.recurrence.next_fire(now);
        self.next_fire.store(next.timestamp(), Ordering::Release);
    }
}
