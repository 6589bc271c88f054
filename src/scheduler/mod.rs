//! Job scheduler: derives live timers from the schedule store and fires
//! them from a background tick loop.
//!
//! The tick loop and callers share only the job snapshot. `reload` builds
//! the full replacement set off to the side and publishes it in one step,
//! so the loop never observes a half-rebuilt set and is never paused.

pub mod job;

pub use job::{Job, Recurrence};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::reminder::Reminder;
use crate::rule::codec;
use crate::store::{ScheduleStore, StoredSchedule};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

type JobSet = Arc<Vec<Job>>;

/// Owns the live job set and the background tick thread.
///
/// State machine: Stopped -> Running on [`start`](Self::start), back on
/// [`stop`](Self::stop); [`reload`](Self::reload) replaces the job set
/// while running. All three are idempotent.
pub struct JobScheduler {
    store: Arc<dyn ScheduleStore>,
    reminder: Reminder,
    jobs: Arc<RwLock<JobSet>>,
    stop_flag: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
}

impl JobScheduler {
    pub fn new(store: Arc<dyn ScheduleStore>, reminder: Reminder) -> Self {
        Self {
            store,
            reminder,
            jobs: Arc::new(RwLock::new(Arc::new(Vec::new()))),
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            tick_interval: TICK_INTERVAL,
        }
    }

    /// Override the polling interval. Tests use a short one; `stop` blocks
    /// for at most one interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Number of currently registered jobs.
    pub fn job_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Start the background tick loop and load jobs from the store.
    /// No-op when already running.
    pub fn start(&self) {
        {
            let mut worker = lock_unpoisoned(&self.worker);
            if worker.as_ref().is_some_and(|h| !h.is_finished()) {
                return;
            }
            self.stop_flag.store(false, Ordering::Release);

            let jobs = Arc::clone(&self.jobs);
            let stop_flag = Arc::clone(&self.stop_flag);
            let reminder = self.reminder.clone();
            let tick_interval = self.tick_interval;
            *worker = Some(thread::spawn(move || {
                log::info!("Scheduler started");
                while !stop_flag.load(Ordering::Acquire) {
                    let snapshot = read_snapshot(&jobs);
                    run_pending(&snapshot, &reminder);
                    thread::sleep(tick_interval);
                }
                log::info!("Scheduler stopped");
            }));
        }

        if let Err(e) = self.reload() {
            log::error!("Initial schedule load failed: {e}");
        }
    }

    /// Signal the tick loop to exit and wait for it. No-op when stopped.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
        let handle = lock_unpoisoned(&self.worker).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::error!("Scheduler worker panicked");
            }
        }
    }

    /// Discard all jobs and rebuild them from the store. A decode failure
    /// in one entry is logged and skips that entry only; the new set is
    /// published atomically.
    pub fn reload(&self) -> Result<()> {
        log::info!("Reloading all schedules");
        let entries = self.store.all_entries()?;
        let now = Local::now();

        let mut rebuilt: Vec<Job> = Vec::new();
        let mut skipped = 0usize;
        for entry in &entries {
            match build_jobs(entry, now) {
                Ok(jobs) => {
                    for job in &jobs {
                        log::info!(
                            "Registered job for '{}' ({:?}): {:?}",
                            job.note_id,
                            job.mode,
                            job.recurrence
                        );
                    }
                    rebuilt.extend(jobs);
                }
                Err(e) => {
                    skipped += 1;
                    log::error!("Skipping schedule for '{}': {e}", entry.note_id);
                }
            }
        }

        let count = rebuilt.len();
        match self.jobs.write() {
            Ok(mut guard) => *guard = Arc::new(rebuilt),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(rebuilt),
        }
        log::info!("Reload complete: {count} jobs active, {skipped} entries skipped");
        Ok(())
    }

    fn snapshot(&self) -> JobSet {
        read_snapshot(&self.jobs)
    }
}

impl Drop for JobScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock_unpoisoned<'a>(
    worker: &'a Mutex<Option<JoinHandle<()>>>,
) -> std::sync::MutexGuard<'a, Option<JoinHandle<()>>> {
    match worker.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn read_snapshot(jobs: &RwLock<JobSet>) -> JobSet {
    match jobs.read() {
        Ok(guard) => Arc::clone(&guard),
        Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
}

/// Decode one stored entry into jobs, one per sub-rule string.
fn build_jobs(entry: &StoredSchedule, now: DateTime<Local>) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();
    for rule_text in &entry.rules {
        if rule_text.is_empty() {
            continue;
        }
        let rule = codec::decode(rule_text)?;
        for recurrence in Recurrence::from_rule(&rule) {
            jobs.push(Job::new(
                entry.note_id.clone(),
                entry.mode,
                recurrence,
                now,
            ));
        }
    }
    Ok(jobs)
}

/// Fire every due job once and advance it. Fire-path failures are logged
/// inside the reminder and never reach the loop.
fn run_pending(jobs: &[Job], reminder: &Reminder) {
    let now = Local::now();
    for job in jobs {
        if job.is_due(now) {
            reminder.trigger(&job.note_id, job.mode);
            job.advance(now);
        }
    }
}
