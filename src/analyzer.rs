//! Weekly occupancy analysis over all stored schedules.
//!
//! Buckets every timed rule into a 7xK day/time-slot grid and recommends
//! the least busy slot, preferring weekday work hours. The grid is
//! recomputed fully on each call; nothing is cached between analyses.

use crate::rule::codec;
use crate::rule::{Unit, Weekday};
use crate::store::StoredSchedule;

/// Hour-to-column bucketing policy.
///
/// Column 0 collects all off-hours; columns 1..=span cover the hours in
/// `[work_start, work_end)`. The boundaries are presentation policy, not a
/// contract; the mapping only has to stay a pure function of the hour.
#[derive(Debug, Clone)]
pub struct BucketPolicy {
    pub work_start: u8,
    pub work_end: u8,
    /// Representative hour suggested for the off-hours column.
    pub off_hours_hint: u8,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            work_start: 8,
            work_end: 18,
            off_hours_hint: 20,
        }
    }
}

impl BucketPolicy {
    /// Number of grid columns: the off-hours column plus one per work hour.
    /// An inverted range has no work hours and collapses to one column.
    pub fn columns(&self) -> usize {
        self.work_end.saturating_sub(self.work_start) as usize + 1
    }

    /// Map an hour of day to its column.
    pub fn column_for_hour(&self, hour: u8) -> usize {
        if hour >= self.work_start && hour < self.work_end {
            (hour - self.work_start) as usize + 1
        } else {
            0
        }
    }

    /// Map a column back to a representative zero-padded hour string.
    pub fn hour_for_column(&self, column: usize) -> String {
        if column == 0 {
            format!("{:02}", self.off_hours_hint)
        } else {
            format!("{:02}", column as u8 - 1 + self.work_start)
        }
    }
}

/// 7xK histogram of scheduled fire slots. Row = weekday (monday first),
/// column = time bucket per the policy.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cells: Vec<Vec<u32>>,
}

impl OccupancyGrid {
    fn new(columns: usize) -> Self {
        Self {
            cells: vec![vec![0; columns]; 7],
        }
    }

    pub fn columns(&self) -> usize {
        self.cells[0].len()
    }

    pub fn count(&self, day: Weekday, column: usize) -> u32 {
        self.cells[day.index()][column]
    }

    /// Rows in weekday order, for display.
    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }

    fn bump(&mut self, day_index: usize, column: usize) {
        self.cells[day_index][column] += 1;
    }
}

/// Aggregates stored rules into an [`OccupancyGrid`] and recommends slots.
pub struct Analyzer {
    policy: BucketPolicy,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(BucketPolicy::default())
    }
}

impl Analyzer {
    pub fn new(policy: BucketPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BucketPolicy {
        &self.policy
    }

    /// Recompute the full occupancy grid from the stored entries.
    /// Unparseable and timeless (minute/hour) rules contribute nothing.
    pub fn analyze(&self, entries: &[StoredSchedule]) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(self.policy.columns());
        for entry in entries {
            for rule_text in &entry.rules {
                let rule = match codec::decode(rule_text) {
                    Ok(rule) => rule,
                    Err(e) => {
                        log::debug!("Ignoring unparseable rule for '{}': {e}", entry.note_id);
                        continue;
                    }
                };
                let Some(at) = rule.time_of_day else {
                    continue;
                };
                let column = self.policy.column_for_hour(at.hour);
                match rule.unit {
                    Unit::Week => {
                        for day in &rule.weekdays {
                            grid.bump(day.index(), column);
                        }
                    }
                    Unit::Day => {
                        for day_index in 0..7 {
                            grid.bump(day_index, column);
                        }
                    }
                    Unit::Minute | Unit::Hour => {}
                }
            }
        }
        grid
    }

    /// Find the least busy slot as (weekday, representative hour string).
    ///
    /// Tier 1 scans weekday work hours; tier 2 (all days, all columns)
    /// runs only when every tier-1 slot is occupied. The scan order is
    /// stable and the first minimum seen wins ties, so an empty work-hour
    /// slot is always preferred.
    pub fn find_least_busy(&self, grid: &OccupancyGrid) -> (Weekday, String) {
        let mut min_count = u32::MAX;
        let mut best = (Weekday::Monday, "10".to_string());

        for day_index in 0..5 {
            for column in 1..grid.columns() {
                let count = grid.cells[day_index][column];
                if count < min_count {
                    min_count = count;
                    best = (Weekday::ALL[day_index], self.policy.hour_for_column(column));
                }
            }
        }

        if min_count > 0 {
            for day_index in 0..7 {
                for column in 0..grid.columns() {
                    let count = grid.cells[day_index][column];
                    if count < min_count {
                        min_count = count;
                        best = (Weekday::ALL[day_index], self.policy.hour_for_column(column));
                    }
                }
            }
        }

        best
    }
}
