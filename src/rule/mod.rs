//! Schedule rule representation and validation.
//!
//! A [`ScheduleRule`] describes when a note reminder recurs: an interval,
//! a unit, an optional weekday set (week rules) and an optional time of
//! day (day and week rules). The textual wire form lives in [`codec`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RevisitError};

pub mod codec;

/// Recurrence unit of a schedule rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Minute,
    Hour,
    Day,
    Week,
}

impl Unit {
    /// Plural token used in the wire grammar.
    pub fn token(&self) -> &'static str {
        match self {
            Unit::Minute => "minutes",
            Unit::Hour => "hours",
            Unit::Day => "days",
            Unit::Week => "weeks",
        }
    }

    /// Parse a wire-grammar unit token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "minutes" => Some(Unit::Minute),
            "hours" => Some(Unit::Hour),
            "days" => Some(Unit::Day),
            "weeks" => Some(Unit::Week),
            _ => None,
        }
    }
}

/// Day of week, monday-first to match the occupancy grid rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in grid row order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Lowercase token used in the wire grammar.
    pub fn token(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Parse a wire-grammar weekday token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.token() == token)
    }

    /// Grid row index (monday = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub(crate) fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Time of day carried by day- and week-unit rules.
///
/// Hours and minutes are range-checked on construction; an out-of-range
/// wire value is a parse error, never passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(RevisitError::Parse(format!(
                "time of day out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = RevisitError;

    /// Parse `HH:MM`. Leading zeros are optional; values are plain integers.
    fn from_str(s: &str) -> Result<Self> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| RevisitError::Parse(format!("expected HH:MM, got '{s}'")))?;
        let hour = hour
            .parse::<u8>()
            .map_err(|_| RevisitError::Parse(format!("bad hour in '{s}'")))?;
        let minute = minute
            .parse::<u8>()
            .map_err(|_| RevisitError::Parse(format!("bad minute in '{s}'")))?;
        Self::new(hour, minute)
    }
}

/// A recurrence specification for one note reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    /// Repeat interval; meaningful for minute/hour/day, fixed at 1 for week.
    pub interval: u32,
    pub unit: Unit,
    /// Selected weekdays; non-empty iff unit is week.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub weekdays: BTreeSet<Weekday>,
    /// Fire time; required for week, required for day at the save boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
}

impl ScheduleRule {
    /// Interval-only rule (`minute` or `hour` unit).
    pub fn every(interval: u32, unit: Unit) -> Self {
        Self {
            interval,
            unit,
            weekdays: BTreeSet::new(),
            time_of_day: None,
        }
    }

    /// Rule firing every `interval` days at a fixed time.
    pub fn daily(interval: u32, at: TimeOfDay) -> Self {
        Self {
            interval,
            unit: Unit::Day,
            weekdays: BTreeSet::new(),
            time_of_day: Some(at),
        }
    }

    /// Rule firing on the given weekdays at a fixed time.
    pub fn weekly(days: impl IntoIterator<Item = Weekday>, at: TimeOfDay) -> Self {
        Self {
            interval: 1,
            unit: Unit::Week,
            weekdays: days.into_iter().collect(),
            time_of_day: Some(at),
        }
    }

    /// Enforce the schedule invariants at the save boundary. Rules failing
    /// this check are rejected before they reach the codec or the store.
    pub fn validate(&self) -> Result<()> {
        if self.interval == 0 {
            return Err(RevisitError::InvalidRule(
                "interval must be a positive integer".to_string(),
            ));
        }
        match self.unit {
            Unit::Week => {
                if self.weekdays.is_empty() {
                    return Err(RevisitError::InvalidRule(
                        "week rules require at least one weekday".to_string(),
                    ));
                }
                if self.time_of_day.is_none() {
                    return Err(RevisitError::InvalidRule(
                        "week rules require a time of day".to_string(),
                    ));
                }
                if self.interval != 1 {
                    return Err(RevisitError::InvalidRule(
                        "week rules cannot have a multi-week interval".to_string(),
                    ));
                }
            }
            Unit::Day => {
                if self.time_of_day.is_none() {
                    return Err(RevisitError::InvalidRule(
                        "day rules require a time of day".to_string(),
                    ));
                }
                if !self.weekdays.is_empty() {
                    return Err(RevisitError::InvalidRule(
                        "day rules cannot select weekdays".to_string(),
                    ));
                }
            }
            Unit::Minute | Unit::Hour => {
                if !self.weekdays.is_empty() || self.time_of_day.is_some() {
                    return Err(RevisitError::InvalidRule(
                        "minute/hour rules cannot carry weekdays or a time of day".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_token_roundtrip() {
        for unit in [Unit::Minute, Unit::Hour, Unit::Day, Unit::Week] {
            assert_eq!(Unit::from_token(unit.token()), Some(unit));
        }
        assert_eq!(Unit::from_token("fortnights"), None);
    }

    #[test]
    fn test_weekday_token_roundtrip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_token(day.token()), Some(day));
        }
        assert_eq!(Weekday::from_token("funday"), None);
    }

    #[test]
    fn test_weekday_index_monday_first() {
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
    }

    #[test]
    fn test_time_of_day_display_zero_padded() {
        let t = TimeOfDay::new(9, 5).unwrap();
        assert_eq!(t.to_string(), "09:05");
    }

    #[test]
    fn test_time_of_day_parse() {
        let t: TimeOfDay = "10:30".parse().unwrap();
        assert_eq!(t, TimeOfDay::new(10, 30).unwrap());
        // Unpadded input is accepted
        let t: TimeOfDay = "9:05".parse().unwrap();
        assert_eq!(t, TimeOfDay::new(9, 5).unwrap());
    }

    #[test]
    fn test_time_of_day_out_of_range_rejected() {
        assert!(TimeOfDay::new(24, 0).is_err());
        assert!(TimeOfDay::new(99, 0).is_err());
        assert!(TimeOfDay::new(12, 60).is_err());
        assert!("99:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_validate_interval_positive() {
        let rule = ScheduleRule::every(0, Unit::Hour);
        assert!(matches!(rule.validate(), Err(RevisitError::InvalidRule(_))));
    }

    #[test]
    fn test_validate_week_requires_weekday() {
        let rule = ScheduleRule::weekly([], TimeOfDay::new(10, 30).unwrap());
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_validate_week_requires_time() {
        let mut rule = ScheduleRule::weekly([Weekday::Monday], TimeOfDay::new(10, 30).unwrap());
        rule.time_of_day = None;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_validate_week_interval_fixed_at_one() {
        let mut rule = ScheduleRule::weekly([Weekday::Monday], TimeOfDay::new(10, 30).unwrap());
        rule.interval = 2;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_validate_day_requires_time() {
        let rule = ScheduleRule::every(1, Unit::Day);
        assert!(rule.validate().is_err());
        let rule = ScheduleRule::daily(1, TimeOfDay::new(8, 0).unwrap());
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_validate_hour_rejects_time() {
        let mut rule = ScheduleRule::every(2, Unit::Hour);
        assert!(rule.validate().is_ok());
        rule.time_of_day = Some(TimeOfDay::new(10, 0).unwrap());
        assert!(rule.validate().is_err());
    }
}
