//! Textual wire codec for schedule rules.
//!
//! Grammar: `every(<int>?)` followed by zero or one of
//! `.minutes|.hours|.days|.weeks`, optionally `.<weekday>`, optionally
//! `.at('HH:MM')`. A weekday token implies the week unit even when the
//! `.weeks` token is absent; absent unit and weekday tokens default to
//! `day` for backward compatibility. Stored text is parsed structurally
//! here and never evaluated as code.
//!
//! Week rules with several weekdays are stored as sibling strings, one
//! weekday per string; [`decode_rules`] aggregates them back into one
//! logical rule.

use std::collections::BTreeSet;

use super::{ScheduleRule, TimeOfDay, Unit, Weekday};
use crate::error::{Result, RevisitError};

/// Decode a single wire string into a rule.
pub fn decode(text: &str) -> Result<ScheduleRule> {
    let trimmed = text.trim();
    let rest = trimmed
        .strip_prefix("every(")
        .ok_or_else(|| parse_err(trimmed, "expected every(...)"))?;
    let close = rest
        .find(')')
        .ok_or_else(|| parse_err(trimmed, "unterminated every(...)"))?;
    let inner = &rest[..close];
    let interval = if inner.is_empty() {
        1
    } else {
        inner
            .parse::<u32>()
            .map_err(|_| parse_err(trimmed, "interval is not an integer"))?
    };
    if interval == 0 {
        return Err(parse_err(trimmed, "interval must be positive"));
    }

    let mut unit: Option<Unit> = None;
    let mut weekday: Option<Weekday> = None;
    let mut time: Option<TimeOfDay> = None;

    let mut tail = &rest[close + 1..];
    while let Some(stripped) = tail.strip_prefix('.') {
        let (token, next) = split_token(stripped);
        if let Some(u) = Unit::from_token(token) {
            if unit.is_some() {
                return Err(parse_err(trimmed, "duplicate unit token"));
            }
            unit = Some(u);
        } else if let Some(day) = Weekday::from_token(token) {
            if weekday.is_some() {
                return Err(parse_err(
                    trimmed,
                    "multiple weekdays in one string; store one string per weekday",
                ));
            }
            weekday = Some(day);
        } else if let Some(arg) = token
            .strip_prefix("at('")
            .and_then(|t| t.strip_suffix("')"))
        {
            if time.is_some() {
                return Err(parse_err(trimmed, "duplicate at(...) token"));
            }
            time = Some(arg.parse()?);
        } else {
            return Err(parse_err(trimmed, &format!("unknown token '.{token}'")));
        }
        tail = next;
    }
    if !tail.is_empty() {
        return Err(parse_err(trimmed, "trailing input"));
    }

    if let Some(day) = weekday {
        if matches!(unit, Some(Unit::Minute | Unit::Hour | Unit::Day)) {
            return Err(parse_err(trimmed, "weekday token requires the week unit"));
        }
        if interval != 1 {
            return Err(parse_err(trimmed, "week rules cannot carry an interval"));
        }
        let at = time.ok_or_else(|| parse_err(trimmed, "week rules require at('HH:MM')"))?;
        return Ok(ScheduleRule::weekly([day], at));
    }

    // Absent unit defaults to day for legacy inputs.
    match unit.unwrap_or(Unit::Day) {
        Unit::Week => Err(parse_err(trimmed, "week rules require a weekday")),
        Unit::Day => Ok(ScheduleRule {
            interval,
            unit: Unit::Day,
            weekdays: BTreeSet::new(),
            time_of_day: time,
        }),
        u => {
            if time.is_some() {
                return Err(parse_err(
                    trimmed,
                    "minute/hour rules cannot carry a time of day",
                ));
            }
            Ok(ScheduleRule::every(interval, u))
        }
    }
}

/// Decode a stored rule list into one logical rule.
///
/// A single string decodes directly; multiple sibling strings must all be
/// week rules sharing interval and time, and their weekday sets merge.
pub fn decode_rules(rules: &[String]) -> Result<ScheduleRule> {
    match rules {
        [] => Err(RevisitError::Parse("empty rule list".to_string())),
        [single] => decode(single),
        many => {
            let decoded = many
                .iter()
                .map(|s| decode(s))
                .collect::<Result<Vec<_>>>()?;
            let first = &decoded[0];
            let mut weekdays = BTreeSet::new();
            for rule in &decoded {
                if rule.unit != Unit::Week
                    || rule.interval != first.interval
                    || rule.time_of_day != first.time_of_day
                {
                    return Err(RevisitError::Parse(
                        "sibling rule strings must be week rules sharing interval and time"
                            .to_string(),
                    ));
                }
                weekdays.extend(rule.weekdays.iter().copied());
            }
            Ok(ScheduleRule {
                interval: first.interval,
                unit: Unit::Week,
                weekdays,
                time_of_day: first.time_of_day,
            })
        }
    }
}

/// Encode a rule into its wire strings: one string for minute/hour/day
/// rules, one per selected weekday for week rules.
pub fn encode(rule: &ScheduleRule) -> Vec<String> {
    let interval = if rule.interval > 1 {
        rule.interval.to_string()
    } else {
        String::new()
    };
    let at = rule
        .time_of_day
        .map(|t| format!(".at('{t}')"))
        .unwrap_or_default();
    match rule.unit {
        Unit::Minute | Unit::Hour => {
            vec![format!("every({interval}).{}", rule.unit.token())]
        }
        Unit::Day => vec![format!("every({interval}).days{at}")],
        Unit::Week => rule
            .weekdays
            .iter()
            .map(|day| format!("every().{}{at}", day.token()))
            .collect(),
    }
}

fn parse_err(text: &str, reason: &str) -> RevisitError {
    RevisitError::Parse(format!("'{text}': {reason}"))
}

fn split_token(s: &str) -> (&str, &str) {
    match s.find('.') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}
