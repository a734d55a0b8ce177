//! Weekly timetable conflict checks and schedule option selection.

use std::str::FromStr;
use thiserror::Error;

use crate::config::PreferredTime;
use crate::models::ScheduleOption;

/// Errors raised while reading a meeting interval such as "08:00-10:00".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleParseError {
    #[error("Malformed time interval {0:?}: expected \"HH:MM-HH:MM\"")]
    MalformedInterval(String),
}

/// A meeting interval within one day, in minutes since midnight, half-open: `[start, end)`.
///
/// Clock values are not range-checked, so "24:00" is minute 1440. An interval
/// that does not end after it starts covers no time but still clashes with
/// any interval strictly around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: u32,
    pub end: u32,
}

impl TimeInterval {
    /// Two intervals overlap unless one ends at or before the other starts.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }
}

fn parse_minutes(part: &str, whole: &str) -> Result<u32, ScheduleParseError> {
    let malformed = || ScheduleParseError::MalformedInterval(whole.to_string());
    let (hours, minutes) = part.trim().split_once(':').ok_or_else(malformed)?;
    let hours: u32 = hours.trim().parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| malformed())?;
    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(malformed)
}

impl FromStr for TimeInterval {
    type Err = ScheduleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ScheduleParseError::MalformedInterval(s.to_string()))?;
        Ok(Self {
            start: parse_minutes(start, s)?,
            end: parse_minutes(end, s)?,
        })
    }
}

/// Check whether two schedule options can be held in the same term.
///
/// Options on disjoint weekdays are compatible without reading their
/// intervals. Otherwise both intervals are parsed and must not overlap.
pub fn schedules_compatible(
    a: &ScheduleOption,
    b: &ScheduleOption,
) -> Result<bool, ScheduleParseError> {
    if !a.shares_day_with(b) {
        return Ok(true);
    }
    let first = a.interval()?;
    let second = b.interval()?;
    Ok(!first.overlaps(&second))
}

/// Pick a schedule option that fits next to the options already taken.
///
/// Candidates are tried in declared order. With `PreferredTime::Any` the first
/// compatible one wins. Otherwise the first compatible option starting inside
/// the preferred window wins, falling back to the first compatible one.
/// Returns the index of the chosen option, or `None` if every option clashes.
pub fn select_option(
    candidates: &[ScheduleOption],
    taken: &[&ScheduleOption],
    preferred: PreferredTime,
) -> Result<Option<usize>, ScheduleParseError> {
    let mut fallback: Option<usize> = None;

    'candidates: for (idx, candidate) in candidates.iter().enumerate() {
        for existing in taken {
            if !schedules_compatible(candidate, existing)? {
                continue 'candidates;
            }
        }

        if preferred == PreferredTime::Any || preferred.admits(&candidate.interval()?) {
            return Ok(Some(idx));
        }
        fallback.get_or_insert(idx);
    }

    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(days: &[&str], time: &str) -> ScheduleOption {
        ScheduleOption {
            days: days.iter().map(|d| d.to_string()).collect(),
            time: time.to_string(),
        }
    }

    #[test]
    fn test_parse_interval() {
        let interval: TimeInterval = "08:30-10:00".parse().unwrap();
        assert_eq!(interval, TimeInterval { start: 510, end: 600 });

        let spaced: TimeInterval = " 8:05 - 9:15 ".parse().unwrap();
        assert_eq!(spaced, TimeInterval { start: 485, end: 555 });
    }

    #[test]
    fn test_midnight_end_is_minute_1440() {
        let late: TimeInterval = "20:00-24:00".parse().unwrap();
        assert_eq!(late, TimeInterval { start: 1200, end: 1440 });

        let a = option(&["Lunes"], "20:00-24:00");
        let b = option(&["Lunes"], "08:00-10:00");
        let c = option(&["Lunes"], "23:00-23:30");
        assert_eq!(schedules_compatible(&a, &b), Ok(true));
        assert_eq!(schedules_compatible(&a, &c), Ok(false));
    }

    #[test]
    fn test_zero_length_interval_is_not_an_error() {
        let empty: TimeInterval = "12:00-12:00".parse().unwrap();
        assert_eq!(empty, TimeInterval { start: 720, end: 720 });

        let point = option(&["Lunes"], "12:00-12:00");
        let around = option(&["Lunes"], "11:00-13:00");
        let before = option(&["Lunes"], "10:00-12:00");
        assert_eq!(schedules_compatible(&point, &around), Ok(false));
        assert_eq!(schedules_compatible(&point, &before), Ok(true));
    }

    #[test]
    fn test_parse_interval_errors() {
        assert_eq!(
            "08:00".parse::<TimeInterval>(),
            Err(ScheduleParseError::MalformedInterval("08:00".to_string()))
        );
        assert_eq!(
            "8-10".parse::<TimeInterval>(),
            Err(ScheduleParseError::MalformedInterval("8-10".to_string()))
        );
        assert_eq!(
            "aa:00-10:00".parse::<TimeInterval>(),
            Err(ScheduleParseError::MalformedInterval("aa:00-10:00".to_string()))
        );
        assert_eq!(
            "08:00-10:5x".parse::<TimeInterval>(),
            Err(ScheduleParseError::MalformedInterval("08:00-10:5x".to_string()))
        );
    }

    #[test]
    fn test_disjoint_days_are_compatible_without_parsing() {
        let a = option(&["Lunes"], "not a time");
        let b = option(&["Martes"], "08:00-10:00");
        assert_eq!(schedules_compatible(&a, &b), Ok(true));
    }

    #[test]
    fn test_overlap_on_shared_day_conflicts() {
        let a = option(&["Lunes", "Miércoles"], "08:00-10:00");
        let b = option(&["Miércoles"], "09:30-11:00");
        assert_eq!(schedules_compatible(&a, &b), Ok(false));
        assert_eq!(schedules_compatible(&b, &a), Ok(false));
    }

    #[test]
    fn test_touching_boundaries_do_not_conflict() {
        let a = option(&["Lunes"], "08:00-10:00");
        let b = option(&["Lunes"], "10:00-12:00");
        assert_eq!(schedules_compatible(&a, &b), Ok(true));
        assert_eq!(schedules_compatible(&b, &a), Ok(true));
    }

    #[test]
    fn test_contained_interval_conflicts() {
        let a = option(&["Viernes"], "08:00-12:00");
        let b = option(&["Viernes"], "09:00-10:00");
        assert_eq!(schedules_compatible(&a, &b), Ok(false));
    }

    #[test]
    fn test_malformed_interval_on_shared_day_is_error() {
        let a = option(&["Lunes"], "08:00 to 10:00");
        let b = option(&["Lunes"], "08:00-10:00");
        assert!(matches!(
            schedules_compatible(&a, &b),
            Err(ScheduleParseError::MalformedInterval(_))
        ));
    }

    #[test]
    fn test_select_first_compatible_option() {
        let taken = option(&["Lunes"], "08:00-10:00");
        let candidates = vec![
            option(&["Lunes"], "09:00-11:00"),
            option(&["Lunes"], "10:00-12:00"),
            option(&["Martes"], "08:00-10:00"),
        ];
        assert_eq!(
            select_option(&candidates, &[&taken], PreferredTime::Any),
            Ok(Some(1))
        );
    }

    #[test]
    fn test_select_none_when_all_clash() {
        let taken = option(&["Lunes"], "08:00-12:00");
        let candidates = vec![
            option(&["Lunes"], "09:00-11:00"),
            option(&["Lunes"], "11:00-13:00"),
        ];
        assert_eq!(
            select_option(&candidates, &[&taken], PreferredTime::Any),
            Ok(None)
        );
    }

    #[test]
    fn test_select_with_no_taken_options() {
        let candidates = vec![option(&["Lunes"], "09:00-11:00")];
        assert_eq!(select_option(&candidates, &[], PreferredTime::Any), Ok(Some(0)));
        assert_eq!(select_option(&[], &[], PreferredTime::Any), Ok(None));
    }

    #[test]
    fn test_preferred_window_wins_over_declared_order() {
        let candidates = vec![
            option(&["Lunes"], "08:00-10:00"),
            option(&["Martes"], "19:00-21:00"),
        ];
        assert_eq!(
            select_option(&candidates, &[], PreferredTime::Evening),
            Ok(Some(1))
        );
        assert_eq!(
            select_option(&candidates, &[], PreferredTime::Morning),
            Ok(Some(0))
        );
    }

    #[test]
    fn test_preferred_window_falls_back_to_first_compatible() {
        let taken = option(&["Lunes"], "08:00-10:00");
        let candidates = vec![
            option(&["Lunes"], "08:30-09:30"),
            option(&["Martes"], "14:00-16:00"),
            option(&["Jueves"], "15:00-17:00"),
        ];
        assert_eq!(
            select_option(&candidates, &[&taken], PreferredTime::Evening),
            Ok(Some(1))
        );
    }
}
