//! Recurrence primitives.
//!
//! Pure date math: given a recurring template (kind, anchor day, end date),
//! computes the next occurrence date and whether the series has terminated.
//! Occurrences are generated lazily by the entry ops, never pre-materialized
//! without bound.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    SpecificDate,
    StartOfMonth,
    EndOfMonth,
}

impl RecurrenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpecificDate => "specific_date",
            Self::StartOfMonth => "start_of_month",
            Self::EndOfMonth => "end_of_month",
        }
    }
}

impl TryFrom<&str> for RecurrenceKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "specific_date" => Ok(Self::SpecificDate),
            "start_of_month" => Ok(Self::StartOfMonth),
            "end_of_month" => Ok(Self::EndOfMonth),
            other => Err(EngineError::Validation(format!(
                "invalid recurring type: {other}"
            ))),
        }
    }
}

/// Recurrence configuration of a template entry.
///
/// `day` is present iff `kind == SpecificDate`. `until` is the optional end
/// date of the series; a series without it is open-ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub kind: RecurrenceKind,
    pub day: Option<u8>,
    pub until: Option<NaiveDate>,
}

impl Recurrence {
    /// Enforces the `day` iff `SpecificDate` invariant and the 1-31 range.
    pub fn validate(&self) -> ResultEngine<()> {
        match (self.kind, self.day) {
            (RecurrenceKind::SpecificDate, None) => Err(EngineError::Validation(
                "recurring_day is required for specific_date".to_string(),
            )),
            (RecurrenceKind::SpecificDate, Some(day)) if !(1..=31).contains(&day) => Err(
                EngineError::Validation(format!("recurring_day must be 1-31, got {day}")),
            ),
            (RecurrenceKind::SpecificDate, Some(_)) => Ok(()),
            (_, Some(_)) => Err(EngineError::Validation(
                "recurring_day is only valid for specific_date".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }

    /// Occurrence dates strictly after `from`, up to and including `through`.
    ///
    /// Stops early when the series expires (`until` reached). The result is
    /// strictly increasing.
    pub fn dates_after(&self, from: NaiveDate, through: NaiveDate) -> ResultEngine<Vec<NaiveDate>> {
        let mut dates = Vec::new();
        let mut current = from;
        loop {
            let next = next_occurrence(current, self.kind, self.day)?;
            if is_series_expired(next, self.until) || next > through {
                return Ok(dates);
            }
            dates.push(next);
            current = next;
        }
    }
}

/// Computes the occurrence following `current` for the given recurrence kind.
///
/// - `StartOfMonth`: first calendar day of the month after `current`.
/// - `EndOfMonth`: last calendar day of the month after `current`.
/// - `SpecificDate`: `day`-th of the month after `current`, clamped to that
///   month's last day (day 31 in February yields Feb 28/29).
pub fn next_occurrence(
    current: NaiveDate,
    kind: RecurrenceKind,
    day: Option<u8>,
) -> ResultEngine<NaiveDate> {
    let (year, month) = month_after(current.year(), current.month());
    let day = match kind {
        RecurrenceKind::StartOfMonth => 1,
        RecurrenceKind::EndOfMonth => days_in_month(year, month),
        RecurrenceKind::SpecificDate => {
            let day = day.ok_or_else(|| {
                EngineError::Validation("recurring_day is required for specific_date".to_string())
            })?;
            if !(1..=31).contains(&day) {
                return Err(EngineError::Validation(format!(
                    "recurring_day must be 1-31, got {day}"
                )));
            }
            u32::from(day).min(days_in_month(year, month))
        }
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| EngineError::Validation(format!("invalid date {year}-{month:02}-{day:02}")))
}

/// True iff the series has an end date and `next` falls past it.
///
/// A series without `recur_until` never expires.
pub fn is_series_expired(next: NaiveDate, recur_until: Option<NaiveDate>) -> bool {
    recur_until.is_some_and(|until| next > until)
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_of_month_is_first_of_next() {
        let next =
            next_occurrence(date(2024, 3, 15), RecurrenceKind::StartOfMonth, None).unwrap();
        assert_eq!(next, date(2024, 4, 1));
    }

    #[test]
    fn end_of_month_is_last_of_next() {
        let next = next_occurrence(date(2024, 3, 15), RecurrenceKind::EndOfMonth, None).unwrap();
        assert_eq!(next, date(2024, 4, 30));
    }

    #[test]
    fn december_rolls_over_to_january() {
        let next =
            next_occurrence(date(2023, 12, 5), RecurrenceKind::StartOfMonth, None).unwrap();
        assert_eq!(next, date(2024, 1, 1));
    }

    #[test]
    fn specific_day_31_clamps_to_month_end() {
        let next =
            next_occurrence(date(2024, 4, 10), RecurrenceKind::SpecificDate, Some(31)).unwrap();
        assert_eq!(next, date(2024, 5, 31));

        // Leap year February.
        let next =
            next_occurrence(date(2024, 1, 31), RecurrenceKind::SpecificDate, Some(31)).unwrap();
        assert_eq!(next, date(2024, 2, 29));

        let next =
            next_occurrence(date(2023, 1, 31), RecurrenceKind::SpecificDate, Some(31)).unwrap();
        assert_eq!(next, date(2023, 2, 28));
    }

    #[test]
    fn specific_day_recovers_after_clamping() {
        // The stored anchor day drives each step, so a clamped February does
        // not drag March down to the 28th.
        let feb = next_occurrence(date(2023, 1, 31), RecurrenceKind::SpecificDate, Some(31))
            .unwrap();
        let mar = next_occurrence(feb, RecurrenceKind::SpecificDate, Some(31)).unwrap();
        assert_eq!(mar, date(2023, 3, 31));
    }

    #[test]
    fn specific_date_requires_day() {
        assert!(next_occurrence(date(2024, 1, 1), RecurrenceKind::SpecificDate, None).is_err());
        assert!(
            next_occurrence(date(2024, 1, 1), RecurrenceKind::SpecificDate, Some(0)).is_err()
        );
        assert!(
            next_occurrence(date(2024, 1, 1), RecurrenceKind::SpecificDate, Some(32)).is_err()
        );
    }

    #[test]
    fn expiry_only_with_end_date() {
        assert!(is_series_expired(date(2024, 7, 1), Some(date(2024, 6, 30))));
        assert!(!is_series_expired(date(2024, 6, 30), Some(date(2024, 6, 30))));
        assert!(!is_series_expired(date(2099, 1, 1), None));
    }

    #[test]
    fn dates_after_honors_until() {
        let rec = Recurrence {
            kind: RecurrenceKind::StartOfMonth,
            day: None,
            until: Some(date(2024, 6, 30)),
        };
        let dates = rec.dates_after(date(2024, 3, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(dates, vec![date(2024, 4, 1), date(2024, 5, 1), date(2024, 6, 1)]);
    }

    #[test]
    fn dates_after_bounded_by_through() {
        let rec = Recurrence {
            kind: RecurrenceKind::EndOfMonth,
            day: None,
            until: None,
        };
        let dates = rec.dates_after(date(2024, 1, 31), date(2024, 3, 31)).unwrap();
        assert_eq!(dates, vec![date(2024, 2, 29), date(2024, 3, 31)]);
    }
}
