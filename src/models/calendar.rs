//! Academic calendar model.
//!
//! A [`Calendar`] is the validated, contiguous day sequence spanning an
//! academic period, with holidays and optional points merged in. It is
//! built once per (course, academic-year) request and immutable after
//! validation succeeds; downstream stages borrow it read-only.
//!
//! # Week Model
//!
//! Weeks are the calendar's distinct ISO weeks in order, indexed from 0.
//! Partial weeks at the edges of the range count; a week is *available*
//! for planning purposes when it contains at least one business day.

use chrono::{Datelike, IsoWeek, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::holiday::{HolidayKind, HolidayRecord};

/// Calendar construction failures. Fatal to the run; no retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The start date is not strictly before the end date.
    #[error("invalid range: start {start} is not before end {end}")]
    InvalidRange {
        /// Requested range start.
        start: NaiveDate,
        /// Requested range end.
        end: NaiveDate,
    },

    /// Two holiday records claim the same date with different kinds.
    #[error("conflicting holiday records for {date}: {first} vs {second}")]
    DuplicateHoliday {
        /// The contested date.
        date: NaiveDate,
        /// Kind of the record seen first.
        first: HolidayKind,
        /// Kind of the conflicting record.
        second: HolidayKind,
    },
}

/// One day of the academic calendar.
///
/// At most one of `is_holiday` / `is_optional_holiday` is true.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CalendarDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Day of week, from the proleptic calendar.
    pub weekday: Weekday,
    /// Mandatory national holiday.
    pub is_holiday: bool,
    /// Optional point ("ponto facultativo").
    pub is_optional_holiday: bool,
    /// Holiday name when one of the flags is set.
    pub holiday_name: Option<String>,
}

impl CalendarDay {
    /// Whether this day is free of holiday flags.
    #[inline]
    pub fn is_plain(&self) -> bool {
        !self.is_holiday && !self.is_optional_holiday
    }
}

/// Validated academic calendar: contiguous days plus the weekend set it
/// was built with.
///
/// Fields are private so the contiguity and exclusivity invariants cannot
/// be broken after [`Calendar::build`] succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct Calendar {
    start: NaiveDate,
    end: NaiveDate,
    days: Vec<CalendarDay>,
    weekend_days: Vec<Weekday>,
    #[serde(skip)]
    weeks: Vec<IsoWeek>,
}

impl Calendar {
    /// Builds and validates a calendar for `[start, end]`.
    ///
    /// Holiday records are merged in by date; identical duplicates are
    /// deduplicated silently, while records that disagree on kind for the
    /// same date are rejected. `weekend_days` is the configured weekend
    /// set used by [`business_day_count`](Self::business_day_count).
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        holidays: &[HolidayRecord],
        weekend_days: &[Weekday],
    ) -> Result<Self, CalendarError> {
        if start >= end {
            return Err(CalendarError::InvalidRange { start, end });
        }

        let mut by_date: BTreeMap<NaiveDate, &HolidayRecord> = BTreeMap::new();
        for record in holidays {
            if let Some(existing) = by_date.get(&record.date) {
                if existing.kind != record.kind {
                    return Err(CalendarError::DuplicateHoliday {
                        date: record.date,
                        first: existing.kind,
                        second: record.kind,
                    });
                }
            } else {
                by_date.insert(record.date, record);
            }
        }

        let mut days = Vec::new();
        let mut weeks: Vec<IsoWeek> = Vec::new();
        let mut current = start;
        loop {
            let record = by_date.get(&current);
            days.push(CalendarDay {
                date: current,
                weekday: current.weekday(),
                is_holiday: matches!(record, Some(r) if r.kind == HolidayKind::National),
                is_optional_holiday: matches!(record, Some(r) if r.kind == HolidayKind::OptionalPoint),
                holiday_name: record.map(|r| r.name.clone()),
            });

            let week = current.iso_week();
            if weeks.last() != Some(&week) {
                weeks.push(week);
            }

            if current == end {
                break;
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break, // end of representable dates
            }
        }

        Ok(Self {
            start,
            end,
            days,
            weekend_days: weekend_days.to_vec(),
            weeks,
        })
    }

    /// Range start.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Range end.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// All days, ascending and contiguous.
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Looks up a day by date.
    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|idx| &self.days[idx])
    }

    /// Whether a day counts as a business day: no holiday flag and not a
    /// configured weekend day.
    pub fn is_business_day(&self, day: &CalendarDay) -> bool {
        day.is_plain() && !self.weekend_days.contains(&day.weekday)
    }

    /// Number of business days in the range.
    pub fn business_day_count(&self) -> usize {
        self.days.iter().filter(|d| self.is_business_day(d)).count()
    }

    /// Number of distinct ISO weeks in the range, partial edge weeks
    /// included.
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Number of distinct ISO weeks containing at least one business day.
    pub fn weeks_available(&self) -> usize {
        self.weeks
            .iter()
            .filter(|week| {
                self.days
                    .iter()
                    .any(|d| d.date.iso_week() == **week && self.is_business_day(d))
            })
            .count()
    }

    /// The 0-based ISO-week index of a date within this calendar.
    pub fn week_index_of(&self, date: NaiveDate) -> Option<usize> {
        let week = date.iso_week();
        self.weeks.iter().position(|w| *w == week)
    }

    /// The day of the `week_index`-th calendar week that falls on
    /// `weekday`, if it lies inside the range.
    pub fn date_on(&self, week_index: usize, weekday: Weekday) -> Option<&CalendarDay> {
        let week = self.weeks.get(week_index)?;
        let date = NaiveDate::from_isoywd_opt(week.year(), week.week(), weekday)?;
        self.day(date)
    }
}
