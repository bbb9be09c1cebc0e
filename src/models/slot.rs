//! Time window and weekly slot models.
//!
//! A [`TimeWindow`] is a time-of-day range a discipline may occupy
//! (e.g. 19:00–22:40). A [`TimeSlot`] pins a window down to a weekday
//! and a concrete session length — the recurring weekly placement unit,
//! independent of which calendar week it lands in.
//!
//! # Ordering
//!
//! `TimeSlot` carries a total order (weekday from Monday, then start,
//! then end) so that exclusion sets and candidate iteration are
//! reproducible across runs.

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A time-of-day interval [start, end).
///
/// Half-open: a session may start at `start` and must end by `end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Window length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether this window is well-formed (end strictly after start).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Whether a session of the given length fits inside this window.
    #[inline]
    pub fn fits(&self, minutes: i64) -> bool {
        minutes > 0 && minutes <= self.duration_minutes()
    }

    /// Whether two windows overlap in time-of-day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A recurring weekly placement: weekday plus a concrete time range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    /// Day of week this slot recurs on.
    pub weekday: Weekday,
    /// Session start time.
    pub start: NaiveTime,
    /// Session end time.
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Creates a new slot.
    pub fn new(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            weekday,
            start,
            end,
        }
    }

    /// Creates a slot at the start of a window with the given session length.
    ///
    /// Returns `None` if the session does not fit in the window.
    pub fn at_window_start(weekday: Weekday, window: &TimeWindow, minutes: i64) -> Option<Self> {
        if !window.fits(minutes) {
            return None;
        }
        Some(Self {
            weekday,
            start: window.start,
            end: window.start + Duration::minutes(minutes),
        })
    }

    /// Session length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether two slots collide: same weekday and overlapping time ranges.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.weekday == other.weekday && self.start < other.end && other.start < self.end
    }
}

impl Ord for TimeSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weekday
            .num_days_from_monday()
            .cmp(&other.weekday.num_days_from_monday())
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl PartialOrd for TimeSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_window_duration() {
        let w = TimeWindow::new(hm(19, 0), hm(22, 40));
        assert_eq!(w.duration_minutes(), 220);
        assert!(w.is_valid());
        assert!(w.fits(100));
        assert!(w.fits(220));
        assert!(!w.fits(221));
        assert!(!w.fits(0));
    }

    #[test]
    fn test_window_invalid() {
        let w = TimeWindow::new(hm(20, 0), hm(19, 0));
        assert!(!w.is_valid());
    }

    #[test]
    fn test_window_overlap() {
        let a = TimeWindow::new(hm(19, 0), hm(20, 40));
        let b = TimeWindow::new(hm(20, 0), hm(21, 40));
        let c = TimeWindow::new(hm(20, 40), hm(22, 20)); // touching, not overlapping
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_slot_at_window_start() {
        let w = TimeWindow::new(hm(19, 0), hm(22, 40));
        let slot = TimeSlot::at_window_start(Weekday::Mon, &w, 100).unwrap();
        assert_eq!(slot.start, hm(19, 0));
        assert_eq!(slot.end, hm(20, 40));
        assert_eq!(slot.duration_minutes(), 100);

        // Session longer than the window
        assert!(TimeSlot::at_window_start(Weekday::Mon, &w, 300).is_none());
    }

    #[test]
    fn test_slot_overlap_requires_same_weekday() {
        let a = TimeSlot::new(Weekday::Mon, hm(19, 0), hm(20, 40));
        let b = TimeSlot::new(Weekday::Mon, hm(20, 0), hm(21, 40));
        let c = TimeSlot::new(Weekday::Wed, hm(19, 0), hm(20, 40));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_slot_ordering() {
        let mon_early = TimeSlot::new(Weekday::Mon, hm(19, 0), hm(20, 40));
        let mon_late = TimeSlot::new(Weekday::Mon, hm(21, 0), hm(22, 40));
        let sun = TimeSlot::new(Weekday::Sun, hm(8, 0), hm(9, 40));
        assert!(mon_early < mon_late);
        assert!(mon_late < sun); // Sunday sorts last (week starts Monday)

        let mut slots = vec![sun, mon_late, mon_early];
        slots.sort();
        assert_eq!(slots, vec![mon_early, mon_late, sun]);
    }
}
