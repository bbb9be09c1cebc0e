//! Discipline (course unit) model.
//!
//! A discipline is a unit of teaching load to be timetabled: a required
//! number of teaching hours, the weekdays and time windows it may occupy,
//! and the instructor, room, and cohort identities used for overlap
//! detection.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::slot::TimeWindow;

/// A discipline to be placed on the timetable.
///
/// Invariants (checked by [`validate_disciplines`](crate::validation::validate_disciplines)):
/// `required_hours > 0`, `allowed_weekdays` non-empty, every window's end
/// strictly after its start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discipline {
    /// Unique discipline identifier (e.g. the course-catalog sigla).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Required teaching hours over the academic period.
    pub required_hours: u32,
    /// Weekdays sessions may occupy.
    pub allowed_weekdays: Vec<Weekday>,
    /// Time-of-day windows sessions may occupy.
    pub allowed_windows: Vec<TimeWindow>,
    /// Instructor identity, for double-booking detection.
    pub instructor_id: String,
    /// Room identity, when rooms are modeled.
    pub room_id: Option<String>,
    /// Cohort (class group) identity.
    pub cohort_id: String,
    /// Upper bound on a single session's length, in minutes.
    pub max_session_minutes: i64,
}

impl Discipline {
    /// Creates a new discipline with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            required_hours: 0,
            allowed_weekdays: Vec::new(),
            allowed_windows: Vec::new(),
            instructor_id: String::new(),
            room_id: None,
            cohort_id: String::new(),
            max_session_minutes: 0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the required teaching hours.
    pub fn with_required_hours(mut self, hours: u32) -> Self {
        self.required_hours = hours;
        self
    }

    /// Adds an allowed weekday.
    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        if !self.allowed_weekdays.contains(&weekday) {
            self.allowed_weekdays.push(weekday);
        }
        self
    }

    /// Adds an allowed time window.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.allowed_windows.push(window);
        self
    }

    /// Sets the instructor identity.
    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.instructor_id = instructor_id.into();
        self
    }

    /// Sets the room identity.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// Sets the cohort identity.
    pub fn with_cohort(mut self, cohort_id: impl Into<String>) -> Self {
        self.cohort_id = cohort_id.into();
        self
    }

    /// Sets the maximum session length in minutes.
    pub fn with_max_session_minutes(mut self, minutes: i64) -> Self {
        self.max_session_minutes = minutes;
        self
    }

    /// Required teaching load in minutes.
    #[inline]
    pub fn required_minutes(&self) -> i64 {
        i64::from(self.required_hours) * 60
    }

    /// Allowed weekdays sorted from Monday, duplicates removed.
    ///
    /// Candidate slots are enumerated in this order so generation is
    /// reproducible regardless of input order.
    pub fn sorted_weekdays(&self) -> Vec<Weekday> {
        let mut days = self.allowed_weekdays.clone();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        days
    }

    /// Allowed windows sorted by start then end.
    pub fn sorted_windows(&self) -> Vec<TimeWindow> {
        let mut windows = self.allowed_windows.clone();
        windows.sort_by_key(|w| (w.start, w.end));
        windows.dedup();
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_builder() {
        let d = Discipline::new("CRIM-01")
            .with_name("Introdução à Criminologia")
            .with_required_hours(20)
            .with_weekday(Weekday::Mon)
            .with_weekday(Weekday::Wed)
            .with_window(TimeWindow::new(hm(19, 0), hm(22, 40)))
            .with_instructor("P1")
            .with_room("Sala 3")
            .with_cohort("T2026")
            .with_max_session_minutes(100);

        assert_eq!(d.id, "CRIM-01");
        assert_eq!(d.required_hours, 20);
        assert_eq!(d.required_minutes(), 1200);
        assert_eq!(d.allowed_weekdays, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(d.room_id.as_deref(), Some("Sala 3"));
        assert_eq!(d.max_session_minutes, 100);
    }

    #[test]
    fn test_with_weekday_ignores_duplicates() {
        let d = Discipline::new("X")
            .with_weekday(Weekday::Mon)
            .with_weekday(Weekday::Mon);
        assert_eq!(d.allowed_weekdays.len(), 1);
    }

    #[test]
    fn test_sorted_weekdays_from_monday() {
        let d = Discipline::new("X")
            .with_weekday(Weekday::Sun)
            .with_weekday(Weekday::Wed)
            .with_weekday(Weekday::Mon);
        assert_eq!(
            d.sorted_weekdays(),
            vec![Weekday::Mon, Weekday::Wed, Weekday::Sun]
        );
    }

    #[test]
    fn test_sorted_windows() {
        let d = Discipline::new("X")
            .with_window(TimeWindow::new(hm(21, 0), hm(22, 40)))
            .with_window(TimeWindow::new(hm(19, 0), hm(20, 40)));
        let windows = d.sorted_windows();
        assert_eq!(windows[0].start, hm(19, 0));
        assert_eq!(windows[1].start, hm(21, 0));
    }
}
