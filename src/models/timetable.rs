//! Timetable (solution) model.
//!
//! A timetable is a frozen snapshot of slot assignments for one
//! (course, academic-year) run, plus the conflict records the validator
//! may report against a tentative assignment set. Conflict records are
//! transient validation output, never primary state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::slot::TimeSlot;

/// One scheduled occurrence of a discipline.
///
/// `week_index` is the 0-based ISO-week index within the calendar the
/// assignment was generated against; `date` is the concrete day that
/// occurrence lands on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    /// Discipline this session belongs to.
    pub discipline_id: String,
    /// Recurring weekly placement.
    pub slot: TimeSlot,
    /// Calendar week the occurrence falls in.
    pub week_index: usize,
    /// Concrete date of the occurrence.
    pub date: NaiveDate,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        discipline_id: impl Into<String>,
        slot: TimeSlot,
        week_index: usize,
        date: NaiveDate,
    ) -> Self {
        Self {
            discipline_id: discipline_id.into(),
            slot,
            week_index,
            date,
        }
    }

    /// Session length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        self.slot.duration_minutes()
    }

    /// Whether two assignments collide in time: same calendar week, same
    /// weekday, overlapping time ranges.
    pub fn collides_with(&self, other: &Self) -> bool {
        self.week_index == other.week_index && self.slot.overlaps(&other.slot)
    }
}

/// Frozen assignment snapshot for one pipeline run.
///
/// Produced once per successful run; external code numbers and
/// distributes successive snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Timetable {
    /// Course the timetable was built for.
    pub course: String,
    /// Academic year label (e.g. "2026-2027").
    pub academic_year: String,
    /// All session assignments, in generation order.
    pub assignments: Vec<Assignment>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new(course: impl Into<String>, academic_year: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            academic_year: academic_year.into(),
            assignments: Vec::new(),
        }
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// All assignments for a given discipline, in placement order.
    pub fn assignments_for(&self, discipline_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.discipline_id == discipline_id)
            .collect()
    }

    /// Total scheduled minutes for a discipline.
    pub fn scheduled_minutes_for(&self, discipline_id: &str) -> i64 {
        self.assignments_for(discipline_id)
            .iter()
            .map(|a| a.duration_minutes())
            .sum()
    }

    /// Latest assignment date, if any sessions are scheduled.
    pub fn last_session_date(&self) -> Option<NaiveDate> {
        self.assignments.iter().map(|a| a.date).max()
    }
}

/// Classification of a detected conflict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConflictKind {
    /// Same instructor booked into overlapping sessions.
    InstructorOverlap,
    /// Same room booked into overlapping sessions.
    RoomOverlap,
    /// Same cohort booked into overlapping sessions.
    CohortOverlap,
    /// An assignment landed on a flagged or out-of-range day.
    CalendarViolation,
}

/// A conflict found by validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConflictRecord {
    /// Conflict classification.
    pub kind: ConflictKind,
    /// Assignments involved (two for overlaps, one for calendar
    /// violations).
    pub assignments: Vec<Assignment>,
    /// Human-readable description.
    pub description: String,
}

impl ConflictRecord {
    /// Creates an instructor double-booking record.
    pub fn instructor_overlap(a: &Assignment, b: &Assignment, instructor_id: &str) -> Self {
        Self {
            kind: ConflictKind::InstructorOverlap,
            assignments: vec![a.clone(), b.clone()],
            description: format!(
                "instructor {} double-booked on {} ({} and {})",
                instructor_id, a.date, a.discipline_id, b.discipline_id
            ),
        }
    }

    /// Creates a room double-booking record.
    pub fn room_overlap(a: &Assignment, b: &Assignment, room_id: &str) -> Self {
        Self {
            kind: ConflictKind::RoomOverlap,
            assignments: vec![a.clone(), b.clone()],
            description: format!(
                "room {} double-booked on {} ({} and {})",
                room_id, a.date, a.discipline_id, b.discipline_id
            ),
        }
    }

    /// Creates a cohort double-booking record.
    pub fn cohort_overlap(a: &Assignment, b: &Assignment, cohort_id: &str) -> Self {
        Self {
            kind: ConflictKind::CohortOverlap,
            assignments: vec![a.clone(), b.clone()],
            description: format!(
                "cohort {} double-booked on {} ({} and {})",
                cohort_id, a.date, a.discipline_id, b.discipline_id
            ),
        }
    }

    /// Creates a calendar-violation record.
    pub fn calendar_violation(a: &Assignment, reason: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::CalendarViolation,
            assignments: vec![a.clone()],
            description: format!("{} on {}: {}", a.discipline_id, a.date, reason.into()),
        }
    }
}
