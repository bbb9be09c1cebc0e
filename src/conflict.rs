//! Conflict detection over tentative assignment sets.
//!
//! Performs a full pass, never fail-fast: the caller needs every
//! conflict at once to decide whether to retry generation with the
//! conflicting slots excluded.
//!
//! Two assignments conflict when they share a calendar week and weekday,
//! their time ranges overlap, and their disciplines share an instructor,
//! a room, or a cohort — one record per shared dimension. Every
//! assignment is additionally rechecked against the calendar, catching
//! occurrences that landed on flagged or out-of-range days.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Assignment, Calendar, ConflictRecord, Discipline};

/// Detects all conflicts in a tentative assignment set.
///
/// Record order is deterministic: pairwise overlaps in assignment index
/// order (instructor, then room, then cohort per pair), followed by
/// calendar rechecks in assignment order.
pub fn detect_conflicts(
    assignments: &[Assignment],
    disciplines: &[Discipline],
    calendar: &Calendar,
) -> Vec<ConflictRecord> {
    let by_id: HashMap<&str, &Discipline> =
        disciplines.iter().map(|d| (d.id.as_str(), d)).collect();

    let mut conflicts = Vec::new();

    for (i, a) in assignments.iter().enumerate() {
        for b in &assignments[i + 1..] {
            if !a.collides_with(b) {
                continue;
            }
            let (Some(da), Some(db)) = (
                by_id.get(a.discipline_id.as_str()),
                by_id.get(b.discipline_id.as_str()),
            ) else {
                continue;
            };

            if da.instructor_id == db.instructor_id {
                conflicts.push(ConflictRecord::instructor_overlap(a, b, &da.instructor_id));
            }
            if let (Some(room_a), Some(room_b)) = (da.room_id.as_deref(), db.room_id.as_deref()) {
                if room_a == room_b {
                    conflicts.push(ConflictRecord::room_overlap(a, b, room_a));
                }
            }
            if da.cohort_id == db.cohort_id {
                conflicts.push(ConflictRecord::cohort_overlap(a, b, &da.cohort_id));
            }
        }
    }

    // Defensive recheck: generation should never land on a flagged day,
    // but a stale calendar or hand-edited assignment set can.
    for assignment in assignments {
        match calendar.day(assignment.date) {
            None => {
                conflicts.push(ConflictRecord::calendar_violation(
                    assignment,
                    "date outside the calendar range",
                ));
            }
            Some(day) if day.weekday != assignment.slot.weekday => {
                conflicts.push(ConflictRecord::calendar_violation(
                    assignment,
                    format!("date falls on {}, slot expects {}", day.weekday, assignment.slot.weekday),
                ));
            }
            Some(day) if !day.is_plain() => {
                let name = day.holiday_name.as_deref().unwrap_or("unnamed");
                let kind = if day.is_holiday {
                    "holiday"
                } else {
                    "optional point"
                };
                conflicts.push(ConflictRecord::calendar_violation(
                    assignment,
                    format!("{kind}: {name}"),
                ));
            }
            Some(_) => {}
        }
    }

    debug!(
        assignments = assignments.len(),
        conflicts = conflicts.len(),
        "conflict detection pass complete"
    );

    conflicts
}
