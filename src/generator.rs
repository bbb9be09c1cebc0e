//! Deterministic greedy timetable generation.
//!
//! # Algorithm
//!
//! 1. Order disciplines by descending required hours, ties by id.
//! 2. For each discipline, enumerate candidate slots from
//!    `allowed_weekdays × allowed_windows`, skipping excluded slots and
//!    windows too short for the planned session length.
//! 3. For each planned session, pick the least-loaded candidate, where
//!    load counts sessions already placed on that weekday for the same
//!    cohort; ties resolve to the earliest start time, then the earliest
//!    weekday from Monday.
//! 4. Map each chosen slot onto concrete calendar weeks, skipping weeks
//!    where that weekday is flagged holiday/optional or falls outside
//!    the range.
//!
//! Re-running with identical inputs yields an identical assignment
//! vector — determinism is a contract here, not an accident: candidate
//! enumeration, the load tie-break, and week walking all follow total
//! orders.
//!
//! # Complexity
//! O(d × s × c + d × c × w) where d=disciplines, s=sessions/discipline,
//! c=candidate slots, w=calendar weeks.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Weekday;
use thiserror::Error;
use tracing::debug;

use crate::analysis::SessionPlan;
use crate::models::{Assignment, Calendar, Discipline, TimeSlot};

/// Generation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A discipline could not place all its sessions before the calendar
    /// (or its candidate slot set) was exhausted.
    #[error("no feasible slot for discipline {discipline_id}: placed {placed} of {required} sessions")]
    NoFeasibleSlot {
        /// Discipline that could not be placed.
        discipline_id: String,
        /// Sessions successfully placed before exhaustion.
        placed: u32,
        /// Sessions the plan requires.
        required: u32,
    },
}

/// Deterministic greedy slot allocator.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use std::collections::BTreeSet;
/// use timetable::analysis::SessionPlan;
/// use timetable::generator::ScheduleGenerator;
/// use timetable::models::{Calendar, Discipline, TimeWindow};
///
/// let calendar = Calendar::build(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
///     &[],
///     &[Weekday::Sat, Weekday::Sun],
/// )
/// .unwrap();
/// let discipline = Discipline::new("Intro")
///     .with_required_hours(5)
///     .with_weekday(Weekday::Mon)
///     .with_window(TimeWindow::new(
///         NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(20, 40, 0).unwrap(),
///     ))
///     .with_instructor("P1")
///     .with_cohort("T1")
///     .with_max_session_minutes(100);
/// let plan = SessionPlan {
///     discipline_id: "Intro".into(),
///     session_count: 3,
///     session_minutes: 100,
/// };
///
/// let generator = ScheduleGenerator::new();
/// let assignments = generator
///     .generate(&[plan], &[discipline], &calendar, &BTreeSet::new())
///     .unwrap();
/// assert_eq!(assignments.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    /// Creates a new generator.
    pub fn new() -> Self {
        Self
    }

    /// Produces a tentative assignment set for every planned discipline.
    ///
    /// `excluded` slots are never offered as candidates; the retry loop
    /// grows this set from conflicting slots between attempts.
    pub fn generate(
        &self,
        plans: &[SessionPlan],
        disciplines: &[Discipline],
        calendar: &Calendar,
        excluded: &BTreeSet<TimeSlot>,
    ) -> Result<Vec<Assignment>, GenerationError> {
        let plan_by_id: HashMap<&str, &SessionPlan> = plans
            .iter()
            .map(|p| (p.discipline_id.as_str(), p))
            .collect();

        // Largest teaching load first; ties fall back to the id so the
        // processing order is a total order.
        let mut ordered: Vec<&Discipline> = disciplines
            .iter()
            .filter(|d| plan_by_id.contains_key(d.id.as_str()))
            .collect();
        ordered.sort_by(|a, b| {
            b.required_hours
                .cmp(&a.required_hours)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut cohort_load: HashMap<(&str, Weekday), u32> = HashMap::new();
        let mut assignments = Vec::new();

        for discipline in ordered {
            let plan = plan_by_id[discipline.id.as_str()];
            let placed = self.place_discipline(discipline, plan, calendar, excluded, &mut cohort_load)?;
            assignments.extend(placed);
        }

        Ok(assignments)
    }

    /// Places all sessions of one discipline.
    fn place_discipline<'a>(
        &self,
        discipline: &'a Discipline,
        plan: &SessionPlan,
        calendar: &Calendar,
        excluded: &BTreeSet<TimeSlot>,
        cohort_load: &mut HashMap<(&'a str, Weekday), u32>,
    ) -> Result<Vec<Assignment>, GenerationError> {
        let candidates = candidate_slots(discipline, plan.session_minutes, excluded);
        if candidates.is_empty() {
            return Err(GenerationError::NoFeasibleSlot {
                discipline_id: discipline.id.clone(),
                placed: 0,
                required: plan.session_count,
            });
        }

        // Distribute sessions across candidates by cohort weekday load.
        let mut occurrence_counts: BTreeMap<TimeSlot, u32> = BTreeMap::new();
        for _ in 0..plan.session_count {
            let slot = pick_least_loaded(&candidates, &discipline.cohort_id, cohort_load);
            *occurrence_counts.entry(slot).or_insert(0) += 1;
            *cohort_load
                .entry((discipline.cohort_id.as_str(), slot.weekday))
                .or_insert(0) += 1;
        }

        // Walk the calendar week by week for each chosen slot.
        let mut placed = Vec::new();
        for (slot, count) in &occurrence_counts {
            let mut remaining = *count;
            for week_index in 0..calendar.week_count() {
                if remaining == 0 {
                    break;
                }
                let Some(day) = calendar.date_on(week_index, slot.weekday) else {
                    continue;
                };
                if !day.is_plain() {
                    debug!(
                        discipline = %discipline.id,
                        date = %day.date,
                        holiday = day.holiday_name.as_deref().unwrap_or(""),
                        "skipping flagged day"
                    );
                    continue;
                }
                placed.push(Assignment::new(
                    discipline.id.as_str(),
                    *slot,
                    week_index,
                    day.date,
                ));
                remaining -= 1;
            }
            if remaining > 0 {
                return Err(GenerationError::NoFeasibleSlot {
                    discipline_id: discipline.id.clone(),
                    placed: placed.len() as u32,
                    required: plan.session_count,
                });
            }
        }

        placed.sort_by(|a, b| a.week_index.cmp(&b.week_index).then_with(|| a.slot.cmp(&b.slot)));

        debug!(
            discipline = %discipline.id,
            sessions = placed.len(),
            "placed discipline"
        );

        Ok(placed)
    }
}

/// Enumerates candidate slots in canonical order (weekday from Monday,
/// then window start).
fn candidate_slots(
    discipline: &Discipline,
    session_minutes: i64,
    excluded: &BTreeSet<TimeSlot>,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for weekday in discipline.sorted_weekdays() {
        for window in discipline.sorted_windows() {
            if let Some(slot) = TimeSlot::at_window_start(weekday, &window, session_minutes) {
                if !excluded.contains(&slot) {
                    slots.push(slot);
                }
            }
        }
    }
    slots
}

/// Picks the candidate with the lowest cohort load on its weekday.
///
/// Equal loads resolve to the earliest start time; equal starts resolve
/// to the earliest weekday, because candidates arrive weekday-major.
fn pick_least_loaded(
    candidates: &[TimeSlot],
    cohort_id: &str,
    cohort_load: &HashMap<(&str, Weekday), u32>,
) -> TimeSlot {
    let mut best = candidates[0];
    let mut best_load = load_of(&best, cohort_id, cohort_load);
    for slot in &candidates[1..] {
        let load = load_of(slot, cohort_id, cohort_load);
        if load < best_load || (load == best_load && slot.start < best.start) {
            best = *slot;
            best_load = load;
        }
    }
    best
}

fn load_of(slot: &TimeSlot, cohort_id: &str, cohort_load: &HashMap<(&str, Weekday), u32>) -> u32 {
    cohort_load
        .get(&(cohort_id, slot.weekday))
        .copied()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HolidayRecord, TimeWindow};
    use chrono::{NaiveDate, NaiveTime};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn semester() -> Calendar {
        let holidays = vec![
            HolidayRecord::national(ymd(2026, 4, 21), "Tiradentes"),
            HolidayRecord::optional(ymd(2026, 4, 17), "Ponto Facultativo"),
        ];
        Calendar::build(
            ymd(2026, 3, 1),
            ymd(2026, 6, 30),
            &holidays,
            &[Weekday::Sat, Weekday::Sun],
        )
        .unwrap()
    }

    fn evening_discipline(id: &str, hours: u32) -> Discipline {
        Discipline::new(id)
            .with_required_hours(hours)
            .with_weekday(Weekday::Mon)
            .with_weekday(Weekday::Wed)
            .with_window(TimeWindow::new(hm(19, 0), hm(22, 40)))
            .with_instructor("P1")
            .with_cohort("T1")
            .with_max_session_minutes(100)
    }

    fn plan(id: &str, count: u32, minutes: i64) -> SessionPlan {
        SessionPlan {
            discipline_id: id.into(),
            session_count: count,
            session_minutes: minutes,
        }
    }

    #[test]
    fn test_single_discipline_balances_weekdays() {
        let d = evening_discipline("Intro", 20);
        let assignments = ScheduleGenerator::new()
            .generate(&[plan("Intro", 12, 100)], &[d], &semester(), &BTreeSet::new())
            .unwrap();

        assert_eq!(assignments.len(), 12);
        let mondays = assignments
            .iter()
            .filter(|a| a.slot.weekday == Weekday::Mon)
            .count();
        let wednesdays = assignments
            .iter()
            .filter(|a| a.slot.weekday == Weekday::Wed)
            .count();
        assert_eq!(mondays, 6);
        assert_eq!(wednesdays, 6);

        // First occurrence lands on the first in-range Monday.
        assert_eq!(assignments[0].date, ymd(2026, 3, 2));
        assert_eq!(assignments[0].slot.start, hm(19, 0));
        assert_eq!(assignments[0].slot.end, hm(20, 40));
    }

    #[test]
    fn test_deterministic_regeneration() {
        let d = evening_discipline("Intro", 20);
        let generator = ScheduleGenerator::new();
        let first = generator
            .generate(
                &[plan("Intro", 12, 100)],
                std::slice::from_ref(&d),
                &semester(),
                &BTreeSet::new(),
            )
            .unwrap();
        let second = generator
            .generate(
                &[plan("Intro", 12, 100)],
                std::slice::from_ref(&d),
                &semester(),
                &BTreeSet::new(),
            )
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_excluded_slot_is_skipped() {
        let d = evening_discipline("Intro", 20);
        let mut excluded = BTreeSet::new();
        excluded.insert(TimeSlot::new(Weekday::Mon, hm(19, 0), hm(20, 40)));

        let assignments = ScheduleGenerator::new()
            .generate(&[plan("Intro", 12, 100)], &[d], &semester(), &excluded)
            .unwrap();
        assert!(assignments.iter().all(|a| a.slot.weekday == Weekday::Wed));
        assert_eq!(assignments.len(), 12);
    }

    #[test]
    fn test_holiday_week_skipped_for_that_weekday() {
        // Tuesdays hit Tiradentes (2026-04-21) in week 8.
        let mut d = evening_discipline("Penal", 15);
        d.allowed_weekdays = vec![Weekday::Tue];

        let assignments = ScheduleGenerator::new()
            .generate(&[plan("Penal", 9, 100)], &[d], &semester(), &BTreeSet::new())
            .unwrap();
        assert_eq!(assignments.len(), 9);
        assert!(assignments.iter().all(|a| a.date != ymd(2026, 4, 21)));
        // The occurrence after 2026-04-14 jumps the holiday week.
        assert!(assignments.iter().any(|a| a.date == ymd(2026, 4, 28)));
    }

    #[test]
    fn test_optional_holiday_also_skipped() {
        let mut d = evening_discipline("Fri", 8);
        d.allowed_weekdays = vec![Weekday::Fri];

        let assignments = ScheduleGenerator::new()
            .generate(&[plan("Fri", 7, 100)], &[d], &semester(), &BTreeSet::new())
            .unwrap();
        assert!(assignments.iter().all(|a| a.date != ymd(2026, 4, 17)));
        assert_eq!(assignments.last().unwrap().date, ymd(2026, 4, 24));
    }

    #[test]
    fn test_largest_load_first_ties_by_id() {
        let a = evening_discipline("B-course", 10).with_cohort("T-b");
        let b = evening_discipline("A-course", 10).with_cohort("T-a");
        let plans = vec![plan("B-course", 3, 100), plan("A-course", 3, 100)];

        let assignments = ScheduleGenerator::new()
            .generate(&plans, &[a, b], &semester(), &BTreeSet::new())
            .unwrap();
        // Equal hours: lexicographically smaller id is processed first.
        assert_eq!(assignments[0].discipline_id, "A-course");
    }

    #[test]
    fn test_cohort_load_carries_across_disciplines() {
        let big = evening_discipline("Big", 20);
        let small = evening_discipline("Small", 10);
        let plans = vec![plan("Big", 12, 100), plan("Small", 6, 100)];

        let assignments = ScheduleGenerator::new()
            .generate(&plans, &[big, small], &semester(), &BTreeSet::new())
            .unwrap();
        let small_mon = assignments
            .iter()
            .filter(|a| a.discipline_id == "Small" && a.slot.weekday == Weekday::Mon)
            .count();
        let small_wed = assignments
            .iter()
            .filter(|a| a.discipline_id == "Small" && a.slot.weekday == Weekday::Wed)
            .count();
        // "Big" leaves both weekdays equally loaded, so "Small" still
        // alternates instead of piling onto one day.
        assert_eq!(small_mon, 3);
        assert_eq!(small_wed, 3);
    }

    #[test]
    fn test_window_too_short_yields_no_candidates() {
        let mut d = evening_discipline("Short", 5);
        d.allowed_windows = vec![TimeWindow::new(hm(19, 0), hm(19, 30))];

        let err = ScheduleGenerator::new()
            .generate(&[plan("Short", 3, 100)], &[d], &semester(), &BTreeSet::new())
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::NoFeasibleSlot {
                discipline_id: "Short".into(),
                placed: 0,
                required: 3,
            }
        );
    }

    #[test]
    fn test_calendar_exhaustion() {
        // Two in-range Mondays only (2026-03-02 and 2026-03-09).
        let calendar = Calendar::build(
            ymd(2026, 3, 2),
            ymd(2026, 3, 13),
            &[],
            &[Weekday::Sat, Weekday::Sun],
        )
        .unwrap();
        let mut d = evening_discipline("Tight", 5);
        d.allowed_weekdays = vec![Weekday::Mon];

        let err = ScheduleGenerator::new()
            .generate(&[plan("Tight", 3, 100)], &[d], &calendar, &BTreeSet::new())
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::NoFeasibleSlot {
                discipline_id: "Tight".into(),
                placed: 2,
                required: 3,
            }
        );
    }

    #[test]
    fn test_disciplines_without_plans_are_skipped() {
        let d = evening_discipline("Unplanned", 20);
        let assignments = ScheduleGenerator::new()
            .generate(&[], &[d], &semester(), &BTreeSet::new())
            .unwrap();
        assert!(assignments.is_empty());
    }
}
