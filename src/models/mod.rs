//! Timetabling domain models.
//!
//! Core data types for representing academic timetabling problems and
//! solutions: the validated calendar, holiday records, disciplines with
//! their placement constraints, weekly slots, and the frozen assignment
//! snapshot.
//!
//! # Ownership
//!
//! A [`Calendar`] is built once per run and borrowed read-only by every
//! downstream stage. Assignment vectors are owned by the generator until
//! frozen into a [`Timetable`] snapshot for the exporter boundary.

mod calendar;
mod discipline;
mod holiday;
mod slot;
mod timetable;

pub use calendar::{Calendar, CalendarDay, CalendarError};
pub use discipline::Discipline;
pub use holiday::{default_holidays, parse_holiday_list, HolidayKind, HolidayRecord};
pub use slot::{TimeSlot, TimeWindow};
pub use timetable::{Assignment, ConflictKind, ConflictRecord, Timetable};
