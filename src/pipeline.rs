//! End-to-end timetabling pipeline.
//!
//! Runs the synchronous batch sequence: input validation → calendar
//! build → discipline analysis → generate↔validate loop. Each stage
//! consumes the complete, immutable output of the previous one; nothing
//! here suspends on I/O. Export, storage, and notification of the
//! resulting snapshot happen strictly after this pipeline, outside the
//! crate.
//!
//! The generate↔validate loop is a bounded state machine: conflicts
//! feed the union of their slots back into the exclusion set and trigger
//! regeneration, at most `max_retries` attempts, after which the
//! surviving conflict records are surfaced. Sessions are never silently
//! dropped.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{analyze_all, AnalysisError, SessionPlan};
use crate::conflict::detect_conflicts;
use crate::generator::{GenerationError, ScheduleGenerator};
use crate::models::{
    Assignment, Calendar, CalendarError, ConflictRecord, Discipline, HolidayRecord, Timetable,
};
use crate::validation::{validate_disciplines, ValidationError};

/// Pipeline configuration, passed explicitly rather than held as
/// module-level state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    /// Course the run is for (carried into the snapshot).
    pub course: String,
    /// Academic year label (carried into the snapshot).
    pub academic_year: String,
    /// Weekdays that never count as business days.
    pub weekend_days: Vec<Weekday>,
    /// Standard block size session lengths round up to.
    pub rounding_granularity_minutes: i64,
    /// Maximum generation attempts in the conflict retry loop.
    pub max_retries: u32,
}

impl ScheduleConfig {
    /// Creates a configuration with Sat/Sun weekends, 20-minute rounding
    /// blocks, and 5 generation attempts.
    pub fn new(course: impl Into<String>, academic_year: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            academic_year: academic_year.into(),
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            rounding_granularity_minutes: 20,
            max_retries: 5,
        }
    }

    /// Replaces the weekend-day set.
    pub fn with_weekend_days(mut self, days: Vec<Weekday>) -> Self {
        self.weekend_days = days;
        self
    }

    /// Sets the rounding block size in minutes.
    pub fn with_granularity_minutes(mut self, minutes: i64) -> Self {
        self.rounding_granularity_minutes = minutes;
        self
    }

    /// Sets the retry bound.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// States of the generate↔validate loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Producing a tentative assignment set.
    Generating,
    /// Checking the tentative set for conflicts.
    Validating,
    /// Expanding the exclusion set before another attempt.
    Retrying,
    /// Conflict-free assignment reached.
    Succeeded,
    /// Retry bound exhausted with conflicts remaining.
    Failed,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// Frozen assignment snapshot.
    pub timetable: Timetable,
    /// Session plans the assignments were generated from.
    pub session_plans: Vec<SessionPlan>,
    /// Disciplines that could not fit the calendar, reported
    /// per-discipline instead of aborting the batch.
    pub infeasible: Vec<AnalysisError>,
    /// Generation attempts consumed.
    pub attempts: u32,
}

/// Pipeline failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Discipline input failed integrity checks.
    #[error("invalid discipline input: {} problem(s)", .0.len())]
    InvalidDisciplines(Vec<ValidationError>),

    /// Calendar input was malformed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Generation could not place a discipline's sessions.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The retry bound was exhausted with conflicts remaining.
    #[error("unresolved conflicts after {attempts} attempt(s): {} record(s)", .conflicts.len())]
    UnresolvedConflicts {
        /// Attempts consumed.
        attempts: u32,
        /// Every conflict still standing.
        conflicts: Vec<ConflictRecord>,
    },
}

/// The timetabling pipeline.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use timetable::models::{Discipline, HolidayRecord, TimeWindow};
/// use timetable::pipeline::{Pipeline, ScheduleConfig};
///
/// let config = ScheduleConfig::new("Criminologia", "2026-2027")
///     .with_granularity_minutes(100);
/// let discipline = Discipline::new("Intro")
///     .with_required_hours(20)
///     .with_weekday(Weekday::Mon)
///     .with_weekday(Weekday::Wed)
///     .with_window(TimeWindow::new(
///         NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(22, 40, 0).unwrap(),
///     ))
///     .with_instructor("P1")
///     .with_cohort("T2026")
///     .with_max_session_minutes(100);
///
/// let outcome = Pipeline::new(config)
///     .run(
///         NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
///         &[HolidayRecord::national(
///             NaiveDate::from_ymd_opt(2026, 4, 21).unwrap(),
///             "Tiradentes",
///         )],
///         &[discipline],
///     )
///     .unwrap();
/// assert_eq!(outcome.timetable.assignment_count(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ScheduleConfig,
    generator: ScheduleGenerator,
}

impl Pipeline {
    /// Creates a pipeline with the given configuration.
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            generator: ScheduleGenerator::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Runs the full pipeline for one (course, academic-year) request.
    pub fn run(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        holidays: &[HolidayRecord],
        disciplines: &[Discipline],
    ) -> Result<PipelineOutcome, PipelineError> {
        info!(course = %self.config.course, %start, %end, "validating inputs");
        validate_disciplines(disciplines).map_err(PipelineError::InvalidDisciplines)?;

        info!("building calendar");
        let calendar = Calendar::build(start, end, holidays, &self.config.weekend_days)?;
        info!(
            business_days = calendar.business_day_count(),
            weeks = calendar.weeks_available(),
            "calendar validated"
        );

        info!(disciplines = disciplines.len(), "analyzing discipline loads");
        let (plans, infeasible) = analyze_all(
            disciplines,
            &calendar,
            self.config.rounding_granularity_minutes,
        );
        for failure in &infeasible {
            warn!(%failure, "discipline cannot fit the calendar");
        }

        let (assignments, attempts) = self.resolve(&plans, disciplines, &calendar)?;

        let mut timetable = Timetable::new(
            self.config.course.as_str(),
            self.config.academic_year.as_str(),
        );
        timetable.assignments = assignments;
        info!(
            sessions = timetable.assignment_count(),
            attempts, "timetable complete"
        );

        Ok(PipelineOutcome {
            timetable,
            session_plans: plans,
            infeasible,
            attempts,
        })
    }

    /// Drives the bounded generate↔validate state machine.
    fn resolve(
        &self,
        plans: &[SessionPlan],
        disciplines: &[Discipline],
        calendar: &Calendar,
    ) -> Result<(Vec<Assignment>, u32), PipelineError> {
        let mut excluded = BTreeSet::new();
        let mut attempts = 0u32;
        let mut assignments = Vec::new();
        let mut conflicts: Vec<ConflictRecord> = Vec::new();
        let mut state = RunState::Generating;

        loop {
            state = match state {
                RunState::Generating => {
                    attempts += 1;
                    debug!(attempt = attempts, excluded = excluded.len(), "generating");
                    assignments =
                        self.generator
                            .generate(plans, disciplines, calendar, &excluded)?;
                    RunState::Validating
                }
                RunState::Validating => {
                    conflicts = detect_conflicts(&assignments, disciplines, calendar);
                    if conflicts.is_empty() {
                        RunState::Succeeded
                    } else if attempts >= self.config.max_retries {
                        RunState::Failed
                    } else {
                        RunState::Retrying
                    }
                }
                RunState::Retrying => {
                    let before = excluded.len();
                    for conflict in &conflicts {
                        for assignment in &conflict.assignments {
                            excluded.insert(assignment.slot);
                        }
                    }
                    warn!(
                        conflicts = conflicts.len(),
                        newly_excluded = excluded.len() - before,
                        "retrying with expanded exclusions"
                    );
                    RunState::Generating
                }
                RunState::Succeeded => return Ok((assignments, attempts)),
                RunState::Failed => {
                    return Err(PipelineError::UnresolvedConflicts {
                        attempts,
                        conflicts,
                    })
                }
            };
        }
    }
}
