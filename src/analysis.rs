//! Discipline load analysis.
//!
//! Turns a discipline's required teaching hours into a session plan:
//! how many sessions, how long each, given the number of usable weeks in
//! the calendar. Session length is the weekly spread of the required
//! load, rounded up to the configured granularity block and capped at
//! the discipline's maximum session length.
//!
//! Infeasibility is detected here, before generation: a discipline whose
//! session count exceeds `weeks × allowed weekdays` cannot be placed even
//! at one session per allowed weekday per week.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Calendar, Discipline};

/// Per-discipline analysis failures. Reported per discipline so one
/// unsatisfiable request does not abort the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The required load cannot fit the available weeks and weekdays.
    #[error(
        "discipline {discipline_id}: {required_sessions} sessions exceed capacity {capacity} \
         ({weeks_available} weeks x {weekday_count} weekdays)"
    )]
    InfeasibleLoad {
        /// Discipline that cannot be placed.
        discipline_id: String,
        /// Sessions the plan would need.
        required_sessions: u32,
        /// Maximum sessions the calendar can hold for this discipline.
        capacity: u32,
        /// Usable weeks in the calendar.
        weeks_available: u32,
        /// Distinct allowed weekdays.
        weekday_count: u32,
    },
}

/// Session plan for one discipline.
///
/// Guarantees `session_count × session_minutes ≥ required minutes` and
/// `session_minutes ≤ max_session_minutes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionPlan {
    /// Discipline this plan is for.
    pub discipline_id: String,
    /// Number of sessions to place.
    pub session_count: u32,
    /// Length of each session, in minutes.
    pub session_minutes: i64,
}

impl SessionPlan {
    /// Total planned minutes.
    #[inline]
    pub fn total_minutes(&self) -> i64 {
        i64::from(self.session_count) * self.session_minutes
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

/// Rounds `minutes` up to the next multiple of `granularity`.
fn round_up_to_block(minutes: i64, granularity: i64) -> i64 {
    let granularity = granularity.max(1);
    ceil_div(minutes, granularity) * granularity
}

/// Computes the session plan for one discipline against a validated
/// calendar.
///
/// `granularity_minutes` is the standard block size session lengths are
/// rounded up to (the original timetables use 100-minute blocks; 20 is
/// the configurable default).
pub fn analyze(
    discipline: &Discipline,
    calendar: &Calendar,
    granularity_minutes: i64,
) -> Result<SessionPlan, AnalysisError> {
    let weeks = calendar.weeks_available() as i64;
    let weekday_count = discipline.sorted_weekdays().len() as i64;
    let required = discipline.required_minutes();

    if weeks == 0 {
        let required_sessions = ceil_div(required, discipline.max_session_minutes.max(1));
        return Err(AnalysisError::InfeasibleLoad {
            discipline_id: discipline.id.clone(),
            required_sessions: required_sessions as u32,
            capacity: 0,
            weeks_available: 0,
            weekday_count: weekday_count as u32,
        });
    }

    let weekly_spread = round_up_to_block(ceil_div(required, weeks), granularity_minutes);
    let session_minutes = discipline.max_session_minutes.min(weekly_spread);
    let session_count = ceil_div(required, session_minutes);
    let capacity = weeks * weekday_count;

    debug!(
        discipline = %discipline.id,
        weeks,
        session_minutes,
        session_count,
        "analyzed discipline load"
    );

    if session_count > capacity {
        return Err(AnalysisError::InfeasibleLoad {
            discipline_id: discipline.id.clone(),
            required_sessions: session_count as u32,
            capacity: capacity as u32,
            weeks_available: weeks as u32,
            weekday_count: weekday_count as u32,
        });
    }

    Ok(SessionPlan {
        discipline_id: discipline.id.clone(),
        session_count: session_count as u32,
        session_minutes,
    })
}

/// Analyzes a batch, reporting feasible plans and per-discipline
/// failures separately.
pub fn analyze_all(
    disciplines: &[Discipline],
    calendar: &Calendar,
    granularity_minutes: i64,
) -> (Vec<SessionPlan>, Vec<AnalysisError>) {
    let mut plans = Vec::new();
    let mut failures = Vec::new();
    for discipline in disciplines {
        match analyze(discipline, calendar, granularity_minutes) {
            Ok(plan) => plans.push(plan),
            Err(err) => failures.push(err),
        }
    }
    (plans, failures)
}
