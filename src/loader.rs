//! Delimited-text ingestion of discipline distributions.
//!
//! Course offices deliver the teaching-load distribution as a CSV in the
//! shape `Disciplina, Hora_aula, Encontros, Sigla, Horas`. Only the name,
//! the hour load, and the sigla matter here; the row set is noisy
//! (repeated headers, subtotal lines, blank padding), so rows without a
//! numeric hour load are skipped rather than rejected.
//!
//! Placement constraints are not part of the distribution file: they
//! come from the course's slot template (weekly evening classes or
//! biweekly Friday/Saturday classes), applied uniformly to every loaded
//! discipline.

use std::io::Read;

use chrono::{NaiveTime, Weekday};
use thiserror::Error;
use tracing::warn;

use crate::models::{Discipline, TimeWindow};

/// Loader failures.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The CSV reader failed (I/O or malformed framing).
    #[error("failed to read distribution records")]
    Csv(#[from] csv::Error),

    /// No usable discipline rows were found.
    #[error("distribution contained no usable discipline rows")]
    Empty,
}

/// The weekly placement pattern a course runs on.
///
/// Patterns mirror the institutional timetables: weekly cohorts meet
/// Monday/Wednesday evenings, biweekly cohorts meet Friday evenings and
/// Saturday daytime, all in 100-minute blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTemplate {
    /// Weekdays sessions may occupy.
    pub weekdays: Vec<Weekday>,
    /// Time-of-day windows sessions may occupy.
    pub windows: Vec<TimeWindow>,
    /// Standard session length in minutes.
    pub max_session_minutes: i64,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time-of-day literal")
}

impl SlotTemplate {
    /// Weekly pattern: Monday/Wednesday, 19:00–20:40 and 21:00–22:40.
    pub fn weekly() -> Self {
        Self {
            weekdays: vec![Weekday::Mon, Weekday::Wed],
            windows: vec![
                TimeWindow::new(hm(19, 0), hm(20, 40)),
                TimeWindow::new(hm(21, 0), hm(22, 40)),
            ],
            max_session_minutes: 100,
        }
    }

    /// Biweekly pattern: Friday evenings plus Saturday daytime blocks.
    pub fn biweekly() -> Self {
        Self {
            weekdays: vec![Weekday::Fri, Weekday::Sat],
            windows: vec![
                TimeWindow::new(hm(8, 0), hm(9, 40)),
                TimeWindow::new(hm(10, 0), hm(11, 40)),
                TimeWindow::new(hm(13, 0), hm(14, 40)),
                TimeWindow::new(hm(15, 0), hm(16, 40)),
                TimeWindow::new(hm(19, 0), hm(20, 40)),
                TimeWindow::new(hm(21, 0), hm(22, 40)),
            ],
            max_session_minutes: 100,
        }
    }

    /// Stamps the template's placement constraints onto a discipline.
    fn apply(&self, mut discipline: Discipline) -> Discipline {
        for weekday in &self.weekdays {
            discipline = discipline.with_weekday(*weekday);
        }
        for window in &self.windows {
            discipline = discipline.with_window(*window);
        }
        discipline.with_max_session_minutes(self.max_session_minutes)
    }
}

/// Loads disciplines from a distribution CSV.
///
/// Column order follows the institutional export: name, hour load,
/// meeting count, sigla, total hours. The sigla becomes the discipline
/// id when present, otherwise the name does. Instructor, room, and
/// cohort identities are not in the file; callers fill them in on the
/// returned disciplines.
pub fn load_disciplines_csv(
    reader: impl Read,
    template: &SlotTemplate,
) -> Result<Vec<Discipline>, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut disciplines = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let name = record.get(0).unwrap_or("").trim();
        let hours_field = record.get(1).unwrap_or("").trim();
        let sigla = record.get(3).unwrap_or("").trim();

        let Ok(hours) = hours_field.parse::<f64>() else {
            if !name.is_empty() {
                warn!(row = name, "skipping row without numeric hour load");
            }
            continue;
        };
        if hours <= 0.0 || name.is_empty() {
            continue;
        }

        let id = if sigla.is_empty() { name } else { sigla };
        let discipline = template.apply(
            Discipline::new(id)
                .with_name(name)
                .with_required_hours(hours.round() as u32),
        );
        disciplines.push(discipline);
    }

    if disciplines.is_empty() {
        return Err(LoaderError::Empty);
    }
    Ok(disciplines)
}
