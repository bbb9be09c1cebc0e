//! Holiday records and the institutional holiday-list format.
//!
//! Holidays come in two kinds: mandatory national holidays and optional
//! points ("ponto facultativo") that management may treat as non-working.
//! Records are merged into a [`Calendar`](super::Calendar) at build time
//! and never mutated afterwards.
//!
//! # List Format
//!
//! Institutional lists arrive as one line per holiday, first line a header:
//!
//! ```text
//! Feriados e pontos facultativos
//! 21 de abril - terça-feira, Tiradentes (feriado nacional);
//! 20 de abril - segunda-feira, Ponto Facultativo (ponto facultativo);
//! ```
//!
//! Month names are Portuguese; the kind is read from the trailing
//! parenthetical. Malformed lines are skipped with a warning.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Classification of a non-working day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HolidayKind {
    /// Mandatory national holiday.
    National,
    /// Optional point ("ponto facultativo") — non-working at management's
    /// discretion.
    OptionalPoint,
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayKind::National => write!(f, "national holiday"),
            HolidayKind::OptionalPoint => write!(f, "optional point"),
        }
    }
}

/// A dated holiday entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HolidayRecord {
    /// Calendar date of the holiday.
    pub date: NaiveDate,
    /// Holiday name (e.g. "Tiradentes").
    pub name: String,
    /// National holiday or optional point.
    pub kind: HolidayKind,
}

impl HolidayRecord {
    /// Creates a national holiday record.
    pub fn national(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: HolidayKind::National,
        }
    }

    /// Creates an optional-point record.
    pub fn optional(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: HolidayKind::OptionalPoint,
        }
    }
}

/// Portuguese month names as they appear in institutional lists.
const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Parses an institutional holiday list into records for the given year.
///
/// The first line is treated as a header and skipped, as are blank lines.
/// Lines that do not match the expected shape are skipped with a warning
/// rather than failing the whole list.
pub fn parse_holiday_list(text: &str, year: i32) -> Vec<HolidayRecord> {
    let date_re = Regex::new(r"^(\d{1,2})\s+de\s+(\w+)").expect("holiday date pattern");
    let name_re = Regex::new(r",\s*([^(]+)\(").expect("holiday name pattern");

    text.lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let record = parse_holiday_line(line, year, &date_re, &name_re);
            if record.is_none() {
                warn!(line, "skipping unparseable holiday line");
            }
            record
        })
        .collect()
}

fn parse_holiday_line(
    line: &str,
    year: i32,
    date_re: &Regex,
    name_re: &Regex,
) -> Option<HolidayRecord> {
    let caps = date_re.captures(line)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month_name = caps.get(2)?.as_str().to_lowercase();
    let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let name = name_re
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| "Feriado".to_string());

    let kind = if line.to_lowercase().contains("ponto facultativo") {
        HolidayKind::OptionalPoint
    } else {
        HolidayKind::National
    };

    Some(HolidayRecord { date, name, kind })
}

/// Built-in Brazilian holiday set, used when no institutional list is
/// supplied. Dates follow the 2026 reference list; movable feasts are kept
/// at their listed day/month.
pub fn default_holidays(year: i32) -> Vec<HolidayRecord> {
    let national: [(u32, u32, &str); 10] = [
        (1, 1, "Confraternização Universal"),
        (4, 3, "Sexta-feira Santa"),
        (4, 21, "Tiradentes"),
        (5, 1, "Dia Mundial do Trabalho"),
        (9, 7, "Independência do Brasil"),
        (10, 12, "Nossa Senhora Aparecida"),
        (11, 2, "Finados"),
        (11, 15, "Proclamação da República"),
        (11, 20, "Dia da Consciência Negra"),
        (12, 25, "Natal"),
    ];
    let optional: [(u32, u32, &str); 14] = [
        (1, 2, "Ponto Facultativo"),
        (2, 16, "Carnaval"),
        (2, 17, "Carnaval"),
        (2, 18, "Quarta-feira de Cinzas"),
        (4, 2, "Quinta-feira Santa"),
        (4, 20, "Ponto Facultativo"),
        (6, 4, "Corpus Christi"),
        (6, 5, "Ponto Facultativo"),
        (8, 15, "Assunção de Nossa Senhora"),
        (10, 30, "Dia do Servidor Público"),
        (12, 7, "Imaculada Conceição"),
        (12, 8, "Imaculada Conceição"),
        (12, 24, "Ponto Facultativo"),
        (12, 31, "Ponto Facultativo"),
    ];

    national
        .iter()
        .filter_map(|&(m, d, name)| {
            NaiveDate::from_ymd_opt(year, m, d).map(|date| HolidayRecord::national(date, name))
        })
        .chain(optional.iter().filter_map(|&(m, d, name)| {
            NaiveDate::from_ymd_opt(year, m, d).map(|date| HolidayRecord::optional(date, name))
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_national_line() {
        let text = "Lista de feriados\n21 de abril - terça-feira, Tiradentes (feriado nacional);\n";
        let records = parse_holiday_list(text, 2026);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, ymd(2026, 4, 21));
        assert_eq!(records[0].name, "Tiradentes");
        assert_eq!(records[0].kind, HolidayKind::National);
    }

    #[test]
    fn test_parse_optional_line() {
        let text =
            "header\n20 de abril - segunda-feira, Ponto Facultativo (ponto facultativo);\n";
        let records = parse_holiday_list(text, 2026);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, HolidayKind::OptionalPoint);
        assert_eq!(records[0].name, "Ponto Facultativo");
    }

    #[test]
    fn test_parse_skips_header_blanks_and_garbage() {
        let text = "Feriados 2026\n\nnão é uma data válida\n1 de maio - sexta-feira, Dia Mundial do Trabalho (feriado nacional);\n";
        let records = parse_holiday_list(text, 2026);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, ymd(2026, 5, 1));
    }

    #[test]
    fn test_parse_unknown_month_skipped() {
        let text = "header\n21 de smarch - terça-feira, Nada (feriado nacional);\n";
        assert!(parse_holiday_list(text, 2026).is_empty());
    }

    #[test]
    fn test_parse_missing_name_defaults() {
        let text = "header\n7 de setembro (feriado nacional)\n";
        let records = parse_holiday_list(text, 2026);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Feriado");
    }

    #[test]
    fn test_default_holidays_cover_both_kinds() {
        let records = default_holidays(2026);
        assert_eq!(records.len(), 24);
        assert!(records
            .iter()
            .any(|r| r.name == "Tiradentes" && r.kind == HolidayKind::National));
        assert!(records
            .iter()
            .any(|r| r.name == "Corpus Christi" && r.kind == HolidayKind::OptionalPoint));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(HolidayKind::National.to_string(), "national holiday");
        assert_eq!(HolidayKind::OptionalPoint.to_string(), "optional point");
    }
}
