//! Input validation for timetabling requests.
//!
//! Checks structural integrity of disciplines before analysis and
//! generation. Detects:
//! - Duplicate discipline IDs
//! - Non-positive required hours
//! - Empty allowed-weekday sets
//! - Missing or inverted time windows
//! - Non-positive maximum session lengths

use crate::models::Discipline;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two disciplines share the same ID.
    DuplicateId,
    /// A discipline requires zero hours.
    NonPositiveHours,
    /// A discipline allows no weekdays.
    EmptyWeekdays,
    /// A discipline has no time windows.
    EmptyWindows,
    /// A time window's end is not after its start.
    InvalidWindow,
    /// Maximum session length is not positive.
    NonPositiveSessionLength,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a batch of disciplines.
///
/// Checks:
/// 1. No duplicate discipline IDs
/// 2. Every discipline requires at least one hour
/// 3. Every discipline allows at least one weekday
/// 4. Every discipline has at least one well-formed time window
/// 5. Every maximum session length is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_disciplines(disciplines: &[Discipline]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();

    for discipline in disciplines {
        if !seen_ids.insert(discipline.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate discipline ID: {}", discipline.id),
            ));
        }

        if discipline.required_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveHours,
                format!("Discipline '{}' requires zero hours", discipline.id),
            ));
        }

        if discipline.allowed_weekdays.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyWeekdays,
                format!("Discipline '{}' allows no weekdays", discipline.id),
            ));
        }

        if discipline.allowed_windows.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyWindows,
                format!("Discipline '{}' has no time windows", discipline.id),
            ));
        }

        for window in &discipline.allowed_windows {
            if !window.is_valid() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!(
                        "Discipline '{}' window {}..{} does not end after it starts",
                        discipline.id, window.start, window.end
                    ),
                ));
            }
        }

        if discipline.max_session_minutes <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveSessionLength,
                format!(
                    "Discipline '{}' has non-positive max session length",
                    discipline.id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
