//! Structural validation for a factory board.
//!
//! Checks the identity invariants the mutation engine relies on.
//! Detects:
//! - Duplicate strip IDs (persisted or temporary)
//! - Duplicate line IDs
//! - Blank line IDs
//!
//! The engine never requires a valid board: lookups take the first match
//! when ids collide. Validation reports the collision so callers can log
//! it when a board is loaded.

use crate::models::Factory;
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
    /// Two strips share a persisted (positive) ID.
    DuplicateStripId,
    /// Two strips share a temporary (negative) ID.
    DuplicateTemporaryId,
    /// Two lines share the same ID.
    DuplicateLineId,
    /// A line has an empty ID and cannot be targeted by a move.
    BlankLineId,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the identity invariants of a factory.
///
/// Checks:
/// 1. No duplicate line IDs
/// 2. No blank line IDs
/// 3. No strip ID appears twice across all lines
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_factory(factory: &Factory) -> ValidationResult {
    let mut errors = Vec::new();

    let mut line_ids = HashSet::new();
    for line in &factory.lines {
        if line.line_id.is_blank() {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlankLineId,
                format!("Line '{}' has a blank ID", line.line_code),
            ));
        }
        if !line_ids.insert(&line.line_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateLineId,
                format!("Duplicate line ID: {}", line.line_id),
            ));
        }
    }

    let mut strip_ids = HashSet::new();
    for line in &factory.lines {
        for strip in &line.orders {
            if strip_ids.insert(strip.strip_id) {
                continue;
            }
            let kind = if strip.strip_id.is_temporary() {
                ValidationErrorKind::DuplicateTemporaryId
            } else {
                ValidationErrorKind::DuplicateStripId
            };
            errors.push(ValidationError::new(
                kind,
                format!(
                    "Duplicate strip ID {} (again on line '{}')",
                    strip.strip_id, line.line_id
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
