//! Error types for schedule parsing, validation and planning.

use thiserror::Error;

/// Result type for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while reading a schedule or preparing a new row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The header row is missing or has no cells.
    #[error("No headers found in the sheet (row {row})")]
    EmptyHeader { row: usize },

    /// The header row does not match the schema.
    #[error("Header mismatch. Found: {found:?}, Expected: {expected:?}")]
    HeaderMismatch {
        found: Vec<String>,
        expected: Vec<String>,
    },

    /// A section key could not be derived from a row.
    #[error("Could not determine section from '{value}': {reason}")]
    SectionKey { value: String, reason: String },

    /// A required field was left empty.
    #[error("Please fill in all fields ({field} is empty)")]
    MissingField { field: &'static str },

    /// A field that must be numeric is not.
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    /// The show number is already used by a row in the sheet.
    #[error("NO '{value}' already exists. Please use a unique value.")]
    DuplicateNumber { value: String },

    /// A date is not `DD/MM/YYYY` or is out of range.
    #[error("{field} must be in DD/MM/YYYY format with valid date, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    /// A field value is not one of the allowed choices.
    #[error("{field} must be one of {allowed:?}, got '{value}'")]
    InvalidOption {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// A color is not a `#RRGGBB` hex string.
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    /// A row was planned against the schema of another sheet kind.
    #[error("Row for {row} cannot be added to a {sheet} sheet")]
    KindMismatch { row: String, sheet: String },
}

impl ScheduleError {
    /// Create a section key error.
    pub fn section_key(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SectionKey {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by the sheet's own layout rather than
    /// by the submitted row.
    #[must_use]
    pub fn is_layout_error(&self) -> bool {
        matches!(self, Self::EmptyHeader { .. } | Self::HeaderMismatch { .. })
    }
}
