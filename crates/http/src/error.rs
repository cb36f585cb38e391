//! Error types for the spreadsheet client.

use sheetform_core::ScheduleError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the spreadsheet service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Reading sheet data or metadata failed.
    #[error("Error fetching sheet data: {0}")]
    Fetch(String),

    /// Appending a row failed.
    #[error("Error appending row: {0}")]
    Append(String),

    /// A formatting request failed.
    #[error("Error applying formatting: {0}")]
    Format(String),

    /// The sheet title has no numeric id in the spreadsheet.
    #[error("Could not retrieve sheet ID for '{title}'")]
    SheetNotFound { title: String },

    /// A write plan failed part way. Steps before `failed_step` were applied.
    #[error("Write plan stopped at step {failed_step}: {source}")]
    PartialPlan {
        failed_step: usize,
        #[source]
        source: Box<ClientError>,
    },

    /// The sheet content or the submitted row was rejected.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Index of the last applied step of a partially applied plan.
    ///
    /// `None` when nothing was applied or the error is not a plan failure.
    #[must_use]
    pub fn last_applied(&self) -> Option<usize> {
        match self {
            ClientError::PartialPlan { failed_step, .. } => failed_step.checked_sub(1),
            _ => None,
        }
    }

    /// Returns true for failures reported by the remote service.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        match self {
            ClientError::Fetch(_)
            | ClientError::Append(_)
            | ClientError::Format(_)
            | ClientError::SheetNotFound { .. }
            | ClientError::PartialPlan { .. } => true,
            ClientError::Schedule(_) | ClientError::Config(_) => false,
        }
    }
}
