//! Field builder error types

use thiserror::Error;

use crate::builder::validation::FieldErrors;
use crate::models::{MAX_CHOICES, MAX_TEXT_LEN, MIN_CHOICES};

/// Per-field validation failure, shown inline next to the field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Required")]
    Required,

    #[error("Must be at most {} characters", MAX_TEXT_LEN)]
    TooLong,

    #[error("choices field must have at least {} items", MIN_CHOICES)]
    TooFewChoices,

    #[error("choices field must have less than or equal to {} items", MAX_CHOICES)]
    TooManyChoices,
}

/// Rejection raised by the Add choice operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("Enter text before add")]
    EmptyInput,

    #[error("Cannot enter more than {} choices", MAX_CHOICES)]
    CapacityExceeded,

    #[error("Enter text is already present in the choice list")]
    DuplicateChoice,
}

/// Failure of a submit request
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    InFlight,

    #[error("Form has {} invalid field(s)", .0.len())]
    Blocked(FieldErrors),

    #[error("default value should be present in the choice")]
    DefaultNotInChoices,

    #[error("Submission failed: {0}")]
    SubmissionFailed(#[from] SubmissionFailure),
}

impl SubmitError {
    /// Whether the error should interrupt the user rather than show inline
    pub fn is_notification(&self) -> bool {
        matches!(self, SubmitError::DefaultNotInChoices)
    }
}

/// Transport or endpoint failure while posting the payload
#[derive(Error, Debug)]
pub enum SubmissionFailure {
    #[error("endpoint returned status {status_code}")]
    Status { status_code: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Body(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_form_text() {
        assert_eq!(FieldError::Required.to_string(), "Required");
        assert_eq!(
            FieldError::TooFewChoices.to_string(),
            "choices field must have at least 1 items"
        );
        assert_eq!(
            ChoiceError::CapacityExceeded.to_string(),
            "Cannot enter more than 50 choices"
        );
        assert_eq!(
            SubmitError::DefaultNotInChoices.to_string(),
            "default value should be present in the choice"
        );
    }

    #[test]
    fn test_status_failure_is_wrapped() {
        let err: SubmitError = SubmissionFailure::Status { status_code: 503 }.into();
        assert_eq!(err.to_string(), "Submission failed: endpoint returned status 503");
        assert!(!err.is_notification());
    }
}
