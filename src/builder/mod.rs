//! Field builder core
//!
//! The form state holder, its validation rules, the choice list operations
//! and the submission controller. Nothing in here knows about rendering;
//! the terminal UI and the CLI both drive these types directly.

pub mod choices;
pub mod client;
pub mod errors;
pub mod form_state;
pub mod submission;
pub mod validation;

pub use client::{FieldSubmitter, HttpSubmitter};
pub use errors::{ChoiceError, FieldError, SubmissionFailure, SubmitError};
pub use form_state::FormState;
pub use submission::SubmissionController;
pub use validation::{validate, FieldErrors};
