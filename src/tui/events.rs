//! Events delivered to the TUI loop from background work

use serde_json::Value;

use crate::builder::SubmissionFailure;

/// Application events produced outside the key handler
#[derive(Debug)]
pub enum AppEvent {
    /// The in-flight submission finished
    SubmissionFinished(Result<Value, SubmissionFailure>),
}
