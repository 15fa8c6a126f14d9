//! Submission controller: validation, cross-field check and the busy flag

use serde_json::Value;
use tracing::{debug, error, info};

use crate::builder::client::FieldSubmitter;
use crate::builder::errors::{SubmissionFailure, SubmitError};
use crate::builder::form_state::FormState;
use crate::builder::validation;
use crate::models::FieldPayload;

/// Where the controller is in a submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Blocked,
    Submitting,
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    phase: SubmitPhase,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a request is in flight
    pub fn is_busy(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Validate the form and, if it passes, mark the controller busy.
    ///
    /// Returns the payload to send. Field errors are written back to `form`.
    /// Nothing changes when a submission is already in flight.
    pub fn begin(&mut self, form: &mut FormState) -> Result<FieldPayload, SubmitError> {
        if self.is_busy() {
            debug!("Ignoring submit while a request is in flight");
            return Err(SubmitError::InFlight);
        }

        self.transition(SubmitPhase::Validating);
        let errors = validation::validate(form.definition());
        form.set_errors(errors.clone());

        if !errors.is_empty() {
            self.transition(SubmitPhase::Blocked);
            for (field, err) in errors.iter() {
                debug!("Field '{}' invalid: {}", field.as_str(), err);
            }
            self.transition(SubmitPhase::Idle);
            return Err(SubmitError::Blocked(errors));
        }

        let default = form.default_value().trim();
        if !form.choices().iter().any(|c| c == default) {
            info!("Default value '{}' is not one of the choices", default);
            self.transition(SubmitPhase::Idle);
            return Err(SubmitError::DefaultNotInChoices);
        }

        let payload = FieldPayload::from(form.definition());
        debug!("Submitting payload: {:?}", payload);
        self.transition(SubmitPhase::Submitting);
        Ok(payload)
    }

    /// Record the endpoint result and clear the busy flag
    pub fn complete(
        &mut self,
        result: Result<Value, SubmissionFailure>,
    ) -> Result<Value, SubmitError> {
        self.transition(SubmitPhase::Idle);
        match result {
            Ok(response) => {
                info!("Field definition saved: {}", response);
                Ok(response)
            }
            Err(failure) => {
                error!("Field definition submission failed: {}", failure);
                Err(SubmitError::SubmissionFailed(failure))
            }
        }
    }

    /// Run a whole submit cycle against `submitter`
    pub async fn submit(
        &mut self,
        form: &mut FormState,
        submitter: &dyn FieldSubmitter,
    ) -> Result<Value, SubmitError> {
        let payload = self.begin(form)?;
        let result = submitter.submit(&payload).await;
        self.complete(result)
    }

    fn transition(&mut self, next: SubmitPhase) {
        debug!("Submission phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::client::HttpSubmitter;
    use crate::models::{DisplayOrder, FieldName};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records payloads instead of sending them
    #[derive(Default)]
    struct RecordingSubmitter {
        calls: AtomicUsize,
        last: Mutex<Option<FieldPayload>>,
    }

    #[async_trait]
    impl FieldSubmitter for RecordingSubmitter {
        async fn submit(&self, payload: &FieldPayload) -> Result<Value, SubmissionFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(payload.clone());
            Ok(serde_json::json!({"status": "ok"}))
        }
    }

    fn color_form() -> FormState {
        let mut form = FormState::new();
        form.set_label("Color");
        form.set_default_value("Red");
        form.set_choices(vec!["Red".to_string(), "Blue".to_string()]);
        form
    }

    #[tokio::test]
    async fn test_empty_choices_block_submission() {
        let mut form = FormState::new();
        form.set_label("Color");
        form.set_default_value("Red");
        let submitter = RecordingSubmitter::default();
        let mut controller = SubmissionController::new();

        let err = controller.submit(&mut form, &submitter).await.unwrap_err();

        assert!(matches!(err, SubmitError::Blocked(_)));
        assert!(form.errors().get(FieldName::Choices).is_some());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_alphabetical_color_scenario() {
        let mut form = color_form();
        form.set_display_order(DisplayOrder::Alphabetical);
        assert_eq!(form.choices(), &["Blue", "Red"]);

        let submitter = RecordingSubmitter::default();
        let mut controller = SubmissionController::new();
        controller.submit(&mut form, &submitter).await.unwrap();

        let sent = submitter.last.lock().unwrap().clone().unwrap();
        assert!(sent.display_alpha);
        assert_eq!(sent.choices, vec!["Blue", "Red"]);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_insertion_order_sends_false() {
        let mut form = color_form();
        form.set_display_order(DisplayOrder::Insertion);
        let submitter = RecordingSubmitter::default();
        let mut controller = SubmissionController::new();

        controller.submit(&mut form, &submitter).await.unwrap();

        let sent = submitter.last.lock().unwrap().clone().unwrap();
        assert!(!sent.display_alpha);
        assert_eq!(sent.choices, vec!["Red", "Blue"]);
    }

    #[tokio::test]
    async fn test_default_missing_from_choices_makes_no_call() {
        let mut form = color_form();
        form.set_default_value("Green");
        let submitter = RecordingSubmitter::default();
        let mut controller = SubmissionController::new();

        let err = controller.submit(&mut form, &submitter).await.unwrap_err();

        assert!(matches!(err, SubmitError::DefaultNotInChoices));
        assert!(err.is_notification());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_second_begin_while_busy_is_rejected() {
        let mut form = color_form();
        let mut controller = SubmissionController::new();

        controller.begin(&mut form).unwrap();
        assert!(controller.is_busy());
        assert!(matches!(controller.begin(&mut form), Err(SubmitError::InFlight)));

        controller
            .complete(Err(SubmissionFailure::Status { status_code: 502 }))
            .unwrap_err();
        assert!(!controller.is_busy());
        assert!(controller.begin(&mut form).is_ok());
    }

    #[tokio::test]
    async fn test_failure_keeps_form_and_clears_busy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"label": "Color"})))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = color_form();
        let before = form.definition().clone();
        let submitter = HttpSubmitter::new(reqwest::Client::new(), server.uri());
        let mut controller = SubmissionController::new();

        let err = controller.submit(&mut form, &submitter).await.unwrap_err();

        assert!(matches!(err, SubmitError::SubmissionFailed(_)));
        assert_eq!(form.definition(), &before);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_success_does_not_reset_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"saved": true})))
            .mount(&server)
            .await;

        let mut form = color_form();
        let submitter = HttpSubmitter::new(reqwest::Client::new(), server.uri());
        let mut controller = SubmissionController::new();

        let response = controller.submit(&mut form, &submitter).await.unwrap();

        assert_eq!(response["saved"], true);
        assert_eq!(form.label(), "Color");
        assert_eq!(form.choices().len(), 2);
    }
}
