use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};

use crate::builder::{ChoiceError, FieldSubmitter, FormState, SubmissionController, SubmitError};
use crate::models::{DisplayOrder, FieldPayload, MAX_TEXT_LEN};

#[derive(Parser)]
#[command(name = "field-builder")]
#[command(about = "Define a multi-select field and submit it to a remote endpoint")]
#[command(version)]
pub struct Cli {
    /// Submission endpoint (overrides FIELD_BUILDER_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive form (default)
    Tui,

    /// Build a field definition from arguments and submit it
    Submit {
        /// Field label
        #[arg(short, long)]
        label: String,

        /// Default value; must be one of the choices
        #[arg(short, long)]
        default: String,

        /// Choice to add, in order (repeat for several)
        #[arg(short, long = "choice")]
        choices: Vec<String>,

        /// Mark the field as requiring a value
        #[arg(short, long)]
        required: bool,

        /// Display order (alphabetical, insertion)
        #[arg(short, long, default_value = "alphabetical")]
        order: String,

        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    pub fn parse_order(order: &str) -> Result<DisplayOrder, anyhow::Error> {
        match order.to_lowercase().as_str() {
            "alphabetical" | "alpha" | "1" => Ok(DisplayOrder::Alphabetical),
            "insertion" | "none" | "no-order" | "0" => Ok(DisplayOrder::Insertion),
            other => Err(anyhow::anyhow!(
                "Unsupported order: {}. Supported orders: alphabetical, insertion",
                other
            )),
        }
    }
}

/// Choice that the add operation refused while building from arguments
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedChoice {
    pub choice: String,
    pub error: ChoiceError,
}

/// Drive the form operations the same way the interactive form does:
/// each choice is staged in the default field and added, then the real
/// default is staged and the order applied. Choices are cut to the
/// input limit like typed text is; label and default are left for
/// validation to reject.
pub fn build_form(
    label: &str,
    default: &str,
    choices: &[String],
    required: bool,
    order: DisplayOrder,
) -> (FormState, Vec<RejectedChoice>) {
    let mut form = FormState::new();
    let mut rejected = Vec::new();

    form.set_label(label);
    form.set_required(required);

    for choice in choices {
        let staged = clamp_to_input_limit(choice);
        if staged.len() < choice.len() {
            warn!("Choice '{}' cut to {} characters", choice, MAX_TEXT_LEN);
        }
        form.set_default_value(staged);
        if let Err(error) = form.add_choice() {
            warn!("Skipping choice '{}': {}", choice, error);
            rejected.push(RejectedChoice {
                choice: choice.clone(),
                error,
            });
        }
    }

    form.set_default_value(default);
    form.set_display_order(order);

    (form, rejected)
}

fn clamp_to_input_limit(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_LEN) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// What a non-interactive submit produced
#[derive(Debug)]
pub enum SubmitReport {
    /// Dry run: the payload that would have been sent
    Preview(FieldPayload),
    /// The endpoint's response
    Saved(Value),
}

/// Validate and cross-check the form, then either send it or, for a dry
/// run, hand back the payload without contacting the endpoint.
pub async fn submit_form(
    form: &mut FormState,
    submitter: &dyn FieldSubmitter,
    dry_run: bool,
) -> Result<SubmitReport, SubmitError> {
    let mut controller = SubmissionController::new();
    if dry_run {
        let payload = controller.begin(form)?;
        info!("Dry run, not sending payload");
        return Ok(SubmitReport::Preview(payload));
    }
    let response = controller.submit(form, submitter).await?;
    Ok(SubmitReport::Saved(response))
}
