//! Choice list operations: add, delete and reorder
//!
//! Every operation works on the [`FormState`] passed in, using the current
//! default value as the candidate text for new choices.

use icu_collator::{Collator, CollatorOptions};
use tracing::{debug, warn};

use crate::builder::errors::ChoiceError;
use crate::builder::form_state::FormState;
use crate::models::{DisplayOrder, MAX_CHOICES};

impl FormState {
    /// Append the staged default value to the choice list.
    ///
    /// The checks compare the trimmed candidate, but the raw value is what
    /// gets appended. A duplicate clears the staged value; success keeps it.
    pub fn add_choice(&mut self) -> Result<(), ChoiceError> {
        let raw = self.default_value().to_string();
        let candidate = raw.trim();

        if candidate.is_empty() {
            warn!("Rejected empty choice");
            return Err(ChoiceError::EmptyInput);
        }

        if self.choices().len() >= MAX_CHOICES {
            warn!("Rejected choice '{}': list already holds {} entries", candidate, MAX_CHOICES);
            return Err(ChoiceError::CapacityExceeded);
        }

        if self.choices().iter().any(|c| c == candidate) {
            warn!("Rejected duplicate choice '{}'", candidate);
            self.set_default_value("");
            return Err(ChoiceError::DuplicateChoice);
        }

        debug!("Adding choice '{}'", raw);
        self.choices_mut().push(raw);
        Ok(())
    }

    /// Remove the first entry equal to `choice`. Unknown choices are ignored.
    pub fn delete_choice(&mut self, choice: &str) {
        if let Some(index) = self.choices().iter().position(|c| c == choice) {
            debug!("Deleting choice '{}'", choice);
            self.choices_mut().remove(index);
        }
    }

    /// Apply `order` to the current choices once
    pub fn reorder_choices(&mut self, order: DisplayOrder) {
        if order.is_alphabetical() {
            let mut sorted = self.choices().to_vec();
            sort_alphabetically(&mut sorted);
            *self.choices_mut() = sorted;
        }
    }

    /// Store the order preference and reorder the current choices with it.
    ///
    /// Choices added afterwards are appended as usual and are not re-sorted.
    pub fn set_display_order(&mut self, order: DisplayOrder) {
        self.set_display_order_value(order);
        self.reorder_choices(order);
    }
}

/// Stable sort using the root locale collation: punctuation, then digits,
/// then letters with accents and case as secondary and tertiary differences.
pub fn sort_alphabetically(choices: &mut [String]) {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => choices.sort_by(|a, b| collator.compare(a, b)),
        Err(e) => {
            warn!("Collator unavailable, sorting by code point: {}", e);
            choices.sort();
        }
    }
}
