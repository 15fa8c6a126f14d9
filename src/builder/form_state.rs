//! Form state holder: the single value object every operation goes through

use crate::builder::validation::FieldErrors;
use crate::models::{DisplayOrder, FieldDefinition, FieldName};

/// Current field values plus the errors from the last validation pass
#[derive(Debug, Clone, Default)]
pub struct FormState {
    definition: FieldDefinition,
    errors: FieldErrors,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn required(&self) -> bool {
        self.definition.required
    }

    pub fn default_value(&self) -> &str {
        &self.definition.default
    }

    pub fn choices(&self) -> &[String] {
        &self.definition.choices
    }

    pub fn display_order(&self) -> DisplayOrder {
        self.definition.display_order
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.definition.label = label.into();
        self.errors.clear_field(FieldName::Label);
    }

    pub fn set_required(&mut self, required: bool) {
        self.definition.required = required;
    }

    pub fn toggle_required(&mut self) {
        self.set_required(!self.definition.required);
    }

    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.definition.default = value.into();
        self.errors.clear_field(FieldName::Default);
    }

    /// Replace the whole choice list. Choice edits normally go through the choice operations.
    pub fn set_choices(&mut self, choices: Vec<String>) {
        self.definition.choices = choices;
        self.errors.clear_field(FieldName::Choices);
    }

    /// Store the order preference without touching the current choices
    pub fn set_display_order_value(&mut self, order: DisplayOrder) {
        self.definition.display_order = order;
    }

    pub(crate) fn choices_mut(&mut self) -> &mut Vec<String> {
        self.errors.clear_field(FieldName::Choices);
        &mut self.definition.choices
    }

    pub(crate) fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Restore the initial values and drop all errors
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
