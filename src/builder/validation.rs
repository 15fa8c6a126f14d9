//! Per-field validation rules evaluated on submit

use std::collections::BTreeMap;

use crate::builder::errors::FieldError;
use crate::models::{FieldDefinition, FieldName, MAX_CHOICES, MAX_TEXT_LEN, MIN_CHOICES};

/// Validation errors keyed by field, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<FieldName, FieldError>,
}

impl FieldErrors {
    pub fn insert(&mut self, field: FieldName, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: FieldName) -> Option<String> {
        self.get(field).map(|e| e.to_string())
    }

    pub fn clear_field(&mut self, field: FieldName) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldError)> + '_ {
        self.errors.iter()
    }
}

/// Run every field rule and collect all failures at once
pub fn validate(definition: &FieldDefinition) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if let Some(error) = check_text(&definition.label) {
        errors.insert(FieldName::Label, error);
    }

    if let Some(error) = check_text(&definition.default) {
        errors.insert(FieldName::Default, error);
    }

    let count = definition.choices.len();
    if count < MIN_CHOICES {
        errors.insert(FieldName::Choices, FieldError::TooFewChoices);
    } else if count > MAX_CHOICES {
        errors.insert(FieldName::Choices, FieldError::TooManyChoices);
    }

    // `required` and `display_order` are typed, so they are always present

    errors
}

fn check_text(value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(FieldError::Required)
    } else if trimmed.chars().count() > MAX_TEXT_LEN {
        Some(FieldError::TooLong)
    } else {
        None
    }
}
