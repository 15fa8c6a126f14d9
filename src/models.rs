use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted for the label and default value
pub const MAX_TEXT_LEN: usize = 40;

/// Maximum number of choices a field may hold
pub const MAX_CHOICES: usize = 50;

/// Minimum number of choices required to submit
pub const MIN_CHOICES: usize = 1;

/// How choices are ordered for display and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayOrder {
    /// Keep insertion order (code 0)
    Insertion,
    /// Sort alphabetically (code 1)
    #[default]
    Alphabetical,
}

impl DisplayOrder {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayOrder::Insertion => "No Order",
            DisplayOrder::Alphabetical => "Display Choice in Alphabetical order",
        }
    }

    /// Numeric code used by the form (`1` means alphabetical)
    pub fn code(&self) -> u8 {
        match self {
            DisplayOrder::Insertion => 0,
            DisplayOrder::Alphabetical => 1,
        }
    }

    pub fn is_alphabetical(&self) -> bool {
        matches!(self, DisplayOrder::Alphabetical)
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayOrder::Insertion => DisplayOrder::Alphabetical,
            DisplayOrder::Alphabetical => DisplayOrder::Insertion,
        }
    }
}

/// The five fields of a definition, used as error keys and focus targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Label,
    Required,
    Default,
    Choices,
    DisplayAlpha,
}

impl FieldName {
    pub fn as_str(&self) -> &str {
        match self {
            FieldName::Label => "label",
            FieldName::Required => "required",
            FieldName::Default => "default",
            FieldName::Choices => "choices",
            FieldName::DisplayAlpha => "displayAlpha",
        }
    }
}

/// A multi-select field definition as edited in the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefinition {
    pub label: String,
    pub required: bool,
    pub default: String,
    pub choices: Vec<String>,
    pub display_order: DisplayOrder,
}

/// Body sent to the submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPayload {
    pub label: String,
    pub required: bool,
    pub default: String,
    pub choices: Vec<String>,
    #[serde(rename = "displayAlpha")]
    pub display_alpha: bool,
}

impl From<&FieldDefinition> for FieldPayload {
    /// Label and default are trimmed the way the schema casts them; choices go out as stored.
    fn from(definition: &FieldDefinition) -> Self {
        Self {
            label: definition.label.trim().to_string(),
            required: definition.required,
            default: definition.default.trim().to_string(),
            choices: definition.choices.clone(),
            display_alpha: definition.display_order.code() == 1,
        }
    }
}
