//! Reusable UI components for the field builder TUI

pub mod choice_list;
pub mod input_field;
pub mod status_display;

pub use choice_list::ChoiceList;
pub use input_field::InputField;
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
