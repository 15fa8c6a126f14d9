//! Selectable view of the current choices

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::tui::ui::Styles;

const EMPTY_HINT: &str =
    "Please add some choices from the default values input field by clicking the Add button.";

/// Selection state for the choice list. The choices themselves live in the form.
#[derive(Debug, Default)]
pub struct ChoiceList {
    pub state: ListState,
    pub is_focused: bool,
    pub validation_error: Option<String>,
}

impl ChoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Keep the selection inside `len` items
    pub fn clamp(&mut self, len: usize) {
        let selected = match (self.state.selected(), len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.state.select(selected);
    }

    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, choices: &[String]) {
        let border_style = if self.validation_error.is_some() {
            Styles::error()
        } else if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let title = format!("Choices ({})", choices.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        if choices.is_empty() {
            let mut lines = vec![Line::styled(EMPTY_HINT, Styles::inactive())];
            if let Some(error) = &self.validation_error {
                lines.push(Line::styled(error.clone(), Styles::error()));
            }
            let hint = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(hint, area);
            return;
        }

        let items: Vec<ListItem> = choices
            .iter()
            .map(|choice| ListItem::new(format!("{}  [del]", choice)))
            .collect();

        let highlight = if self.is_focused {
            Styles::selected()
        } else {
            Styles::default()
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.state);
    }
}
