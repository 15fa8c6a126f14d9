//! Status bar showing the latest message and the busy indicator

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::ui::{spinner, Styles};

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Error,
    Loading,
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Status display component
#[derive(Default)]
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub hint: String,
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text shown when there is no current message
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = hint.to_string();
        self
    }

    /// Replace the current status message
    pub fn set_message(&mut self, message: StatusMessage) {
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Success));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Error));
    }

    pub fn set_loading(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Loading));
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    /// Render the status display; `tick` drives the spinner for loading messages
    pub fn render(&self, f: &mut Frame, area: Rect, tick: usize) {
        let (content, style) = match &self.current_message {
            Some(message) => {
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                };
                (format_message(message, tick), style)
            }
            None => (self.hint.clone(), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(content).style(style).block(block);

        f.render_widget(paragraph, area);
    }
}

fn format_message(message: &StatusMessage, tick: usize) -> String {
    let prefix = match message.status_type {
        StatusType::Info => "ℹ",
        StatusType::Success => "✓",
        StatusType::Error => "✗",
        StatusType::Loading => spinner(tick),
    };

    format!(
        "{} [{}] {}",
        prefix,
        message.timestamp.format("%H:%M:%S"),
        message.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(status: &StatusDisplay, tick: usize) -> String {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| status.render(f, f.size(), tick))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_latest_message_replaces_previous() {
        let mut status = StatusDisplay::new();
        status.set_loading("Submitting".to_string());
        status.set_success("Saved".to_string());

        let current = status.get_current().unwrap();
        assert_eq!(current.message, "Saved");
        assert_eq!(current.status_type, StatusType::Success);
    }

    #[test]
    fn test_hint_shown_without_message() {
        let status = StatusDisplay::new().with_hint("Tab: next field");
        assert!(rendered_text(&status, 0).contains("Tab: next field"));
    }

    #[test]
    fn test_loading_message_uses_spinner() {
        let mut status = StatusDisplay::new();
        status.set_loading("Submitting".to_string());
        let text = rendered_text(&status, 0);
        assert!(text.contains(spinner(0)));
        assert!(text.contains("Submitting"));
    }
}
