//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::components::{ChoiceList, InputField, StatusDisplay};
use super::events::AppEvent;
use super::ui::{centered_rect, spinner, Styles};
use crate::builder::{FieldSubmitter, FormState, SubmissionController, SubmitError};
use crate::config::Config;
use crate::models::{FieldName, MAX_TEXT_LEN};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const STATUS_HINT: &str =
    "Tab: Next | Enter: Add/Select | Space: Toggle | Ctrl+S: Save | Esc: Quit";

/// Focusable parts of the form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Label,
    Required,
    Default,
    Choices,
    Order,
    Save,
    Cancel,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::Label,
        Focus::Required,
        Focus::Default,
        Focus::Choices,
        Focus::Order,
        Focus::Save,
        Focus::Cancel,
    ];

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> Self {
        let index = self.index();
        Self::ORDER[if index == 0 { Self::ORDER.len() - 1 } else { index - 1 }]
    }
}

/// Main TUI application state
pub struct App {
    pub config: Config,
    pub form: FormState,
    pub controller: SubmissionController,
    submitter: Arc<dyn FieldSubmitter>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    pub focus: Focus,
    pub label_input: InputField,
    pub default_input: InputField,
    pub choice_list: ChoiceList,
    pub status: StatusDisplay,
    /// Interrupting message; blocks other input until dismissed
    pub notification: Option<String>,

    pub should_quit: bool,
    tick: usize,
}

impl App {
    pub fn new(config: Config, submitter: Arc<dyn FieldSubmitter>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            config,
            form: FormState::new(),
            controller: SubmissionController::new(),
            submitter,
            events_tx,
            events_rx,

            focus: Focus::Label,
            label_input: InputField::new("Label")
                .with_placeholder("e.g. Sales Region")
                .with_max_length(MAX_TEXT_LEN),
            default_input: InputField::new("Default Value")
                .with_placeholder("Type a choice and press Enter to add it")
                .with_max_length(MAX_TEXT_LEN),
            choice_list: ChoiceList::new(),
            status: StatusDisplay::new().with_hint(STATUS_HINT),
            notification: None,

            should_quit: false,
            tick: 0,
        };
        app.update_focus();
        app
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Field builder ready, submitting to {}", self.config.endpoint);

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            self.drain_events();
            self.tick = self.tick.wrapping_add(1);

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Apply every finished background event
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    /// Wait for the next background event. Used where no terminal drives the loop.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SubmissionFinished(result) => match self.controller.complete(result) {
                Ok(_) => self.status.set_success("Field definition saved".to_string()),
                Err(e) => self.status.set_error(e.to_string()),
            },
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.notification.is_some() {
            self.notification = None;
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.submit();
                return;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return;
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.previous());
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Label => self.handle_label_key(key),
            Focus::Required => self.handle_required_key(key),
            Focus::Default => self.handle_default_key(key),
            Focus::Choices => self.handle_choices_key(key),
            Focus::Order => self.handle_order_key(key),
            Focus::Save => {
                if key.code == KeyCode::Enter {
                    self.submit();
                } else {
                    self.handle_focus_keys(key);
                }
            }
            Focus::Cancel => {
                if key.code == KeyCode::Enter {
                    self.cancel();
                } else {
                    self.handle_focus_keys(key);
                }
            }
        }
    }

    /// Up/Down move between form rows
    fn handle_focus_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.set_focus(self.focus.previous()),
            KeyCode::Down => self.set_focus(self.focus.next()),
            _ => {}
        }
    }

    fn handle_label_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.set_focus(self.focus.next());
            return;
        }
        if edit_input(&mut self.label_input, key) {
            self.form.set_label(self.label_input.value.clone());
            self.sync_from_form();
        } else {
            self.handle_focus_keys(key);
        }
    }

    fn handle_required_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.form.toggle_required(),
            _ => self.handle_focus_keys(key),
        }
    }

    fn handle_default_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.add_choice();
            return;
        }
        if edit_input(&mut self.default_input, key) {
            self.form.set_default_value(self.default_input.value.clone());
            self.sync_from_form();
        } else {
            self.handle_focus_keys(key);
        }
    }

    fn handle_choices_key(&mut self, key: KeyEvent) {
        let len = self.form.choices().len();
        match key.code {
            KeyCode::Up => self.choice_list.previous(len),
            KeyCode::Down => self.choice_list.next(len),
            KeyCode::Enter | KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => {
                self.delete_selected_choice()
            }
            _ => {}
        }
    }

    fn handle_order_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                let order = self.form.display_order().toggled();
                self.form.set_display_order(order);
                self.status.set_info(format!("Order: {}", order.as_str()));
            }
            _ => self.handle_focus_keys(key),
        }
    }

    /// Add the staged default value as a choice
    pub fn add_choice(&mut self) {
        match self.form.add_choice() {
            Ok(()) => {
                let added = self.form.choices().len();
                self.choice_list.state.select(Some(added - 1));
                self.status
                    .set_info(format!("Added choice '{}'", self.form.default_value().trim()));
            }
            Err(e) => self.notification = Some(e.to_string()),
        }
        self.sync_from_form();
    }

    pub fn delete_selected_choice(&mut self) {
        let Some(index) = self.choice_list.selected() else {
            return;
        };
        if let Some(choice) = self.form.choices().get(index).cloned() {
            self.form.delete_choice(&choice);
            self.status.set_info(format!("Removed choice '{}'", choice.trim()));
        }
        self.sync_from_form();
    }

    /// Validate and start the background submission
    pub fn submit(&mut self) {
        match self.controller.begin(&mut self.form) {
            Ok(payload) => {
                self.status
                    .set_loading(format!("Saving to {}...", self.config.endpoint));
                let submitter = Arc::clone(&self.submitter);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = submitter.submit(&payload).await;
                    if tx.send(AppEvent::SubmissionFinished(result)).is_err() {
                        warn!("Submission finished after the form closed");
                    }
                });
            }
            Err(SubmitError::InFlight) => {
                debug!("Save ignored: submission in progress");
            }
            Err(SubmitError::Blocked(errors)) => {
                self.status
                    .set_error(format!("Please fix {} field(s) before saving", errors.len()));
            }
            Err(e) if e.is_notification() => self.notification = Some(e.to_string()),
            Err(e) => self.status.set_error(e.to_string()),
        }
        self.sync_from_form();
    }

    /// Reset the form to its initial values
    pub fn cancel(&mut self) {
        if self.is_busy() {
            return;
        }
        self.form.reset();
        self.label_input.clear();
        self.default_input.clear();
        self.choice_list.state.select(None);
        self.status.set_info("Form reset".to_string());
        self.sync_from_form();
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.update_focus();
    }

    fn update_focus(&mut self) {
        self.label_input.set_focus(self.focus == Focus::Label);
        self.default_input.set_focus(self.focus == Focus::Default);
        self.choice_list.set_focus(self.focus == Focus::Choices);
        if self.focus == Focus::Choices {
            self.choice_list.clamp(self.form.choices().len());
        }
    }

    /// Copy values and errors from the form into the widgets
    fn sync_from_form(&mut self) {
        let errors = self.form.errors();
        self.label_input.set_value(self.form.label());
        self.label_input.validation_error = errors.message(FieldName::Label);
        self.default_input.set_value(self.form.default_value());
        self.default_input.validation_error = errors.message(FieldName::Default);
        self.choice_list.validation_error = errors.message(FieldName::Choices);
        if self.choice_list.selected().is_some() {
            self.choice_list.clamp(self.form.choices().len());
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let frame_block = Block::default()
            .title(Span::styled(" Field Builder ", Styles::title()))
            .borders(Borders::ALL)
            .border_style(Styles::info());
        let content = frame_block.inner(outer[0]);
        f.render_widget(frame_block, outer[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(content);

        self.label_input.render(f, rows[0]);
        self.draw_type_row(f, rows[1]);
        self.default_input.render(f, rows[2]);
        self.choice_list.render(f, rows[3], self.form.choices());
        self.draw_order_row(f, rows[4]);
        self.draw_buttons(f, rows[5]);

        self.status.render(f, outer[1], self.tick);

        if let Some(message) = &self.notification {
            draw_notification(f, size, message);
        }
    }

    fn draw_type_row(&self, f: &mut Frame, area: Rect) {
        let checkbox = if self.form.required() { "[x]" } else { "[ ]" };
        let line = Line::from(vec![
            Span::raw("Multi-select    "),
            Span::styled(checkbox, Styles::title()),
            Span::raw(" A Value is required"),
        ]);
        let block = Block::default()
            .title("Type")
            .borders(Borders::ALL)
            .border_style(self.border_for(Focus::Required));
        f.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_order_row(&self, f: &mut Frame, area: Rect) {
        let text = format!("< {} >", self.form.display_order().as_str());
        let block = Block::default()
            .title("Order")
            .borders(Borders::ALL)
            .border_style(self.border_for(Focus::Order));
        f.render_widget(Paragraph::new(text).block(block), area);
    }

    fn draw_buttons(&self, f: &mut Frame, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let busy = self.is_busy();
        let save_text = if busy {
            format!("{} Save Changes", spinner(self.tick))
        } else {
            "Save Changes".to_string()
        };

        let (save_style, cancel_style) = if busy {
            (Styles::disabled(), Styles::disabled())
        } else {
            (Styles::save_button(), Styles::cancel_button())
        };

        let save = Paragraph::new(save_text).style(save_style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.border_for(Focus::Save)),
        );
        let cancel = Paragraph::new("Cancel/Reset").style(cancel_style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.border_for(Focus::Cancel)),
        );

        f.render_widget(save, halves[0]);
        f.render_widget(cancel, halves[1]);
    }

    fn border_for(&self, focus: Focus) -> ratatui::style::Style {
        if self.focus == focus {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        }
    }
}

/// Apply a text editing key to `input`. Returns false if the key is not an edit.
fn edit_input(input: &mut InputField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            input.insert_char(c);
        }
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_char_forward(),
        KeyCode::Left => input.move_cursor_left(),
        KeyCode::Right => input.move_cursor_right(),
        KeyCode::Home => input.move_cursor_to_start(),
        KeyCode::End => input.move_cursor_to_end(),
        _ => return false,
    }
    true
}

fn draw_notification(f: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(60, 25, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::styled("Press any key to continue", Styles::inactive()),
    ];
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Notice")
                .borders(Borders::ALL)
                .border_style(Styles::warning()),
        );
    f.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SubmissionFailure;
    use crate::models::{DisplayOrder, FieldPayload};
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSubmitter {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl FieldSubmitter for FakeSubmitter {
        async fn submit(&self, _payload: &FieldPayload) -> Result<Value, SubmissionFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SubmissionFailure::Status { status_code: 500 })
            } else {
                Ok(serde_json::json!({"ok": true}))
            }
        }
    }

    fn app_with(fail: bool) -> (App, Arc<FakeSubmitter>) {
        let submitter = Arc::new(FakeSubmitter {
            calls: AtomicUsize::new(0),
            fail,
        });
        let app = App::new(Config::default(), submitter.clone());
        (app, submitter)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn fill_color_form(app: &mut App) {
        type_text(app, "Color");
        app.set_focus(Focus::Default);
        type_text(app, "Red");
        app.handle_key_event(key(KeyCode::Enter));
        for _ in 0..3 {
            app.handle_key_event(key(KeyCode::Backspace));
        }
        type_text(app, "Blue");
        app.handle_key_event(key(KeyCode::Enter));
        for _ in 0..4 {
            app.handle_key_event(key(KeyCode::Backspace));
        }
        type_text(app, "Red");
    }

    #[test]
    fn test_typing_updates_form_state() {
        let (mut app, _) = app_with(false);
        type_text(&mut app, "Size");
        assert_eq!(app.form.label(), "Size");

        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::Char(' ')));
        assert!(app.form.required());
    }

    #[test]
    fn test_label_input_stops_at_max_length() {
        let (mut app, _) = app_with(false);
        type_text(&mut app, &"x".repeat(MAX_TEXT_LEN + 5));
        assert_eq!(app.form.label().chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn test_duplicate_add_shows_notification_and_clears_input() {
        let (mut app, _) = app_with(false);
        app.set_focus(Focus::Default);
        type_text(&mut app, "Red");
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.form.choices(), &["Red"]);

        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(
            app.notification.as_deref(),
            Some("Enter text is already present in the choice list")
        );
        assert_eq!(app.default_input.value, "");
        assert_eq!(app.form.choices(), &["Red"]);

        // any key dismisses without acting
        app.handle_key_event(key(KeyCode::Char('z')));
        assert!(app.notification.is_none());
        assert_eq!(app.default_input.value, "");
    }

    #[test]
    fn test_delete_selected_choice() {
        let (mut app, _) = app_with(false);
        fill_color_form(&mut app);
        app.set_focus(Focus::Choices);
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Delete));
        assert_eq!(app.form.choices(), &["Red"]);
    }

    #[test]
    fn test_order_toggle_reorders_once() {
        let (mut app, _) = app_with(false);
        fill_color_form(&mut app);
        assert_eq!(app.form.choices(), &["Red", "Blue"]);

        app.set_focus(Focus::Order);
        app.handle_key_event(key(KeyCode::Right));
        assert_eq!(app.form.display_order(), DisplayOrder::Insertion);
        assert_eq!(app.form.choices(), &["Red", "Blue"]);

        app.handle_key_event(key(KeyCode::Right));
        assert_eq!(app.form.display_order(), DisplayOrder::Alphabetical);
        assert_eq!(app.form.choices(), &["Blue", "Red"]);
    }

    #[tokio::test]
    async fn test_blocked_submit_shows_inline_errors() {
        let (mut app, submitter) = app_with(false);
        app.submit();
        assert!(!app.is_busy());
        assert_eq!(app.label_input.validation_error.as_deref(), Some("Required"));
        assert!(app.choice_list.validation_error.is_some());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_not_in_choices_notifies() {
        let (mut app, submitter) = app_with(false);
        fill_color_form(&mut app);
        for _ in 0..3 {
            app.handle_key_event(key(KeyCode::Backspace));
        }
        type_text(&mut app, "Green");
        app.submit();
        assert_eq!(
            app.notification.as_deref(),
            Some("default value should be present in the choice")
        );
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_runs_in_background_and_clears_busy() {
        let (mut app, submitter) = app_with(false);
        fill_color_form(&mut app);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(app.is_busy());

        // second save and cancel are ignored while busy
        app.submit();
        app.cancel();
        assert_eq!(app.form.label(), "Color");

        let event = app.next_event().await.unwrap();
        app.handle_app_event(event);

        assert!(!app.is_busy());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            app.status.get_current().unwrap().message,
            "Field definition saved"
        );
        assert_eq!(app.form.choices().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_submit_reports_error() {
        let (mut app, _) = app_with(true);
        fill_color_form(&mut app);
        app.submit();

        let event = app.next_event().await.unwrap();
        app.handle_app_event(event);

        assert!(!app.is_busy());
        let status = app.status.get_current().unwrap();
        assert!(status.message.contains("500"));
    }

    #[test]
    fn test_cancel_resets_form() {
        let (mut app, _) = app_with(false);
        fill_color_form(&mut app);
        app.set_focus(Focus::Cancel);
        app.handle_key_event(key(KeyCode::Enter));

        assert_eq!(app.form.label(), "");
        assert!(app.form.choices().is_empty());
        assert_eq!(app.label_input.value, "");
        assert_eq!(app.default_input.value, "");
    }

    #[test]
    fn test_draw_renders_form() {
        let (mut app, _) = app_with(false);
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Field Builder"));
        assert!(rendered.contains("Save Changes"));
        assert!(rendered.contains("Cancel/Reset"));
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Cancel.next(), Focus::Label);
        assert_eq!(Focus::Label.previous(), Focus::Cancel);
    }
}
