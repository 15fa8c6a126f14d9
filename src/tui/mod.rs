//! Field builder terminal user interface
//!
//! Renders the form, forwards key presses to the builder core and runs
//! submissions on a background task so the form stays responsive.

pub mod app;
pub mod components;
pub mod events;
pub mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub use app::App;
pub use events::AppEvent;

use crate::builder::FieldSubmitter;
use crate::config::Config;

/// Take over the terminal, run the form until the user quits, then restore it
pub async fn run_tui(config: Config, submitter: Arc<dyn FieldSubmitter>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, submitter);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
