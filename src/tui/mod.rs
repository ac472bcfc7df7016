pub mod app;
pub mod ui;

use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::error::{PilotError, Result};
use crate::models::TaskStatus;
use crate::storage::TaskStore;
use app::App;
use ui::ui;

fn terminal_error(e: io::Error) -> PilotError {
    PilotError::Terminal(e)
}

/// Runs the interactive dashboard until the user quits.
pub fn run_tui(store: &dyn TaskStore) -> Result<()> {
    let mut app = App::new(store)?;

    // Setup terminal
    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(terminal_error)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().map_err(terminal_error)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
    terminal.show_cursor().map_err(terminal_error)?;

    res.map_err(terminal_error)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.message = None;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_goal(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_goal(),
                KeyCode::Char('J') | KeyCode::Tab => app.next_task(),
                KeyCode::Char('K') | KeyCode::BackTab => app.previous_task(),
                KeyCode::Char('c') | KeyCode::Char(' ') => app.mark_selected(TaskStatus::Completed),
                KeyCode::Char('m') => app.mark_selected(TaskStatus::Missed),
                KeyCode::Char('p') => app.mark_selected(TaskStatus::Pending),
                KeyCode::Char('g') => app.toggle_goal_status(),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_goal(),
                _ => {}
            }
        }
    }
}
