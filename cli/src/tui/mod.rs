pub mod app;
pub mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, InputMode};
use crate::workspace::Workspace;

pub fn run(ws: Workspace) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ws);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "tui loop failed");
        println!("{:?}", err);
    }
    if app.ws.session.has_unsaved_changes() {
        println!("Closed with unsaved changes.");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    if app.request_quit() {
                        return Ok(());
                    }
                },
                KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1),
                KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-7),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(7),
                KeyCode::Char('[') | KeyCode::Char('p') => app.change_month(-1),
                KeyCode::Char(']') | KeyCode::Char('n') => app.change_month(1),
                KeyCode::Char('t') => app.jump_to_today(),
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
                KeyCode::Char('s') => app.save(),
                KeyCode::Char('d') => app.enter_start_date_mode(),
                KeyCode::Char('i') => app.enter_import_mode(),
                KeyCode::Char('e') => app.export(),
                _ => {},
            },
            InputMode::StartDate | InputMode::ImportPath => match key.code {
                KeyCode::Enter => app.submit_input(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_input_cursor_left(),
                KeyCode::Right => app.move_input_cursor_right(),
                _ => {},
            },
        }
    }
}
