use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use faveicon_core::AppConfig;
use faveicon_tui::{
    event::{Action, AppEvent, EventHandler},
    widgets::{IconWidget, StatusBarWidget},
    PreviewApp,
};

pub fn run(config: AppConfig) -> Result<()> {
    let events = EventHandler::new(config.preview.tick_rate_ms);
    let mut app = PreviewApp::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("faveicon"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &events);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PreviewApp,
    events: &EventHandler,
) -> Result<()> {
    let started = Instant::now();

    while !app.should_quit {
        app.tick(started.elapsed().as_secs_f64());

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            IconWidget::render(frame, chunks[0], &app.scene);
            StatusBarWidget::render(frame, chunks[1], app);
        })?;

        match events.next()? {
            Some(AppEvent::Key(key)) => {
                if let Some(action) = Action::from_key(key) {
                    app.apply(action);
                }
            }
            Some(AppEvent::Resize(_, _)) => terminal.autoresize()?,
            Some(AppEvent::Tick) | None => {}
        }
    }

    Ok(())
}
