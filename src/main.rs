//! catfilter - filter a JSON dataset by category in the terminal
//!
//! Loads an array of records, offers the distinct values of one column in a
//! multi-select combobox, and previews the records the selection lets through.

mod app;
mod cli;
mod config;
mod dataset;
mod error;
mod events;
mod filter;
mod logging;
mod types;
mod ui;

use std::io::{self, Stdout};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::error;

use crate::app::App;
use crate::cli::Cli;
use crate::config::Settings;
use crate::dataset::Dataset;
use crate::error::AppError;
use crate::events::EventHandler;

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let guard = logging::init(cli.log_dir.as_deref())?;

    let result = run(&cli);
    if let Err(e) = &result {
        error!(error = %e, "catfilter exited with an error");
    }
    logging::shutdown();
    drop(guard);

    match result {
        Err(e) => match e.downcast_ref::<AppError>() {
            Some(app_error) => {
                eprintln!("Error: {}", app_error.user_message());
                if let Some(action) = app_error.suggested_action() {
                    eprintln!("{}", action);
                }
                std::process::exit(1);
            }
            None => Err(e),
        },
        Ok(()) => Ok(()),
    }
}

/// Load everything, then hand the terminal to the app until it quits.
fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(AppError::from)?;

    let base_filters = cli.filters()?;
    let dataset = Dataset::from_path(&cli.data).map_err(AppError::from)?;
    let tick_rate_ms = settings.tick_rate_ms;

    let mut app = App::new(
        dataset,
        cli.data.display().to_string(),
        settings,
        cli.column.clone(),
        base_filters,
    )?;

    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &mut app, tick_rate_ms);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Tui, app: &mut App, tick_rate_ms: u64) -> anyhow::Result<()> {
    let events = EventHandler::with_tick_rate(tick_rate_ms);

    while !app.should_quit() {
        terminal
            .draw(|frame| app.view(frame))
            .context("draw frame")?;
        let event = events.next().context("read event")?;
        app.update(event);
    }
    Ok(())
}

fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("enter alternate screen")?;

    // Leave the alternate screen before the panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        default_hook(info);
    }));

    Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}
