//! Quote Form - Terminal UI for live sell/buy quoting
//!
//! Type a sell amount; the buy amount follows once typing pauses.
//! Logs go to the configured log file, stdout belongs to the form.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use swap_quote::application::tui::{ui, FormApp};
use swap_quote::{init_file_tracing, PriceSource, QuoteForm, ZeroExClient};
use swap_quote_form::bin_common::load_config;

/// Input poll timeout, also the redraw cadence
const POLL_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let config = load_config()?;

    init_file_tracing(&config.log_level, &config.log_file)?;
    config.log();

    // Create tokio runtime; the UI loop stays on this thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let client = Arc::new(ZeroExClient::from_config(&config.api, config.api_key.clone())?);
    let form = QuoteForm::new(client, config.pair.clone(), config.debounce());
    let mut app = FormApp::new(form);

    // Setup terminal, undoing any partial setup on failure
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(e.into());
        }
    };

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(app);
    tracing::info!("Quote form closed");

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn run_app<B: ratatui::backend::Backend, S: PriceSource>(
    terminal: &mut Terminal<B>,
    app: &mut FormApp<S>,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
