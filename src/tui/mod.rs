// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, finished backend calls)
// - Key dispatch: form panel, search box, global keys, then the current view

pub mod app;
pub mod components;
pub mod layout;
pub mod theme;
pub mod views;

use crate::api::FarmApi;
use crate::config::Config;
use crate::farm::{Notice, SalesPage};
use crate::logging::ActivityLog;
use anyhow::{Context, Result};
use app::{App, OpenForm, Outcome, View};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use theme::Theme;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(200);

const HELP_TEXT: &str = "1/2/3 or F1-F3: pages │ R: reload │ q: quit\n\
    Flocks: n new, / search, ↑/↓ select, c close\n\
    Feed: a add, r record, tab switch table\n\
    Sales: n new";

/// Run the TUI
///
/// Sets up the terminal, loads every collection, runs the event loop, and
/// restores the terminal when done.
pub async fn run_tui(
    config: &Config,
    api: Arc<dyn FarmApi>,
    activity: ActivityLog,
    sales: SalesPage,
) -> Result<()> {
    let backend_label = if config.demo_mode {
        "demo data".to_string()
    } else {
        config.api_url.clone()
    };
    let (mut app, mut outcome_rx) = App::new(
        api,
        sales,
        Theme::from_name(&config.theme),
        activity,
        backend_label,
    );
    app.load_all();

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut outcome_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Wakes on whichever comes first: a key press, a tick (spinner and toast
/// expiry), or a finished backend call.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    outcome_rx: &mut mpsc::Receiver<Outcome>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(TICK_RATE);

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Form → Search → Global → View-specific
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+C quits from anywhere, even mid-form
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        app.should_quit = true;
        return;
    }

    if let Some(which) = app.open_form() {
        handle_form_input(app, which, key_event);
        return;
    }

    if app.searching {
        handle_search_input(app, key_event);
        return;
    }

    if handle_global_keys(app, &key_event) {
        return;
    }

    match app.view {
        View::Flocks => handle_flocks_keys(app, key_event.code),
        View::Feed => handle_feed_keys(app, key_event.code),
        View::Sales => handle_sales_keys(app, key_event.code),
    }
}

/// The open form absorbs every key
fn handle_form_input(app: &mut App, which: OpenForm, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => {
            if app.form_busy(which) {
                app.show_notice(crate::farm::FormError::Busy.notice());
            } else {
                app.submit_form(which);
            }
        }
        KeyCode::Tab | KeyCode::Down => app.form_mut(which).focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form_mut(which).focus_prev(),
        KeyCode::Left => app.cycle_focused(which, false),
        KeyCode::Right => app.cycle_focused(which, true),
        KeyCode::Backspace => app.form_mut(which).pop_char(),
        KeyCode::Char(c) => app.form_mut(which).push_char(c),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => app.searching = false,
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

/// Global keys work the same regardless of current view
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::F(1) | KeyCode::Char('1') => app.set_view(View::Flocks),
        KeyCode::F(2) | KeyCode::Char('2') => app.set_view(View::Feed),
        KeyCode::F(3) | KeyCode::Char('3') => app.set_view(View::Sales),
        KeyCode::Char('R') => app.reload_current(),
        KeyCode::Char('?') => app.show_notice(Notice::info("Keys", HELP_TEXT)),
        _ => return false,
    }
    true
}

fn handle_flocks_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('n') => app.toggle_form(OpenForm::CreateFlock),
        KeyCode::Char('/') => app.searching = true,
        KeyCode::Esc => {
            app.flocks.set_search("");
            app.clamp_flock_selection();
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next_flock(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_flock(),
        KeyCode::Char('c') => app.close_selected_flock(),
        _ => {}
    }
}

fn handle_feed_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('a') => app.toggle_form(OpenForm::AddFeed),
        KeyCode::Char('r') => app.toggle_form(OpenForm::RecordConsumption),
        KeyCode::Tab | KeyCode::BackTab => app.feed.tab = app.feed.tab.toggle(),
        _ => {}
    }
}

fn handle_sales_keys(app: &mut App, key: KeyCode) {
    if key == KeyCode::Char('n') {
        app.toggle_form(OpenForm::RecordSale);
    }
}
