mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::keys::KeyOutcome;
use crate::state::app_settings::AppSettings;
use crate::state::messages::UiEvent;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let settings = AppSettings::load();
    let level = settings.log_level.unwrap_or(LevelFilter::Info);
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let app = App::new(settings);
    app.start();
    info!("scoreline {} started", env!("CARGO_PKG_VERSION"));

    let mut soccer = app.soccer.subscribe();
    let mut basketball = app.basketball.subscribe();
    let mut detail = app.detail.subscribe();
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, mut ui_events) = mpsc::channel::<UiEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Spinner tick thread, only redraws while a refresh is showing
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(120));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    {
        let mut guard = app.lock().await;
        draw::draw(&mut terminal, &mut guard);
    }

    loop {
        let redraw = tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                match handle_ui_event(ui_event, &app).await {
                    Some(redraw) => redraw,
                    None => break,
                }
            }
            Ok(()) = soccer.changed() => true,
            Ok(()) = basketball.changed() => true,
            Ok(()) = detail.changed() => true,
            else => break,
        };

        if redraw {
            let mut guard = app.lock().await;
            draw::draw(&mut terminal, &mut guard);
        }
    }

    app.lock().await.shutdown();
    input_handler.abort();
    animation_task.abort();
    cleanup_terminal(&mut terminal)?;

    // The input task can still be parked in a blocking terminal read, which
    // would keep the runtime from shutting down.
    std::process::exit(0)
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("scoreline {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "scoreline - live soccer and basketball scores in your terminal

Usage:
  scoreline
  scoreline --help
  scoreline --version

Environment:
  SCORELINE_REFRESH_SECS   Auto-refresh interval while viewing today (default 60)
  SCORELINE_TIMEOUT_SECS   Request timeout (default 30)
  SCORELINE_LOG_LEVEL      error, warn, info, debug or trace (default info)"
}

/// `None` once the user asked to quit, otherwise whether to redraw.
async fn handle_ui_event(ui_event: UiEvent, app: &Arc<Mutex<App>>) -> Option<bool> {
    match ui_event {
        UiEvent::KeyPressed(key_event) => match keys::handle_key_bindings(key_event, app).await {
            KeyOutcome::Quit => None,
            KeyOutcome::Continue => Some(true),
        },
        UiEvent::Resize => Some(true),
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            let refreshing = guard.view().is_background_refreshing;
            if refreshing {
                guard.advance_animation();
            }
            Some(refreshing)
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) if key_event.is_press() => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

fn restore_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;
    terminal::disable_raw_mode()
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    terminal.show_cursor()?;
    restore_terminal()
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = restore_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
