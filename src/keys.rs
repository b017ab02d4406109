use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) -> KeyOutcome {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        return KeyOutcome::Quit;
    }

    // Search input swallows everything except the keys that leave it.
    if guard.state.search.editing {
        match key_event.code {
            KeyCode::Enter | KeyCode::Esc => guard.state.search.editing = false,
            KeyCode::Backspace => {
                guard.state.search.pop();
                guard.filter_changed();
            }
            Char(c) => {
                guard.state.search.push(c);
                guard.filter_changed();
            }
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    if guard.detail_phase().is_visible() {
        match key_event.code {
            KeyCode::Esc => guard.dismiss_detail(),
            Char('q') => return KeyOutcome::Quit,
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match (guard.state.active_tab, key_event.code) {
        (_, Char('q')) => return KeyOutcome::Quit,

        // Tab switching
        (_, Char('1')) => guard.update_tab(MenuItem::Soccer),
        (_, Char('2')) => guard.update_tab(MenuItem::Basketball),
        (_, Char('?')) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc) => guard.exit_help(),
        (MenuItem::Help, _) => {}

        // Dates
        (_, Char('h') | KeyCode::Left) => guard.previous_day(),
        (_, Char('l') | KeyCode::Right) => guard.next_day(),
        (_, Char('t')) => guard.go_to_today(),
        (_, Char('r')) => guard.refresh(),

        // Filters
        (_, Char('/')) => guard.state.search.editing = true,
        (_, Char('v')) => {
            guard.state.search.toggle_live_only();
            guard.filter_changed();
        }
        (_, KeyCode::Esc) if guard.state.search.criteria.is_active() => {
            guard.state.search.criteria = Default::default();
            guard.filter_changed();
        }

        // Match list
        (_, Char('j') | KeyCode::Down) => guard.select_down(),
        (_, Char('k') | KeyCode::Up) => guard.select_up(),
        (_, KeyCode::Enter) => guard.open_detail(),

        // Global
        (_, Char('f')) => guard.toggle_full_screen(),
        (_, Char('"')) => guard.toggle_show_logs(),

        _ => {}
    }

    KeyOutcome::Continue
}
