use crate::app::MenuItem;
use livescore_api::filter::FilterCriteria;
use livescore_api::{MatchEvent, ScoreSnapshot, Sport};

// ---------------------------------------------------------------------------
// Refresh spinner
// ---------------------------------------------------------------------------

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Default)]
pub struct AnimationState {
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.tick % SPINNER_FRAMES.len() as u64) as usize]
    }
}

// ---------------------------------------------------------------------------
// Search / live-only filter input
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    pub criteria: FilterCriteria,
    /// Keystrokes go to the query while set.
    pub editing: bool,
}

impl SearchState {
    pub fn push(&mut self, c: char) {
        self.criteria.query.push(c);
    }

    pub fn pop(&mut self) {
        self.criteria.query.pop();
    }

    pub fn toggle_live_only(&mut self) {
        self.criteria.live_only = !self.criteria.live_only;
    }
}

// ---------------------------------------------------------------------------
// Match list selection
// ---------------------------------------------------------------------------

/// Cursor into the flattened, filtered match list. The list changes under it
/// on every refresh, so it is clamped at use rather than kept exact.
#[derive(Debug, Default)]
pub struct Selection {
    pub index: usize,
    pub scroll_offset: u16,
}

impl Selection {
    pub fn down(&mut self, count: usize) {
        if self.index + 1 < count {
            self.index += 1;
        }
    }

    pub fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn clamped(&self, count: usize) -> Option<usize> {
        (count > 0).then(|| self.index.min(count - 1))
    }
}

/// The match shown at `index` when the snapshot is read top to bottom.
pub fn match_at(snapshot: &ScoreSnapshot, index: usize) -> Option<&MatchEvent> {
    snapshot.matches().nth(index).map(|(_, m)| m)
}

/// Event the detail popup should open for. Basketball has no detail pages.
pub fn detail_target(sport: Sport, snapshot: &ScoreSnapshot, selection: &Selection) -> Option<String> {
    if !sport.has_match_detail() {
        return None;
    }
    let index = selection.clamped(snapshot.match_count())?;
    match_at(snapshot, index).map(|m| m.id.clone())
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub search: SearchState,
    pub selection: Selection,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sport whose list is on screen. Help keeps showing the tab it was opened from.
    pub fn sport(&self) -> Sport {
        match self.active_tab {
            MenuItem::Help => self.previous_tab.sport().unwrap_or_default(),
            tab => tab.sport().unwrap_or_default(),
        }
    }
}
