use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, detail_target};
use crate::state::match_detail::{DetailPhase, MatchDetailController};
use crate::state::view_state::{ViewState, ViewStateController};
use livescore_api::client::LivescoreApi;
use livescore_api::date::{self, SystemClock};
use livescore_api::{ScoreSnapshot, Sport, filter};
use std::sync::Arc;

pub type Scores = ViewStateController<LivescoreApi, SystemClock>;
pub type Detail = MatchDetailController<LivescoreApi>;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Soccer,
    Basketball,
    Help,
}

impl MenuItem {
    pub fn sport(&self) -> Option<Sport> {
        match self {
            MenuItem::Soccer => Some(Sport::Soccer),
            MenuItem::Basketball => Some(Sport::Basketball),
            MenuItem::Help => None,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub soccer: Arc<Scores>,
    pub basketball: Arc<Scores>,
    pub detail: Arc<Detail>,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let api = LivescoreApi::new().with_timeout(settings.request_timeout);
        let scores = |sport| {
            Arc::new(
                ViewStateController::new(sport, api.clone(), SystemClock)
                    .with_refresh_interval(settings.refresh_every),
            )
        };

        Self {
            soccer: scores(Sport::Soccer),
            basketball: scores(Sport::Basketball),
            detail: Arc::new(MatchDetailController::new(api.clone())),
            state: AppState::new(),
            settings,
        }
    }

    /// Kick off both sports' initial loads and refresh loops.
    pub fn start(&self) {
        self.soccer.start();
        self.basketball.start();
    }

    pub fn shutdown(&self) {
        self.soccer.dispose();
        self.basketball.dispose();
        self.detail.dispose();
    }

    pub fn scores(&self) -> &Arc<Scores> {
        match self.state.sport() {
            Sport::Soccer => &self.soccer,
            Sport::Basketball => &self.basketball,
        }
    }

    pub fn view(&self) -> ViewState {
        self.scores().state()
    }

    pub fn detail_phase(&self) -> DetailPhase {
        self.detail.state()
    }

    /// The active sport's snapshot with search and live-only applied.
    pub fn visible_snapshot(&self) -> Option<ScoreSnapshot> {
        let view = self.view();
        let snapshot = view.snapshot()?;
        Some(filter::apply(snapshot, &self.state.search.criteria))
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next != MenuItem::Help {
            self.state.selection.reset();
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Date navigation and refresh, fire-and-forget onto the controllers
    // -----------------------------------------------------------------------

    pub fn previous_day(&mut self) {
        let key = date::yesterday(&self.view().selected_date);
        self.go_to(key);
    }

    pub fn next_day(&mut self) {
        let key = date::tomorrow(&self.view().selected_date);
        self.go_to(key);
    }

    pub fn go_to_today(&mut self) {
        self.state.selection.reset();
        let scores = Arc::clone(self.scores());
        tokio::spawn(async move { scores.load_today().await });
    }

    fn go_to(&mut self, key: String) {
        self.state.selection.reset();
        let scores = Arc::clone(self.scores());
        tokio::spawn(async move { scores.select_date(key).await });
    }

    pub fn refresh(&self) {
        let scores = Arc::clone(self.scores());
        tokio::spawn(async move { scores.refresh().await });
    }

    // -----------------------------------------------------------------------
    // Match list and detail popup
    // -----------------------------------------------------------------------

    pub fn select_down(&mut self) {
        let count = self.visible_snapshot().map(|s| s.match_count()).unwrap_or(0);
        self.state.selection.down(count);
    }

    pub fn select_up(&mut self) {
        self.state.selection.up();
    }

    pub fn filter_changed(&mut self) {
        self.state.selection.reset();
    }

    pub fn selected_match_id(&self) -> Option<String> {
        let snapshot = self.visible_snapshot()?;
        detail_target(self.state.sport(), &snapshot, &self.state.selection)
    }

    pub fn open_detail(&self) {
        let Some(event_id) = self.selected_match_id() else {
            return;
        };
        let detail = Arc::clone(&self.detail);
        tokio::spawn(async move { detail.show(event_id).await });
    }

    pub fn dismiss_detail(&self) {
        self.detail.dismiss();
    }

    pub fn advance_animation(&mut self) {
        self.state.animation.advance();
    }
}
