//! Per-sport list controller: owns the selected date and the fetch lifecycle,
//! and publishes a `ViewState` snapshot on every transition.
//!
//! Every fetch takes a sequence number when it starts. A completion is
//! applied only if nothing newer has started since, so a slow response for a
//! date the user already navigated away from never overwrites the screen.

use crate::state::refresher::{AutoRefresh, DEFAULT_REFRESH_EVERY, PeriodicRefresher};
use livescore_api::client::{ApiResult, ScoreSource};
use livescore_api::date::Clock;
use livescore_api::{ScoreSnapshot, Sport};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Loading,
    Success(Arc<ScoreSnapshot>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub sport: Sport,
    pub selected_date: String,
    pub phase: Phase,
    pub is_background_refreshing: bool,
    /// `selected_date` is the controller clock's today.
    pub is_today: bool,
}

impl ViewState {
    fn new(sport: Sport, today: String) -> Self {
        Self {
            sport,
            selected_date: today,
            phase: Phase::Loading,
            is_background_refreshing: false,
            is_today: true,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<ScoreSnapshot>> {
        match &self.phase {
            Phase::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    /// Date change or explicit load: shows Loading and surfaces errors.
    Visible,
    /// Manual refresh: keeps the current data on screen, swallows errors.
    Background,
    /// Timer refresh: a background refresh that only runs for today and only
    /// when nothing else is in flight.
    Tick,
}

#[derive(Debug)]
struct Inner {
    view: ViewState,
    latest_seq: u64,
    in_flight: usize,
    disposed: bool,
}

struct Shared<S, C> {
    sport: Sport,
    source: S,
    clock: C,
    inner: Mutex<Inner>,
    changes: watch::Sender<ViewState>,
    shutdown: watch::Sender<bool>,
}

pub struct ViewStateController<S: ScoreSource, C: Clock> {
    shared: Arc<Shared<S, C>>,
    refresh_every: Duration,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S: ScoreSource, C: Clock> ViewStateController<S, C> {
    pub fn new(sport: Sport, source: S, clock: C) -> Self {
        let view = ViewState::new(sport, clock.today());
        let (changes, _) = watch::channel(view.clone());
        let (shutdown, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                sport,
                source,
                clock,
                inner: Mutex::new(Inner { view, latest_seq: 0, in_flight: 0, disposed: false }),
                changes,
                shutdown,
            }),
            refresh_every: DEFAULT_REFRESH_EVERY,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_refresh_interval(mut self, every: Duration) -> Self {
        self.refresh_every = every;
        self
    }

    pub fn sport(&self) -> Sport {
        self.shared.sport
    }

    /// Kick off today's load and the auto-refresh loop. Must be called from
    /// within a tokio runtime; a second call is a no-op.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if !tasks.is_empty() || self.shared.lock().disposed {
            return;
        }

        let shared = Arc::clone(&self.shared);
        tasks.push(tokio::spawn(async move { shared.load_today().await }));
        tasks.push(PeriodicRefresher::new(Arc::clone(&self.shared), self.refresh_every).spawn());
        debug!("{} controller started", self.shared.sport.label());
    }

    pub async fn load_today(&self) {
        self.shared.load_today().await;
    }

    pub async fn select_date(&self, date_key: impl Into<String>) {
        self.shared.run(FetchKind::Visible, Some(date_key.into())).await;
    }

    pub async fn refresh(&self) {
        self.shared.run(FetchKind::Background, None).await;
    }

    pub fn state(&self) -> ViewState {
        let inner = self.shared.lock();
        self.shared.view_of(&inner)
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.changes.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }

    /// Stop the auto-refresh loop, cancel in-flight fetches and ignore
    /// anything that still manages to complete.
    pub fn dispose(&self) {
        {
            let mut inner = self.shared.lock();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
        }
        self.shared.shutdown.send_replace(true);
        for task in self.tasks.lock().unwrap_or_else(PoisonError::into_inner).drain(..) {
            task.abort();
        }
        debug!("{} controller disposed", self.shared.sport.label());
    }
}

impl<S: ScoreSource, C: Clock> Drop for ViewStateController<S, C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: ScoreSource, C: Clock> Shared<S, C> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn view_of(&self, inner: &Inner) -> ViewState {
        let mut view = inner.view.clone();
        view.is_today = view.selected_date == self.clock.today();
        view
    }

    fn publish(&self, inner: &Inner) {
        self.changes.send_replace(self.view_of(inner));
    }

    async fn load_today(&self) {
        let today = self.clock.today();
        self.run(FetchKind::Visible, Some(today)).await;
    }

    async fn run(&self, kind: FetchKind, date: Option<String>) {
        let Some((seq, date)) = self.begin(kind, date) else {
            return;
        };
        let result = self.fetch(&date).await;
        self.finish(seq, kind, &date, result);
    }

    /// Apply the start-of-fetch transition and hand out a sequence number, or
    /// `None` if this fetch should not happen at all.
    fn begin(&self, kind: FetchKind, date: Option<String>) -> Option<(u64, String)> {
        let mut inner = self.lock();
        if inner.disposed {
            return None;
        }

        match kind {
            FetchKind::Visible => {
                if let Some(date) = date {
                    inner.view.selected_date = date;
                }
                inner.view.phase = Phase::Loading;
                inner.view.is_background_refreshing = false;
            }
            FetchKind::Background | FetchKind::Tick => {
                // A visible load is already on its way with fresh data.
                if inner.view.is_loading() {
                    debug!("skipping refresh, a load is in flight");
                    return None;
                }
                if kind == FetchKind::Tick
                    && (inner.in_flight > 0 || inner.view.selected_date != self.clock.today())
                {
                    debug!(
                        "skipping tick for {} (in flight: {}, date: {})",
                        self.sport.label(),
                        inner.in_flight,
                        inner.view.selected_date
                    );
                    return None;
                }
                inner.view.is_background_refreshing = true;
            }
        }

        inner.latest_seq += 1;
        inner.in_flight += 1;
        let started = (inner.latest_seq, inner.view.selected_date.clone());
        self.publish(&inner);
        Some(started)
    }

    /// `None` when the controller was disposed mid-flight.
    async fn fetch(&self, date: &str) -> Option<ApiResult<ScoreSnapshot>> {
        let mut shutdown = self.shutdown.subscribe();
        tokio::select! {
            result = self.source.fetch_scores(self.sport, date) => Some(result),
            _ = shutdown.wait_for(|closed| *closed) => None,
        }
    }

    fn finish(&self, seq: u64, kind: FetchKind, date: &str, result: Option<ApiResult<ScoreSnapshot>>) {
        let mut inner = self.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);

        let Some(result) = result else {
            return;
        };
        if inner.disposed {
            return;
        }
        if seq != inner.latest_seq {
            debug!("discarding stale {} response for {date} (#{seq})", self.sport.label());
            return;
        }

        match (kind, result) {
            (_, Ok(snapshot)) => {
                inner.view.phase = Phase::Success(Arc::new(snapshot));
                inner.view.is_background_refreshing = false;
            }
            (FetchKind::Visible, Err(e)) => {
                inner.view.phase = Phase::Error(e.to_string());
            }
            (FetchKind::Background | FetchKind::Tick, Err(e)) => {
                warn!("background refresh for {date} failed, keeping current data: {e}");
                inner.view.is_background_refreshing = false;
            }
        }
        self.publish(&inner);
    }
}

impl<S: ScoreSource, C: Clock> AutoRefresh for Shared<S, C> {
    async fn on_tick(&self) {
        self.run(FetchKind::Tick, None).await;
    }
}
