use livescore_api::MatchDetailRecord;
use livescore_api::client::{ApiResult, ScoreSource};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Popup lifecycle for a single match.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailPhase {
    #[default]
    Hidden,
    Loading { event_id: String },
    Success(Arc<MatchDetailRecord>),
    Error(String),
}

impl DetailPhase {
    pub fn is_visible(&self) -> bool {
        *self != DetailPhase::Hidden
    }
}

#[derive(Debug, Default)]
struct Inner {
    phase: DetailPhase,
    latest_seq: u64,
    disposed: bool,
}

pub struct MatchDetailController<S: ScoreSource> {
    source: S,
    inner: Mutex<Inner>,
    changes: watch::Sender<DetailPhase>,
    shutdown: watch::Sender<bool>,
}

impl<S: ScoreSource> MatchDetailController<S> {
    pub fn new(source: S) -> Self {
        let (changes, _) = watch::channel(DetailPhase::Hidden);
        let (shutdown, _) = watch::channel(false);
        Self { source, inner: Mutex::new(Inner::default()), changes, shutdown }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, inner: &mut Inner, phase: DetailPhase) {
        inner.phase = phase;
        self.changes.send_replace(inner.phase.clone());
    }

    /// Open the popup for `event_id` and load it. Anything already loading is
    /// superseded.
    pub async fn show(&self, event_id: impl Into<String>) {
        let event_id = event_id.into();
        let seq = {
            let mut inner = self.lock();
            if inner.disposed {
                return;
            }
            inner.latest_seq += 1;
            self.set_phase(&mut inner, DetailPhase::Loading { event_id: event_id.clone() });
            inner.latest_seq
        };

        let mut shutdown = self.shutdown.subscribe();
        let result: Option<ApiResult<MatchDetailRecord>> = tokio::select! {
            result = self.source.fetch_match_detail(&event_id) => Some(result),
            _ = shutdown.wait_for(|closed| *closed) => None,
        };
        let Some(result) = result else {
            return;
        };

        let mut inner = self.lock();
        if inner.disposed || inner.latest_seq != seq {
            debug!("discarding detail for {event_id}, popup moved on");
            return;
        }
        let phase = match result {
            Ok(detail) => DetailPhase::Success(Arc::new(detail)),
            Err(e) => DetailPhase::Error(e.to_string()),
        };
        self.set_phase(&mut inner, phase);
    }

    /// Close the popup. A response still in flight is dropped when it lands.
    pub fn dismiss(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        inner.latest_seq += 1;
        self.set_phase(&mut inner, DetailPhase::Hidden);
    }

    pub fn state(&self) -> DetailPhase {
        self.lock().phase.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailPhase> {
        self.changes.subscribe()
    }

    pub fn dispose(&self) {
        self.lock().disposed = true;
        self.shutdown.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{FakeSource, detail_for};
    use livescore_api::client::ApiError;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn show_loads_detail() {
        let source = FakeSource::default();
        let ctl = MatchDetailController::new(source.clone());
        assert_eq!(ctl.state(), DetailPhase::Hidden);

        ctl.show("1234").await;
        assert_eq!(ctl.state(), DetailPhase::Success(Arc::new(detail_for("1234"))));
        assert_eq!(source.detail_calls(), vec!["1234"]);
    }

    #[tokio::test]
    async fn failure_lands_in_popup_state() {
        let source = FakeSource::default();
        source.fail_with(ApiError::HttpStatus { url: "http://test/99".into(), code: 404 });
        let ctl = MatchDetailController::new(source);

        ctl.show("99").await;
        assert!(matches!(ctl.state(), DetailPhase::Error(ref msg) if msg.contains("404")));

        ctl.dismiss();
        assert_eq!(ctl.state(), DetailPhase::Hidden);
    }

    #[tokio::test]
    async fn dismiss_while_loading_discards_late_result() {
        let source = FakeSource::default();
        let (tx, rx) = oneshot::channel();
        source.gate_detail("1234", rx);
        let ctl = MatchDetailController::new(source);

        tokio::join!(ctl.show("1234"), async {
            assert_eq!(ctl.state(), DetailPhase::Loading { event_id: "1234".into() });
            ctl.dismiss();
            tx.send(Ok(detail_for("1234"))).unwrap();
        });

        assert_eq!(ctl.state(), DetailPhase::Hidden);
    }

    #[tokio::test]
    async fn newer_show_supersedes_older_one() {
        let source = FakeSource::default();
        let (tx, rx) = oneshot::channel();
        source.gate_detail("old", rx);
        let ctl = MatchDetailController::new(source);

        tokio::join!(ctl.show("old"), ctl.show("new"), async {
            tx.send(Ok(detail_for("old"))).unwrap();
        });

        assert_eq!(ctl.state(), DetailPhase::Success(Arc::new(detail_for("new"))));
    }

    #[tokio::test]
    async fn dispose_cancels_pending_fetch() {
        let source = FakeSource::default();
        let (_tx, rx) = oneshot::channel();
        source.gate_detail("1234", rx);
        let ctl = MatchDetailController::new(source.clone());

        tokio::join!(ctl.show("1234"), async { ctl.dispose() });
        assert_eq!(ctl.state(), DetailPhase::Loading { event_id: "1234".into() });

        ctl.show("5678").await;
        assert_eq!(source.detail_calls(), vec!["1234"]);
    }
}
