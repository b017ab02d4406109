//! Scripted `ScoreSource` and fixed `Clock` shared by the controller tests.

use livescore_api::client::{ApiError, ApiResult, ScoreSource};
use livescore_api::date::Clock;
use livescore_api::{CompetitionBlock, MatchDetailRecord, MatchEvent, ScoreSnapshot, Sport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A one-block snapshot whose block id is the date key it was fetched for.
pub fn snapshot_for(date: &str) -> ScoreSnapshot {
    ScoreSnapshot {
        fetched_at: 1_704_067_200_000,
        competitions: vec![CompetitionBlock {
            id: date.to_string(),
            short_name: "League".to_string(),
            matches: vec![MatchEvent { id: format!("{date}-1"), ..Default::default() }],
            ..Default::default()
        }],
    }
}

pub fn detail_for(event_id: &str) -> MatchDetailRecord {
    MatchDetailRecord {
        event: MatchEvent { id: event_id.to_string(), ..Default::default() },
        competition: "League".to_string(),
        ..Default::default()
    }
}

type Gate<T> = oneshot::Receiver<ApiResult<T>>;

#[derive(Default)]
struct Script {
    score_gates: HashMap<String, Gate<ScoreSnapshot>>,
    detail_gates: HashMap<String, Gate<MatchDetailRecord>>,
    failure: Option<ApiError>,
    calls: Vec<String>,
    detail_calls: Vec<String>,
}

/// Answers immediately with `snapshot_for(date)` unless a gate was registered
/// for the date, in which case the answer is whatever the test sends.
#[derive(Clone, Default)]
pub struct FakeSource {
    script: Arc<Mutex<Script>>,
}

impl FakeSource {
    pub fn gate(&self, date: &str, rx: Gate<ScoreSnapshot>) {
        self.script.lock().unwrap().score_gates.insert(date.to_string(), rx);
    }

    pub fn gate_detail(&self, event_id: &str, rx: Gate<MatchDetailRecord>) {
        self.script.lock().unwrap().detail_gates.insert(event_id.to_string(), rx);
    }

    pub fn fail_with(&self, error: ApiError) {
        self.script.lock().unwrap().failure = Some(error);
    }

    pub fn succeed(&self) {
        self.script.lock().unwrap().failure = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().detail_calls.clone()
    }
}

fn dropped_gate() -> ApiError {
    ApiError::Network { url: "fake://gate".into(), reason: "gate dropped".into() }
}

impl ScoreSource for FakeSource {
    async fn fetch_scores(&self, _sport: Sport, date_key: &str) -> ApiResult<ScoreSnapshot> {
        let (gate, failure) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(date_key.to_string());
            (script.score_gates.remove(date_key), script.failure.clone())
        };
        match (gate, failure) {
            (Some(rx), _) => rx.await.unwrap_or_else(|_| Err(dropped_gate())),
            (None, Some(error)) => Err(error),
            (None, None) => Ok(snapshot_for(date_key)),
        }
    }

    async fn fetch_match_detail(&self, event_id: &str) -> ApiResult<MatchDetailRecord> {
        let (gate, failure) = {
            let mut script = self.script.lock().unwrap();
            script.detail_calls.push(event_id.to_string());
            (script.detail_gates.remove(event_id), script.failure.clone())
        };
        match (gate, failure) {
            (Some(rx), _) => rx.await.unwrap_or_else(|_| Err(dropped_gate())),
            (None, Some(error)) => Err(error),
            (None, None) => Ok(detail_for(event_id)),
        }
    }
}

/// "Today" that tests can move.
#[derive(Clone)]
pub struct FakeClock {
    today: Arc<Mutex<String>>,
}

impl FakeClock {
    pub fn new(today: &str) -> Self {
        Self { today: Arc::new(Mutex::new(today.to_string())) }
    }

    pub fn set(&self, today: &str) {
        *self.today.lock().unwrap() = today.to_string();
    }
}

impl Clock for FakeClock {
    fn today(&self) -> String {
        self.today.lock().unwrap().clone()
    }
}
