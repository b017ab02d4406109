use crate::wire::{DateResponse, LsEvent, LsIncident, LsStage, LsTeam, Scalar, ScoreboardResponse};
use crate::{
    CompetitionBlock, Incident, IncidentKind, MatchDetailRecord, MatchEvent, MatchStatus,
    ScoreSnapshot, Side, Sport, TeamRef,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const LIVESCORE_DATE: &str = "https://prod-cdn-mev-api.livescore.com/v1/api/app/date";
const LIVESCORE_SCOREBOARD: &str =
    "https://prod-cdn-public-api.livescore.com/v1/api/app/scoreboard/soccer";
const LOCALE: &str = "en";

/// Epoch values above this are millis, below are seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Where scores come from. The controllers only see this seam, so tests can
/// swap the HTTP client for a scripted source.
pub trait ScoreSource: Send + Sync + 'static {
    fn fetch_scores(
        &self,
        sport: Sport,
        date_key: &str,
    ) -> impl Future<Output = ApiResult<ScoreSnapshot>> + Send;

    fn fetch_match_detail(
        &self,
        event_id: &str,
    ) -> impl Future<Output = ApiResult<MatchDetailRecord>> + Send;
}

/// Livescore client backed by the public app endpoints.
#[derive(Debug, Clone)]
pub struct LivescoreApi {
    client: Client,
    timeout: Duration,
    date_base: String,
    detail_base: String,
}

impl Default for LivescoreApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("scoreline/0.1 (terminal live scores)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(30),
            date_base: LIVESCORE_DATE.to_string(),
            detail_base: LIVESCORE_SCOREBOARD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Network { url: String, reason: String },
    HttpStatus { url: String, code: u16 },
    Parsing { url: String, reason: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network { url, reason } => write!(f, "Network error for {url}: {reason}"),
            ApiError::HttpStatus { url, code } => write!(f, "HTTP {code} from {url}"),
            ApiError::Parsing { url, reason } => write!(f, "Parse error for {url}: {reason}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl LivescoreApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client somewhere other than the production hosts.
    pub fn with_endpoints(mut self, date_base: impl Into<String>, detail_base: impl Into<String>) -> Self {
        self.date_base = date_base.into().trim_end_matches('/').to_string();
        self.detail_base = detail_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn scores_url(&self, sport: Sport, date_key: &str) -> String {
        format!(
            "{}/{}/{date_key}/{}?locale={LOCALE}",
            self.date_base,
            sport.path(),
            sport.code()
        )
    }

    pub fn detail_url(&self, event_id: &str) -> String {
        format!("{}/{event_id}", self.detail_base)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network { url: url.to_owned(), reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus { url: url.to_owned(), code: status.as_u16() });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network { url: url.to_owned(), reason: e.to_string() })?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Parsing { url: url.to_owned(), reason: e.to_string() })
    }
}

impl ScoreSource for LivescoreApi {
    /// Fetch every competition with fixtures for `sport` on `date_key` (YYYYMMDD).
    async fn fetch_scores(&self, sport: Sport, date_key: &str) -> ApiResult<ScoreSnapshot> {
        let url = self.scores_url(sport, date_key);
        let raw: DateResponse = self
            .get(&url)
            .await
            .inspect_err(|e| warn!("scores fetch failed: {e}"))?;
        Ok(map_date_response(raw, Utc::now().timestamp_millis()))
    }

    /// Fetch the detail record (incidents, venue) for a single event.
    async fn fetch_match_detail(&self, event_id: &str) -> ApiResult<MatchDetailRecord> {
        let url = self.detail_url(event_id);
        let raw: ScoreboardResponse = self
            .get(&url)
            .await
            .inspect_err(|e| warn!("match detail fetch failed: {e}"))?;
        map_scoreboard(event_id, raw).ok_or_else(|| ApiError::Parsing {
            url,
            reason: "detail record is missing a home or away team".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mapping: livescore wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_date_response(raw: DateResponse, fetched_at: i64) -> ScoreSnapshot {
    let competitions = raw
        .stages
        .unwrap_or_default()
        .into_iter()
        .map(map_stage)
        // An empty block is never rendered, so it is not kept either.
        .filter(|block| !block.matches.is_empty())
        .collect();

    ScoreSnapshot { fetched_at, competitions }
}

fn map_stage(stage: LsStage) -> CompetitionBlock {
    let id = stage.sid.as_ref().map(Scalar::to_text).unwrap_or_default();
    let matches = stage
        .events
        .unwrap_or_default()
        .iter()
        .filter_map(|e| {
            let mapped = map_event(e);
            if mapped.is_none() {
                warn!(
                    "dropping event {} in stage {id}: expected exactly one team per side",
                    e.eid.as_ref().map(Scalar::to_text).unwrap_or_default()
                );
            }
            mapped
        })
        .collect();

    CompetitionBlock {
        short_name: stage.snm.unwrap_or_default(),
        full_name: stage.comp_n.unwrap_or_default(),
        country: stage.cnm.unwrap_or_default(),
        badge: stage.badge_url.filter(|s| !s.is_empty()),
        accent_color: stage.first_color.filter(|s| !s.is_empty()),
        id,
        matches,
    }
}

/// `None` when either side does not carry exactly one team. Doubles-style
/// events are not modelled, so they are rejected rather than truncated.
fn map_event(e: &LsEvent) -> Option<MatchEvent> {
    let home = single_team(e.t1.as_deref())?;
    let away = single_team(e.t2.as_deref())?;

    let half_time = normalize_score(e.trh1.as_ref()).zip(normalize_score(e.trh2.as_ref()));

    Some(MatchEvent {
        id: e.eid.as_ref().map(Scalar::to_text).unwrap_or_default(),
        home: map_team(home),
        away: map_team(away),
        home_score: normalize_score(e.tr1.as_ref()),
        away_score: normalize_score(e.tr2.as_ref()),
        half_time,
        status: MatchStatus::parse(e.eps.as_deref().unwrap_or_default()),
        starts_at: e.esd.as_ref().and_then(normalize_start),
    })
}

fn single_team(teams: Option<&[LsTeam]>) -> Option<&LsTeam> {
    match teams {
        Some([team]) => Some(team),
        _ => None,
    }
}

fn map_team(t: &LsTeam) -> TeamRef {
    TeamRef {
        id: t.id.as_ref().map(Scalar::to_text).unwrap_or_default(),
        name: t.nm.clone().unwrap_or_default(),
        abbreviation: t.abr.clone().unwrap_or_default(),
        image: t.img.clone().filter(|s| !s.is_empty()),
        foreground: t.fc.clone().filter(|s| !s.is_empty()),
        background: t.sc.clone().filter(|s| !s.is_empty()),
    }
}

/// "null", empty and absent all mean unscored.
fn normalize_score(raw: Option<&Scalar>) -> Option<String> {
    let text = raw?.to_text();
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Start times come as a 14-digit `YYYYMMDDHHmmss` number (UTC) or as an
/// epoch in seconds or millis.
fn normalize_start(raw: &Scalar) -> Option<DateTime<Utc>> {
    let value = raw.as_i64()?;
    if (10_000_000_000_000..100_000_000_000_000).contains(&value) {
        return NaiveDateTime::parse_from_str(&value.to_string(), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| naive.and_utc());
    }
    if value > EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

fn map_scoreboard(event_id: &str, raw: ScoreboardResponse) -> Option<MatchDetailRecord> {
    let mut event = map_event(&raw.event)?;
    if event.id.is_empty() {
        event.id = event_id.to_owned();
    }

    let stage = raw.stage.unwrap_or_default();
    let incidents = raw
        .incidents
        .unwrap_or_default()
        .iter()
        .filter_map(map_incident)
        .collect();

    Some(MatchDetailRecord {
        event,
        competition: stage.snm.unwrap_or_default(),
        competition_full: stage.comp_n.unwrap_or_default(),
        country: stage.cnm.unwrap_or_default(),
        venue: raw.venue.filter(|v| !v.trim().is_empty()),
        incidents,
    })
}

fn map_incident(raw: &LsIncident) -> Option<Incident> {
    let side = match raw.nm? {
        1 => Side::Home,
        2 => Side::Away,
        _ => return None,
    };

    let base = raw.min.as_ref().map(Scalar::to_text).unwrap_or_default();
    let minute = match raw.min_ex.as_ref().and_then(Scalar::as_i64) {
        Some(extra) if extra > 0 => format!("{base}+{extra}'"),
        _ => format!("{base}'"),
    };

    Some(Incident {
        minute,
        side,
        kind: incident_kind(raw.it.unwrap_or_default()),
        player: raw.pn.clone().unwrap_or_default(),
    })
}

fn incident_kind(code: i64) -> IncidentKind {
    match code {
        36 => IncidentKind::Goal,
        37 => IncidentKind::Penalty,
        39 => IncidentKind::OwnGoal,
        43 => IncidentKind::YellowCard,
        44 | 45 => IncidentKind::RedCard,
        63 => IncidentKind::Substitution,
        _ => IncidentKind::Other,
    }
}
