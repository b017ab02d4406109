pub mod client;
pub mod date;
pub mod filter;
pub mod wire;

use chrono::{DateTime, Utc};

const TEAM_IMAGE_CDN: &str = "https://storage.livescore.com/images/team/medium";

// ---------------------------------------------------------------------------
// Domain types, independent of the livescore wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sport {
    #[default]
    Soccer,
    Basketball,
}

impl Sport {
    pub const ALL: [Sport; 2] = [Sport::Soccer, Sport::Basketball];

    /// Path segment used by the date endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            Sport::Soccer => "soccer",
            Sport::Basketball => "basketball",
        }
    }

    /// Numeric sport code the date endpoint expects after the date key.
    pub fn code(&self) -> u8 {
        match self {
            Sport::Soccer => 0,
            Sport::Basketball => 2,
        }
    }

    /// Only soccer events are served by the scoreboard detail endpoint.
    pub fn has_match_detail(&self) -> bool {
        matches!(self, Sport::Soccer)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sport::Soccer => "Soccer",
            Sport::Basketball => "Basketball",
        }
    }
}

/// One fetched dataset for a sport and date. Replaced wholesale on every
/// successful fetch, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSnapshot {
    /// Epoch millis at which the response was decoded.
    pub fetched_at: i64,
    pub competitions: Vec<CompetitionBlock>,
}

impl ScoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.competitions.iter().map(|c| c.matches.len()).sum()
    }

    /// Matches in display order, paired with the block they belong to.
    pub fn matches(&self) -> impl Iterator<Item = (&CompetitionBlock, &MatchEvent)> {
        self.competitions
            .iter()
            .flat_map(|block| block.matches.iter().map(move |m| (block, m)))
    }

    pub fn find_match(&self, event_id: &str) -> Option<&MatchEvent> {
        self.matches().map(|(_, m)| m).find(|m| m.id == event_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionBlock {
    pub id: String,
    pub short_name: String, // "Premier League"
    pub full_name: String,  // "England Premier League"
    pub country: String,
    pub badge: Option<String>,
    pub accent_color: Option<String>,
    pub matches: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchEvent {
    pub id: String,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_score: Option<String>, // None = unscored
    pub away_score: Option<String>,
    pub half_time: Option<(String, String)>,
    pub status: MatchStatus,
    pub starts_at: Option<DateTime<Utc>>,
}

impl MatchEvent {
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// "vs" for an unscored fixture that hasn't kicked off, "h - a" otherwise.
    pub fn display_score(&self) -> String {
        let home = self.home_score.as_deref().unwrap_or("0");
        let away = self.away_score.as_deref().unwrap_or("0");
        if self.status == MatchStatus::NotStarted && home == "0" && away == "0" {
            "vs".to_string()
        } else {
            format!("{home} - {away}")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    NotStarted,
    /// In progress; carries the provider's minute/period label ("45'", "Q3").
    Live(String),
    HalfTime,
    FullTime,
    AfterExtraTime,
    AfterPenalties,
    /// Postponed, cancelled, abandoned and friends. Never counted as live.
    Interrupted(String),
}

impl MatchStatus {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "" | "NS" => MatchStatus::NotStarted,
            "HT" => MatchStatus::HalfTime,
            "FT" => MatchStatus::FullTime,
            "AET" | "AOT" => MatchStatus::AfterExtraTime,
            "AP" => MatchStatus::AfterPenalties,
            c @ ("Postp." | "Canc." | "Aband." | "Susp." | "Int." | "Awrd." | "Del.") => {
                MatchStatus::Interrupted(c.to_string())
            }
            other => MatchStatus::Live(other.to_string()),
        }
    }

    /// Anything in progress, half time included.
    pub fn is_live(&self) -> bool {
        matches!(self, MatchStatus::Live(_) | MatchStatus::HalfTime)
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            MatchStatus::FullTime | MatchStatus::AfterExtraTime | MatchStatus::AfterPenalties
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub image: Option<String>,
    pub foreground: Option<String>, // hex with or without '#', or a named color
    pub background: Option<String>,
}

impl TeamRef {
    /// Bare `enet…` ids are served from the provider's image CDN; anything
    /// else is already a URL.
    pub fn image_url(&self) -> Option<String> {
        let img = self.image.as_deref()?;
        if img.starts_with("enet") {
            Some(format!("{TEAM_IMAGE_CDN}/{img}"))
        } else {
            Some(img.to_string())
        }
    }
}

/// Detail record for one match, fetched on demand from the scoreboard endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchDetailRecord {
    pub event: MatchEvent,
    pub competition: String,
    pub competition_full: String,
    pub country: String,
    pub venue: Option<String>,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub minute: String,
    pub side: Side,
    pub kind: IncidentKind,
    pub player: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncidentKind {
    Goal,
    OwnGoal,
    Penalty,
    YellowCard,
    RedCard,
    Substitution,
    #[default]
    Other,
}

impl IncidentKind {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentKind::Goal => "Goal",
            IncidentKind::OwnGoal => "Own goal",
            IncidentKind::Penalty => "Penalty",
            IncidentKind::YellowCard => "Yellow",
            IncidentKind::RedCard => "Red",
            IncidentKind::Substitution => "Sub",
            IncidentKind::Other => "",
        }
    }
}
