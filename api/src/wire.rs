/// Raw serde shapes for the livescore app API responses.
/// These map to the clean domain types via the mapping functions in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Ids, scores and timestamps arrive as strings on some feeds and as bare
/// numbers on others.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Int(n) => Some(*n),
            Scalar::Float(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Scores by date  (mev date API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct DateResponse {
    #[serde(rename = "Stages")]
    pub stages: Option<Vec<LsStage>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LsStage {
    #[serde(rename = "Sid")]
    pub sid: Option<Scalar>,
    #[serde(rename = "Snm")]
    pub snm: Option<String>, // stage short name
    #[serde(rename = "Cnm")]
    pub cnm: Option<String>, // country name
    #[serde(rename = "CompN")]
    pub comp_n: Option<String>, // full competition name
    #[serde(rename = "badgeUrl")]
    pub badge_url: Option<String>,
    #[serde(rename = "firstColor")]
    pub first_color: Option<String>,
    #[serde(rename = "Events")]
    pub events: Option<Vec<LsEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LsEvent {
    #[serde(rename = "Eid")]
    pub eid: Option<Scalar>,
    #[serde(rename = "T1")]
    pub t1: Option<Vec<LsTeam>>,
    #[serde(rename = "T2")]
    pub t2: Option<Vec<LsTeam>>,
    #[serde(rename = "Tr1")]
    pub tr1: Option<Scalar>,
    #[serde(rename = "Tr2")]
    pub tr2: Option<Scalar>,
    #[serde(rename = "Trh1")]
    pub trh1: Option<Scalar>,
    #[serde(rename = "Trh2")]
    pub trh2: Option<Scalar>,
    #[serde(rename = "Eps")]
    pub eps: Option<String>, // "NS", "HT", "FT", "AET", or a minute label
    #[serde(rename = "Esd")]
    pub esd: Option<Scalar>, // YYYYMMDDHHmmss or epoch
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LsTeam {
    #[serde(rename = "ID")]
    pub id: Option<Scalar>,
    #[serde(rename = "Nm")]
    pub nm: Option<String>,
    #[serde(rename = "Abr")]
    pub abr: Option<String>,
    #[serde(rename = "Img")]
    pub img: Option<String>,
    #[serde(rename = "Fc")]
    pub fc: Option<String>,
    #[serde(rename = "Sc")]
    pub sc: Option<String>,
}

// ---------------------------------------------------------------------------
// Match detail  (public scoreboard API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    #[serde(flatten)]
    pub event: LsEvent,
    #[serde(rename = "Stg")]
    pub stage: Option<LsStage>,
    #[serde(rename = "Vnm")]
    pub venue: Option<String>,
    #[serde(rename = "Incs")]
    pub incidents: Option<Vec<LsIncident>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LsIncident {
    #[serde(rename = "Min")]
    pub min: Option<Scalar>,
    #[serde(rename = "MinEx")]
    pub min_ex: Option<Scalar>, // stoppage time
    #[serde(rename = "Nm")]
    pub nm: Option<i64>, // 1 = home, 2 = away
    #[serde(rename = "IT")]
    pub it: Option<i64>, // incident type code
    #[serde(rename = "Pn")]
    pub pn: Option<String>,
}
