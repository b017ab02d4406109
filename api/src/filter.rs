//! Search / live-only projection over a fetched snapshot.
//!
//! The projection is recomputed on every render, so it never touches the
//! snapshot it is given; the controllers hand out the same `Arc` to every
//! reader.

use crate::{CompetitionBlock, MatchEvent, ScoreSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub live_only: bool,
}

/// Which filters were in play when a projection came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    QueryAndLive,
    LiveOnly,
    Query,
    Unfiltered,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, live_only: bool) -> Self {
        Self { query: query.into(), live_only }
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.live_only || self.has_query()
    }

    pub fn empty_reason(&self) -> EmptyReason {
        match (self.has_query(), self.live_only) {
            (true, true) => EmptyReason::QueryAndLive,
            (false, true) => EmptyReason::LiveOnly,
            (true, false) => EmptyReason::Query,
            (false, false) => EmptyReason::Unfiltered,
        }
    }
}

pub fn apply(snapshot: &ScoreSnapshot, criteria: &FilterCriteria) -> ScoreSnapshot {
    let needle = criteria.has_query().then(|| criteria.query.to_lowercase());

    let competitions = snapshot
        .competitions
        .iter()
        .filter_map(|block| {
            let matches: Vec<MatchEvent> = block
                .matches
                .iter()
                .filter(|event| needle.as_deref().is_none_or(|n| matches_query(block, event, n)))
                .filter(|event| !criteria.live_only || event.is_live())
                .cloned()
                .collect();
            if matches.is_empty() {
                return None;
            }
            Some(CompetitionBlock { matches, ..block_header(block) })
        })
        .collect();

    ScoreSnapshot { fetched_at: snapshot.fetched_at, competitions }
}

fn matches_query(block: &CompetitionBlock, event: &MatchEvent, needle: &str) -> bool {
    [
        event.home.name.as_str(),
        event.away.name.as_str(),
        block.short_name.as_str(),
        block.full_name.as_str(),
    ]
    .iter()
    .any(|hay| hay.to_lowercase().contains(needle))
}

fn block_header(block: &CompetitionBlock) -> CompetitionBlock {
    CompetitionBlock {
        id: block.id.clone(),
        short_name: block.short_name.clone(),
        full_name: block.full_name.clone(),
        country: block.country.clone(),
        badge: block.badge.clone(),
        accent_color: block.accent_color.clone(),
        matches: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchStatus, TeamRef};

    fn team(name: &str) -> TeamRef {
        TeamRef { id: name.to_lowercase(), name: name.to_string(), ..Default::default() }
    }

    fn event(id: &str, home: &str, away: &str, status: MatchStatus) -> MatchEvent {
        MatchEvent {
            id: id.to_string(),
            home: team(home),
            away: team(away),
            status,
            ..Default::default()
        }
    }

    fn block(id: &str, short: &str, full: &str, matches: Vec<MatchEvent>) -> CompetitionBlock {
        CompetitionBlock {
            id: id.to_string(),
            short_name: short.to_string(),
            full_name: full.to_string(),
            country: "England".to_string(),
            matches,
            ..Default::default()
        }
    }

    fn sample() -> ScoreSnapshot {
        ScoreSnapshot {
            fetched_at: 1_704_110_400_000,
            competitions: vec![
                block(
                    "pl",
                    "Premier League",
                    "England Premier League",
                    vec![event("1", "Arsenal", "Chelsea", MatchStatus::NotStarted)],
                ),
                block(
                    "fa",
                    "FA Cup",
                    "England FA Cup",
                    vec![event("2", "Liverpool", "Everton", MatchStatus::Live("45'".into()))],
                ),
                block(
                    "ch",
                    "Championship",
                    "England Championship",
                    vec![
                        event("3", "Leeds", "Hull", MatchStatus::HalfTime),
                        event("4", "Stoke", "Derby", MatchStatus::FullTime),
                        event("5", "Luton", "Millwall", MatchStatus::Interrupted("Postp.".into())),
                    ],
                ),
            ],
        }
    }

    fn ids(snapshot: &ScoreSnapshot) -> Vec<&str> {
        snapshot.matches().map(|(_, m)| m.id.as_str()).collect()
    }

    #[test]
    fn query_keeps_only_matching_block() {
        let out = apply(&sample(), &FilterCriteria::new("arsenal", false));
        assert_eq!(out.competitions.len(), 1);
        assert_eq!(out.competitions[0].id, "pl");
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn query_is_case_insensitive_but_not_trimmed() {
        let out = apply(&sample(), &FilterCriteria::new("CHELSEA", false));
        assert_eq!(ids(&out), vec!["1"]);

        let out = apply(&sample(), &FilterCriteria::new("arsenal ", false));
        assert!(out.is_empty());
        assert_eq!(out.match_count(), 0);
    }

    #[test]
    fn query_matches_competition_names() {
        let out = apply(&sample(), &FilterCriteria::new("fa cup", false));
        assert_eq!(ids(&out), vec!["2"]);

        let out = apply(&sample(), &FilterCriteria::new("england champ", false));
        assert_eq!(ids(&out), vec!["3", "4", "5"]);
    }

    #[test]
    fn live_only_keeps_in_progress_and_half_time() {
        let out = apply(&sample(), &FilterCriteria::new("", true));
        assert_eq!(ids(&out), vec!["2", "3"]);
    }

    #[test]
    fn live_only_drops_not_started() {
        let snapshot = ScoreSnapshot {
            fetched_at: 0,
            competitions: vec![block(
                "x",
                "League",
                "League",
                vec![
                    event("ns", "A", "B", MatchStatus::NotStarted),
                    event("live", "C", "D", MatchStatus::parse("45'")),
                ],
            )],
        };
        let out = apply(&snapshot, &FilterCriteria::new("", true));
        assert_eq!(ids(&out), vec!["live"]);
    }

    #[test]
    fn both_filters_combine() {
        let out = apply(&sample(), &FilterCriteria::new("leeds", true));
        assert_eq!(ids(&out), vec!["3"]);

        let out = apply(&sample(), &FilterCriteria::new("stoke", true));
        assert!(out.is_empty());
    }

    #[test]
    fn no_criteria_is_identity() {
        let snapshot = sample();
        assert_eq!(apply(&snapshot, &FilterCriteria::default()), snapshot);
        assert_eq!(apply(&snapshot, &FilterCriteria::new("   ", false)), snapshot);
    }

    #[test]
    fn apply_is_idempotent_and_never_yields_empty_blocks() {
        let snapshot = sample();
        let cases = [
            FilterCriteria::new("", false),
            FilterCriteria::new("", true),
            FilterCriteria::new("e", false),
            FilterCriteria::new("e", true),
            FilterCriteria::new("zzz", false),
            FilterCriteria::new("england", true),
        ];
        for criteria in &cases {
            let once = apply(&snapshot, criteria);
            assert!(once.competitions.iter().all(|b| !b.matches.is_empty()), "{criteria:?}");
            assert_eq!(apply(&once, criteria), once, "{criteria:?}");
        }
    }

    #[test]
    fn input_snapshot_is_left_alone() {
        let snapshot = sample();
        let before = snapshot.clone();
        let _ = apply(&snapshot, &FilterCriteria::new("arsenal", true));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn empty_reason_precedence() {
        assert_eq!(FilterCriteria::new("x", true).empty_reason(), EmptyReason::QueryAndLive);
        assert_eq!(FilterCriteria::new(" ", true).empty_reason(), EmptyReason::LiveOnly);
        assert_eq!(FilterCriteria::new("x", false).empty_reason(), EmptyReason::Query);
        assert_eq!(FilterCriteria::new("", false).empty_reason(), EmptyReason::Unfiltered);
    }
}
