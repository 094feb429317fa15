//! Match ingestion.
//!
//! The `League` owns every player and match seen in one run. Matches are
//! ingested one at a time in input order; players are created lazily on
//! first appearance.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::calculate::{parse_score, ScoreError, ScoringRules};
use crate::models::{Appearance, Match, MatchEntry, MatchId, Player, SEATS};
use crate::record::RawRecord;

/// Errors that can occur while ingesting a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("Player {0:?} appears more than once in the same match")]
    DuplicatePlayer(String),
}

/// Player registry and match list for one run.
#[derive(Debug, Default)]
pub struct League {
    rules: ScoringRules,
    players: BTreeMap<String, Player>,
    matches: Vec<Match>,
}

impl League {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            players: BTreeMap::new(),
            matches: Vec::new(),
        }
    }

    /// Add one match and fold it into each participant's running totals.
    ///
    /// Nothing is modified when the record is rejected.
    pub fn ingest(&mut self, record: &RawRecord) -> Result<MatchId, IngestError> {
        let mut scores = [0; SEATS];
        for (placement, (name, score_text)) in record.seats.iter().enumerate() {
            if record.seats[..placement].iter().any(|(other, _)| other == name) {
                return Err(IngestError::DuplicatePlayer(name.clone()));
            }
            scores[placement] = parse_score(score_text)?;
        }

        let match_id = MatchId::new(self.matches.len());
        let mut appearances = Vec::with_capacity(SEATS);
        for (placement, (name, _)) in record.seats.iter().enumerate() {
            let appearance = Appearance {
                match_id,
                placement,
                score: scores[placement],
                performance: self.rules.performance(scores[placement], placement)?,
            };
            if let Some(player) = self.players.get(name) {
                player.totals_with(&appearance)?;
            }
            appearances.push(appearance);
        }

        for ((name, _), appearance) in record.seats.iter().zip(appearances) {
            self.players
                .entry(name.clone())
                .or_insert_with(|| Player::new(name.clone()))
                .record(appearance, &record.begin_time)?;
        }

        self.matches.push(Match {
            begin_time: record.begin_time.clone(),
            end_time: record.end_time.clone(),
            entries: std::array::from_fn(|placement| MatchEntry {
                player: record.seats[placement].0.clone(),
                score: scores[placement],
            }),
            tag: record.tag.clone(),
            paipu: record.paipu.clone(),
        });

        debug!(
            "Ingested match {} begun {} ({} won)",
            match_id,
            record.begin_time,
            self.get_match(match_id).winner().player
        );
        Ok(match_id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Matches in ingestion order; `MatchId` indexes into this slice.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get_match(&self, id: MatchId) -> &Match {
        &self.matches[id.index()]
    }

    /// Matches sorted by begin-time, stable on ties.
    pub fn matches_chronological(&self) -> Vec<&Match> {
        let mut sorted: Vec<&Match> = self.matches.iter().collect();
        sorted.sort_by(|a, b| a.begin_time.cmp(&b.begin_time));
        sorted
    }

    pub(crate) fn players_and_matches_mut(&mut self) -> (&mut BTreeMap<String, Player>, &[Match]) {
        (&mut self.players, &self.matches)
    }
}
