//! Leaderboards and qualification.
//!
//! Each leaderboard filters the finalized players, orders them with its own
//! comparator and then offers its leader a place in the shared
//! qualification pool. Only rank 1 is ever considered; a leader who already
//! qualified elsewhere is marked as such and the runner-up is not promoted.

mod pool;

pub use pool::*;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ingest::League;
use crate::models::Player;

/// How a leaderboard interacts with the qualification pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualificationPolicy {
    /// Leader qualifies even if the pool is full
    Seed,

    /// Leader qualifies while the pool has room
    Compete,

    /// Never touches the pool
    Reference,
}

/// Available rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardKind {
    /// Highest single-match performance value
    BestPerformance,

    /// Share of matches finished above 4th, then above 3rd, then 1st
    PlacementAvoidance,

    /// Highest score over any window of consecutive matches
    BestWindow,

    /// Lowest average placement
    AveragePlace,

    /// Highest score over the most recent window
    RecentWindow,

    /// Highest average score over all matches
    AverageScore,
}

impl fmt::Display for LeaderboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeaderboardKind::BestPerformance => "best_performance",
            LeaderboardKind::PlacementAvoidance => "placement_avoidance",
            LeaderboardKind::BestWindow => "best_window",
            LeaderboardKind::AveragePlace => "average_place",
            LeaderboardKind::RecentWindow => "recent_window",
            LeaderboardKind::AverageScore => "average_score",
        };
        write!(f, "{}", name)
    }
}

impl LeaderboardKind {
    pub fn policy(self) -> QualificationPolicy {
        match self {
            LeaderboardKind::BestPerformance => QualificationPolicy::Seed,
            LeaderboardKind::AverageScore => QualificationPolicy::Reference,
            _ => QualificationPolicy::Compete,
        }
    }

    /// Whether players below the minimum match count are excluded.
    pub fn requires_min_matches(self) -> bool {
        !matches!(
            self,
            LeaderboardKind::BestPerformance | LeaderboardKind::AverageScore
        )
    }

    /// Total order over players: better first.
    pub fn compare(self, a: &Player, b: &Player, league: &League) -> Ordering {
        let primary = match self {
            LeaderboardKind::BestPerformance => {
                let value = |p: &Player| p.best_performance.map(|best| best.value);
                let begun = |p: &Player| {
                    p.best_performance
                        .map(|best| league.get_match(best.match_id).begin_time.as_str())
                };
                return value(b)
                    .cmp(&value(a))
                    .then_with(|| begun(a).cmp(&begun(b)))
                    .then_with(|| a.name.cmp(&b.name));
            }
            LeaderboardKind::PlacementAvoidance => (1..=3)
                .rev()
                .map(|k| b.cumulative_place_ratio[k].total_cmp(&a.cumulative_place_ratio[k]))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
            LeaderboardKind::BestWindow => {
                let total = |p: &Player| p.window.map(|w| w.best_total_score);
                total(b).cmp(&total(a))
            }
            LeaderboardKind::AveragePlace => a
                .average_place
                .total_cmp(&b.average_place)
                .then_with(|| b.match_count().cmp(&a.match_count())),
            LeaderboardKind::RecentWindow => {
                let total = |p: &Player| p.window.map(|w| w.recent_total_score);
                total(b).cmp(&total(a))
            }
            LeaderboardKind::AverageScore => b.average_score.total_cmp(&a.average_score),
        };

        primary
            .then_with(|| a.last_begin_time.cmp(&b.last_begin_time))
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// How a row's player is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationMark {
    /// Qualified through this leaderboard
    Qualified,

    /// Qualified through an earlier leaderboard
    QualifiedElsewhere,

    Unmarked,
}

/// One ranked row.
#[derive(Debug, Clone)]
pub struct Standing<'a> {
    /// 1-based
    pub rank: usize,
    pub player: &'a Player,
    pub mark: QualificationMark,
}

/// A ranked view over the league.
#[derive(Debug, Clone)]
pub struct Leaderboard<'a> {
    pub kind: LeaderboardKind,
    pub standings: Vec<Standing<'a>>,
}

/// Rank the league for one leaderboard and settle its leader's qualification.
pub fn build_leaderboard<'a>(
    kind: LeaderboardKind,
    league: &'a League,
    min_matches: usize,
    pool: &mut QualificationPool,
) -> Leaderboard<'a> {
    let mut players: Vec<&Player> = league
        .players()
        .filter(|p| !kind.requires_min_matches() || p.match_count() >= min_matches)
        .collect();
    players.sort_by(|a, b| kind.compare(a, b, league));

    let mut standings: Vec<Standing<'a>> = players
        .into_iter()
        .enumerate()
        .map(|(i, player)| Standing {
            rank: i + 1,
            player,
            mark: QualificationMark::Unmarked,
        })
        .collect();

    match standings.first_mut() {
        Some(leader) => {
            leader.mark = pool.settle(kind.policy(), &leader.player.name);
            debug!(
                "{}: leader {} marked {:?}",
                kind, leader.player.name, leader.mark
            );
        }
        None => warn!("{}: no eligible players", kind),
    }

    Leaderboard { kind, standings }
}

/// Build leaderboards in order, threading one qualification pool through.
pub fn build_leaderboards<'a>(
    kinds: &[LeaderboardKind],
    league: &'a League,
    min_matches: usize,
    pool: &mut QualificationPool,
) -> Vec<Leaderboard<'a>> {
    let boards: Vec<_> = kinds
        .iter()
        .map(|&kind| build_leaderboard(kind, league, min_matches, pool))
        .collect();

    info!(
        "Built {} leaderboards, {} of {} qualification slots used",
        boards.len(),
        pool.len(),
        pool.capacity()
    );
    boards
}
