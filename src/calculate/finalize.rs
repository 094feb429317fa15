//! Statistics finalizer.
//!
//! Runs once after every match has been ingested. Each player's history is
//! put into begin-time order and the aggregates that need the whole history
//! are derived from it.

use tracing::{debug, info};

use crate::ingest::League;
use crate::models::{ratio, Appearance, BestPerformance, Match, Player, WindowStats, SEATS};

/// Finalize every player in the league.
pub fn finalize_league(league: &mut League, window_len: usize) {
    let (players, matches) = league.players_and_matches_mut();

    let mut windowed = 0;
    for player in players.values_mut() {
        finalize_player(player, matches, window_len);
        if player.window.is_some() {
            windowed += 1;
        }
    }

    info!(
        "Finalized {} players ({} with at least {} matches)",
        players.len(),
        windowed,
        window_len
    );
}

/// Sort one player's history and compute the derived aggregates.
pub fn finalize_player(player: &mut Player, matches: &[Match], window_len: usize) {
    // Stable: identical begin-times keep ingestion order.
    player
        .history
        .sort_by(|a, b| begin_time(matches, a).cmp(begin_time(matches, b)));

    // Equal values resolve to the earliest match, whatever the input order.
    player.best_performance = best_performance(&player.history);
    player.window = window_stats(&player.history, window_len);
    if player.window.is_none() {
        debug!(
            "{} has {} matches, below the window of {}",
            player.name,
            player.match_count(),
            window_len
        );
    }

    let count = player.match_count();
    player.average_score = ratio(player.total_score as f64, count);
    player.average_place = ratio(f64::from(player.total_place), count);

    let mut within = 0;
    player.cumulative_place_ratio[0] = 0.0;
    for k in 1..SEATS {
        within += player.place_counts[k - 1];
        player.cumulative_place_ratio[k] = ratio(f64::from(within), count);
    }
}

fn begin_time<'a>(matches: &'a [Match], appearance: &Appearance) -> &'a str {
    &matches[appearance.match_id.index()].begin_time
}

fn best_performance(history: &[Appearance]) -> Option<BestPerformance> {
    let mut best: Option<BestPerformance> = None;
    for appearance in history {
        if best.map_or(true, |b| appearance.performance > b.value) {
            best = Some(BestPerformance {
                value: appearance.performance,
                match_id: appearance.match_id,
            });
        }
    }
    best
}

/// Recent and best windows over a chronologically sorted history.
///
/// `None` when the history is shorter than `len` or `len` is zero.
fn window_stats(history: &[Appearance], len: usize) -> Option<WindowStats> {
    if len == 0 || history.len() < len {
        return None;
    }

    let recent = &history[history.len() - len..];
    let mut recent_place_counts = [0; SEATS];
    for appearance in recent {
        recent_place_counts[appearance.placement] += 1;
    }
    let recent_total_score = recent.iter().map(|a| a.score).sum();

    // Sliding sum from the earliest window forward; a later window replaces
    // the best only when strictly greater.
    let mut sum: i64 = history[..len].iter().map(|a| a.score).sum();
    let mut best_total_score = sum;
    let mut best_first_match = history[0].match_id;
    for first in 1..=history.len() - len {
        sum += history[first + len - 1].score - history[first - 1].score;
        if sum > best_total_score {
            best_total_score = sum;
            best_first_match = history[first].match_id;
        }
    }

    Some(WindowStats {
        len,
        recent_total_score,
        recent_place_counts,
        best_total_score,
        best_first_match,
    })
}
