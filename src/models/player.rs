//! Per-player running statistics.

use serde::Serialize;

use super::{MatchId, SEATS};
use crate::calculate::ScoreError;

/// A player's seat in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub match_id: MatchId,

    /// 0-indexed finishing position
    pub placement: usize,

    /// Raw score scaled by 10
    pub score: i64,

    /// Placement-adjusted performance value
    pub performance: i64,
}

/// Highest single-match performance and where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestPerformance {
    pub value: i64,
    pub match_id: MatchId,
}

/// Windowed aggregates, present once a player reaches the minimum sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    /// Number of matches per window
    pub len: usize,

    /// Score sum over the most recent `len` matches
    pub recent_total_score: i64,

    /// Placement counts over the most recent `len` matches
    pub recent_place_counts: [u32; SEATS],

    /// Highest score sum over any `len` consecutive matches
    pub best_total_score: i64,

    /// First match of the best window
    pub best_first_match: MatchId,
}

impl WindowStats {
    pub fn recent_average_score(&self) -> f64 {
        ratio(self.recent_total_score as f64, self.len)
    }

    pub fn best_average_score(&self) -> f64 {
        ratio(self.best_total_score as f64, self.len)
    }
}

/// Everything known about one player.
///
/// The running fields are maintained during ingestion; the derived block at
/// the bottom is filled by the finalizer once the full history is known.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub name: String,

    /// Matches played. Chronological only after finalization.
    #[serde(skip)]
    pub history: Vec<Appearance>,

    pub total_performance: i64,
    pub best_performance: Option<BestPerformance>,
    pub total_score: i64,

    /// `place_counts[k]` = finishes in position k
    pub place_counts: [u32; SEATS],
    pub total_place: u32,

    /// Lexicographically greatest begin-time seen
    pub last_begin_time: String,

    pub average_score: f64,
    pub average_place: f64,

    /// `cumulative_place_ratio[k]` = share of matches finished within the top k.
    /// Index 0 is always zero.
    pub cumulative_place_ratio: [f64; SEATS],

    pub window: Option<WindowStats>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Vec::new(),
            total_performance: 0,
            best_performance: None,
            total_score: 0,
            place_counts: [0; SEATS],
            total_place: 0,
            last_begin_time: String::new(),
            average_score: 0.0,
            average_place: 0.0,
            cumulative_place_ratio: [0.0; SEATS],
            window: None,
        }
    }

    pub fn match_count(&self) -> usize {
        self.history.len()
    }

    /// Running performance and score totals after folding in `appearance`.
    pub fn totals_with(&self, appearance: &Appearance) -> Result<(i64, i64), ScoreError> {
        let out_of_range = || ScoreError::OutOfRange(appearance.score);
        let performance = self
            .total_performance
            .checked_add(appearance.performance)
            .ok_or_else(out_of_range)?;
        let score = self
            .total_score
            .checked_add(appearance.score)
            .ok_or_else(out_of_range)?;
        Ok((performance, score))
    }

    /// Fold one match into the running totals.
    ///
    /// The player is left unchanged when a total would overflow.
    pub fn record(&mut self, appearance: Appearance, begin_time: &str) -> Result<(), ScoreError> {
        let (total_performance, total_score) = self.totals_with(&appearance)?;

        self.total_performance = total_performance;
        let improves = match self.best_performance {
            Some(best) => appearance.performance > best.value,
            None => true,
        };
        if improves {
            self.best_performance = Some(BestPerformance {
                value: appearance.performance,
                match_id: appearance.match_id,
            });
        }

        self.total_score = total_score;
        self.place_counts[appearance.placement] += 1;
        self.total_place += appearance.placement as u32;

        if self.last_begin_time.is_empty() || begin_time > self.last_begin_time.as_str() {
            self.last_begin_time = begin_time.to_string();
        }

        self.history.push(appearance);
        Ok(())
    }
}

/// `numerator / count`, NaN when `count` is zero.
pub fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        numerator / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appearance(index: usize, placement: usize, score: i64, performance: i64) -> Appearance {
        Appearance {
            match_id: MatchId::new(index),
            placement,
            score,
            performance,
        }
    }

    #[test]
    fn test_new_player_is_empty() {
        let player = Player::new("alice");
        assert_eq!(player.match_count(), 0);
        assert!(player.best_performance.is_none());
        assert!(player.window.is_none());
        assert_eq!(player.place_counts, [0; SEATS]);
    }

    #[test]
    fn test_record_accumulates() {
        let mut player = Player::new("alice");
        player.record(appearance(0, 0, 559, 45900), "2023-05-12 20:00").unwrap();
        player.record(appearance(1, 3, -416, 8400), "2023-05-12 21:00").unwrap();

        assert_eq!(player.match_count(), 2);
        assert_eq!(player.total_score, 143);
        assert_eq!(player.total_performance, 54300);
        assert_eq!(player.place_counts, [1, 0, 0, 1]);
        assert_eq!(player.total_place, 3);
        assert_eq!(player.last_begin_time, "2023-05-12 21:00");
        assert_eq!(
            player.best_performance,
            Some(BestPerformance {
                value: 45900,
                match_id: MatchId::new(0)
            })
        );
    }

    #[test]
    fn test_record_first_value_always_wins() {
        let mut player = Player::new("bob");
        player.record(appearance(0, 3, -900, -62000), "a").unwrap();
        assert_eq!(player.best_performance.unwrap().value, -62000);
    }

    #[test]
    fn test_record_equal_performance_keeps_first() {
        let mut player = Player::new("bob");
        player.record(appearance(0, 1, 47, 24700), "b").unwrap();
        player.record(appearance(1, 1, 47, 24700), "a").unwrap();

        assert_eq!(player.best_performance.unwrap().match_id, MatchId::new(0));
    }

    #[test]
    fn test_last_begin_time_is_lexicographic_max() {
        let mut player = Player::new("carol");
        player.record(appearance(0, 1, 0, 0), "2023-05-12 21:00").unwrap();
        player.record(appearance(1, 1, 0, 0), "2023-05-12 20:00").unwrap();
        assert_eq!(player.last_begin_time, "2023-05-12 21:00");
    }

    #[test]
    fn test_record_overflow_leaves_player_unchanged() {
        let mut player = Player::new("dave");
        player
            .record(appearance(0, 0, 10, i64::MAX - 5), "a")
            .unwrap();

        let err = player.record(appearance(1, 0, 10, 10), "b").unwrap_err();
        assert_eq!(err, ScoreError::OutOfRange(10));
        assert_eq!(player.match_count(), 1);
        assert_eq!(player.total_score, 10);
        assert_eq!(player.total_performance, i64::MAX - 5);
        assert_eq!(player.last_begin_time, "a");
    }

    #[test]
    fn test_ratio_zero_count_is_nan() {
        assert!(ratio(10.0, 0).is_nan());
        assert_eq!(ratio(10.0, 4), 2.5);
    }
}
