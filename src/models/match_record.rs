//! Four-player match model.

use serde::Serialize;

use super::PaipuId;

/// Number of seats in a match. Seat index doubles as finishing placement.
pub const SEATS: usize = 4;

/// One seat of a match: who sat there and what they scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEntry {
    pub player: String,

    /// Raw score scaled by 10.
    pub score: i64,
}

/// A completed match.
///
/// `entries[0]` is the winner, `entries[3]` finished last.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    /// Opaque, lexicographically sortable start token
    pub begin_time: String,

    /// Opaque end token
    pub end_time: String,

    /// Seats in finishing order
    pub entries: [MatchEntry; SEATS],

    /// Free-form categorization
    pub tag: String,

    /// Game record identifier
    pub paipu: PaipuId,
}

impl Match {
    pub fn winner(&self) -> &MatchEntry {
        &self.entries[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, score: i64) -> MatchEntry {
        MatchEntry {
            player: player.to_string(),
            score,
        }
    }

    #[test]
    fn test_winner() {
        let m = Match {
            begin_time: "2023-05-12 20:00:00".to_string(),
            end_time: "2023-05-12 20:40:00".to_string(),
            entries: [entry("a", 559), entry("b", 47), entry("c", -190), entry("d", -416)],
            tag: "league".to_string(),
            paipu: PaipuId::parse("230512-0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0").unwrap(),
        };

        assert_eq!(m.winner().player, "a");
    }
}
