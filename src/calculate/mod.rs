//! Score arithmetic.
//!
//! All scores are integers scaled by 10, so `"55.9"` is stored as `559`.
//! Performance values are scaled by 1000 relative to the nominal point
//! total, which keeps every intermediate result integral.

pub mod finalize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SEATS;

/// Errors raised while decoding score text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Malformed score: {0:?}")]
    Malformed(String),

    #[error("Score out of range: {0}")]
    OutOfRange(i64),
}

/// Parse a signed decimal with at most one fractional digit into tenths.
///
/// The fractional digit takes the sign of the text, not of the parsed integer
/// part, so `"-0.3"` yields `-3` even though `-0` is numerically zero.
pub fn parse_score(text: &str) -> Result<i64, ScoreError> {
    let malformed = || ScoreError::Malformed(text.to_string());

    let (integer_part, fraction) = match text.split_once('.') {
        Some((integer_part, fraction)) => (integer_part, Some(fraction)),
        None => (text, None),
    };

    let digits = integer_part
        .strip_prefix(&['+', '-'][..])
        .unwrap_or(integer_part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let whole: i64 = integer_part.parse().map_err(|_| malformed())?;
    let mut result = whole.checked_mul(10).ok_or_else(malformed)?;

    if let Some(fraction) = fraction {
        let tenths = match fraction.as_bytes() {
            [digit] if digit.is_ascii_digit() => i64::from(digit - b'0'),
            _ => return Err(malformed()),
        };
        if integer_part.starts_with('-') {
            result -= tenths;
        } else {
            result += tenths;
        }
    }

    Ok(result)
}

/// Placement adjustment and baseline used to turn raw scores into
/// performance values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Per-placement bonus in nominal points, index 0 = winner
    pub uma: [i64; SEATS],

    /// Even-split reference score
    pub baseline: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            uma: [40, 10, -10, -20],
            baseline: 30000,
        }
    }
}

impl ScoringRules {
    /// Performance value of a raw score at the given placement.
    pub fn performance(&self, score: i64, placement: usize) -> Result<i64, ScoreError> {
        self.uma[placement]
            .checked_mul(10)
            .and_then(|uma| score.checked_sub(uma))
            .and_then(|adjusted| adjusted.checked_mul(100))
            .and_then(|scaled| scaled.checked_add(self.baseline))
            .ok_or(ScoreError::OutOfRange(score))
    }
}
