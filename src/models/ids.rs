//! Identifiers for matches.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Position of a match in the league's match list.
///
/// Players refer to matches through this index instead of holding
/// references, so the registry owns every `Match` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(usize);

impl MatchId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn paipu_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\d{6}-[[:xdigit:]]{8}-[[:xdigit:]]{4}-[[:xdigit:]]{4}-[[:xdigit:]]{4}-[[:xdigit:]]{12}$",
        )
        .expect("paipu pattern is a valid regex")
    })
}

/// Game record identifier: a six digit date followed by a UUID-shaped token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaipuId(String);

impl PaipuId {
    /// Validate and wrap a raw identifier. Returns `None` when the shape is wrong.
    pub fn parse(raw: &str) -> Option<Self> {
        paipu_pattern()
            .is_match(raw)
            .then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaipuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PaipuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaipuId({})", self.0)
    }
}
