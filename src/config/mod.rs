//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::calculate::ScoringRules;
use crate::leaderboard::{LeaderboardKind, QualificationPolicy};
use crate::models::SEATS;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Predefined leaderboard line-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Best performance, placement avoidance, best consecutive window, overall average
    #[default]
    Consecutive,

    /// Best performance, recent window, average placement, overall average
    Recent,
}

impl Preset {
    pub fn leaderboards(self) -> Vec<LeaderboardKind> {
        match self {
            Preset::Consecutive => vec![
                LeaderboardKind::BestPerformance,
                LeaderboardKind::PlacementAvoidance,
                LeaderboardKind::BestWindow,
                LeaderboardKind::AverageScore,
            ],
            Preset::Recent => vec![
                LeaderboardKind::BestPerformance,
                LeaderboardKind::RecentWindow,
                LeaderboardKind::AveragePlace,
                LeaderboardKind::AverageScore,
            ],
        }
    }
}

/// Main report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Substring the tag column must contain; empty matches everything
    #[serde(default)]
    pub tag_filter: String,

    /// Matches needed for windowed leaderboards (also the window length)
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,

    /// Upper bound on qualified players across all leaderboards
    #[serde(default = "default_max_qualified")]
    pub max_qualified: usize,

    /// Per-placement adjustment in nominal points, index 0 = winner
    #[serde(default = "default_uma")]
    pub uma: [i64; SEATS],

    /// Even-split reference score
    #[serde(default = "default_baseline")]
    pub baseline: i64,

    /// End-time column value that marks the header row
    #[serde(default = "default_header_label")]
    pub header_label: String,

    /// Print the last end-time in the summary
    #[serde(default = "default_show_last_end_time")]
    pub show_last_end_time: bool,

    #[serde(default)]
    pub preset: Preset,

    /// Explicit leaderboard order; overrides `preset`
    #[serde(default)]
    pub leaderboards: Option<Vec<LeaderboardKind>>,
}

fn default_min_matches() -> usize {
    5
}

fn default_max_qualified() -> usize {
    8
}

fn default_uma() -> [i64; SEATS] {
    ScoringRules::default().uma
}

fn default_baseline() -> i64 {
    ScoringRules::default().baseline
}

fn default_header_label() -> String {
    "終了時間".to_string()
}

fn default_show_last_end_time() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tag_filter: String::new(),
            min_matches: default_min_matches(),
            max_qualified: default_max_qualified(),
            uma: default_uma(),
            baseline: default_baseline(),
            header_label: default_header_label(),
            show_last_end_time: default_show_last_end_time(),
            preset: Preset::default(),
            leaderboards: None,
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ReportConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn rules(&self) -> ScoringRules {
        ScoringRules {
            uma: self.uma,
            baseline: self.baseline,
        }
    }

    /// Leaderboards in rendering order.
    pub fn leaderboards(&self) -> Vec<LeaderboardKind> {
        self.leaderboards
            .clone()
            .unwrap_or_else(|| self.preset.leaderboards())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_matches == 0 {
            return Err(ConfigError::ValidationError(
                "min_matches must be greater than 0".to_string(),
            ));
        }

        if self.max_qualified == 0 {
            return Err(ConfigError::ValidationError(
                "max_qualified must be greater than 0".to_string(),
            ));
        }

        let boards = self.leaderboards();
        if boards.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one leaderboard is required".to_string(),
            ));
        }

        for (i, kind) in boards.iter().enumerate() {
            if boards[..i].contains(kind) {
                return Err(ConfigError::ValidationError(format!(
                    "leaderboard {} listed more than once",
                    kind
                )));
            }
        }

        // Seeding boards admit unconditionally, so they must run while the
        // pool is still empty enough to hold them.
        let first_competing = boards
            .iter()
            .position(|k| k.policy() == QualificationPolicy::Compete)
            .unwrap_or(boards.len());
        let seeds: Vec<_> = boards
            .iter()
            .enumerate()
            .filter(|(_, k)| k.policy() == QualificationPolicy::Seed)
            .collect();
        if let Some((_, late)) = seeds.iter().find(|(i, _)| *i > first_competing) {
            return Err(ConfigError::ValidationError(format!(
                "leaderboard {} must come before every competing leaderboard",
                late
            )));
        }
        if seeds.len() > self.max_qualified {
            return Err(ConfigError::ValidationError(format!(
                "{} seeding leaderboards exceed max_qualified = {}",
                seeds.len(),
                self.max_qualified
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();

        assert_eq!(config.tag_filter, "");
        assert_eq!(config.min_matches, 5);
        assert_eq!(config.max_qualified, 8);
        assert_eq!(config.uma, [40, 10, -10, -20]);
        assert_eq!(config.baseline, 30000);
        assert_eq!(config.header_label, "終了時間");
        assert_eq!(config.preset, Preset::Consecutive);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(ReportConfig::default().validate().is_ok());

        let recent = ReportConfig {
            preset: Preset::Recent,
            ..Default::default()
        };
        assert!(recent.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_window() {
        let config = ReportConfig {
            min_matches: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_qualified() {
        let config = ReportConfig {
            max_qualified: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_leaderboards() {
        let config = ReportConfig {
            leaderboards: Some(vec![]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_duplicate_leaderboard() {
        let config = ReportConfig {
            leaderboards: Some(vec![LeaderboardKind::BestWindow, LeaderboardKind::BestWindow]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_late_seed() {
        let config = ReportConfig {
            leaderboards: Some(vec![
                LeaderboardKind::BestWindow,
                LeaderboardKind::BestPerformance,
            ]),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Reference boards do not count as competing.
        let config = ReportConfig {
            leaderboards: Some(vec![
                LeaderboardKind::AverageScore,
                LeaderboardKind::BestPerformance,
            ]),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_leaderboards_override_preset() {
        let config = ReportConfig {
            preset: Preset::Recent,
            leaderboards: Some(vec![LeaderboardKind::AverageScore]),
            ..Default::default()
        };
        assert_eq!(config.leaderboards(), vec![LeaderboardKind::AverageScore]);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
tag_filter = "league"
min_matches = 3
uma = [15, 5, -5, -15]
preset = "recent"
leaderboards = ["best_performance", "average_place"]
"#
        )
        .unwrap();

        let config = ReportConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tag_filter, "league");
        assert_eq!(config.min_matches, 3);
        assert_eq!(config.max_qualified, 8);
        assert_eq!(config.rules().uma, [15, 5, -5, -15]);
        assert_eq!(config.rules().baseline, 30000);
        assert_eq!(
            config.leaderboards(),
            vec![LeaderboardKind::BestPerformance, LeaderboardKind::AveragePlace]
        );
    }

    #[test]
    fn test_config_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_matches = 0").unwrap();
        assert!(matches!(
            ReportConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_matches = \"five\"").unwrap();
        assert!(matches!(
            ReportConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = ReportConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: ReportConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.min_matches, parsed.min_matches);
        assert_eq!(config.uma, parsed.uma);
    }
}
