//! Report rendering.
//!
//! Leaderboards are first flattened into owned tables, which can then be
//! written as Markdown or serialized as JSON.

pub mod markdown;

use std::fmt;

use serde::Serialize;

use crate::ingest::League;
use crate::leaderboard::{Leaderboard, LeaderboardKind, QualificationMark, QualificationPool};
use crate::models::Player;

/// Column alignment in the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn marker(self) -> &'static str {
        match self {
            Align::Left => ":---",
            Align::Center => ":---:",
            Align::Right => "---:",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub header: String,
    pub align: Align,
}

fn column(header: &str, align: Align) -> Column {
    Column {
        header: header.to_string(),
        align,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub rank: usize,
    pub player: String,
    pub mark: QualificationMark,
    pub cells: Vec<String>,
}

/// One rendered leaderboard. `columns` excludes the rank and player columns.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub kind: LeaderboardKind,
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_matches: usize,
    pub total_players: usize,

    /// End-time of the latest-beginning match
    pub last_end_time: Option<String>,
}

/// The complete output of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub tables: Vec<Table>,

    /// Qualified players in the order they qualified
    pub qualified: Vec<String>,
}

impl Report {
    pub fn new(
        league: &League,
        boards: &[Leaderboard<'_>],
        pool: &QualificationPool,
        window_len: usize,
        show_last_end_time: bool,
    ) -> Self {
        let last_end_time = if show_last_end_time {
            league
                .matches_chronological()
                .last()
                .map(|m| m.end_time.clone())
        } else {
            None
        };

        Self {
            summary: Summary {
                total_matches: league.matches().len(),
                total_players: league.player_count(),
                last_end_time,
            },
            tables: boards
                .iter()
                .map(|board| table(board, league, window_len))
                .collect(),
            qualified: pool.members().to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

/// Markdown rendering.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        match &self.summary.last_end_time {
            Some(end) => writeln!(
                f,
                "Matches counted: {} (finished through {})",
                self.summary.total_matches, end
            )?,
            None => writeln!(f, "Matches counted: {}", self.summary.total_matches)?,
        }
        writeln!(f)?;
        writeln!(f, "- **Bold players** qualified through that leaderboard.")?;
        writeln!(
            f,
            "- _Italic players_ already qualified through another leaderboard and are passed over there."
        )?;

        for table in &self.tables {
            writeln!(f)?;
            writeln!(f, "{}", table.title)?;
            writeln!(f)?;

            let headers: Vec<&str> = table.columns.iter().map(|c| c.header.as_str()).collect();
            let aligns: Vec<&str> = table.columns.iter().map(|c| c.align.marker()).collect();
            writeln!(f, "| Rank | Player | {} |", headers.join(" | "))?;
            writeln!(f, "| ---: | :--- | {} |", aligns.join(" | "))?;

            for row in &table.rows {
                let name = markdown::escape(&row.player);
                let name = match row.mark {
                    QualificationMark::Qualified => markdown::bold(&name),
                    QualificationMark::QualifiedElsewhere => markdown::italic(&name),
                    QualificationMark::Unmarked => name,
                };
                writeln!(f, "| {} | {} | {} |", row.rank, name, row.cells.join(" | "))?;
            }
        }

        Ok(())
    }
}

fn title(kind: LeaderboardKind, n: usize) -> String {
    match kind {
        LeaderboardKind::BestPerformance => "Best single performance".to_string(),
        LeaderboardKind::PlacementAvoidance => {
            format!("Last-place avoidance (min {} matches)", n)
        }
        LeaderboardKind::BestWindow => {
            format!("Best {}-match streak average (min {} matches)", n, n)
        }
        LeaderboardKind::AveragePlace => format!("Average placement (min {} matches)", n),
        LeaderboardKind::RecentWindow => {
            format!("Last {} matches total score (min {} matches)", n, n)
        }
        LeaderboardKind::AverageScore => "(Reference) Average score".to_string(),
    }
}

fn columns(kind: LeaderboardKind) -> Vec<Column> {
    let places = || {
        ["1st", "2nd", "3rd", "4th"]
            .into_iter()
            .map(|h| column(h, Align::Right))
    };

    match kind {
        LeaderboardKind::BestPerformance => vec![
            column("Best performance", Align::Right),
            column("Match began", Align::Center),
        ],
        LeaderboardKind::PlacementAvoidance => vec![
            column("Avoided 4th", Align::Right),
            column("Avoided 3rd-4th", Align::Right),
            column("Avoided 2nd-4th", Align::Right),
            column("Last match began", Align::Center),
        ],
        LeaderboardKind::BestWindow => vec![
            column("Total score", Align::Right),
            column("Average score", Align::Right),
            column("Streak began", Align::Center),
        ],
        LeaderboardKind::AveragePlace => {
            let mut cols = vec![
                column("Average place", Align::Right),
                column("Matches", Align::Right),
            ];
            cols.extend(places());
            cols.push(column("Last match began", Align::Center));
            cols
        }
        LeaderboardKind::RecentWindow => {
            let mut cols = vec![
                column("Total score", Align::Right),
                column("Average score", Align::Right),
            ];
            cols.extend(places());
            cols.push(column("Last match began", Align::Center));
            cols
        }
        LeaderboardKind::AverageScore => {
            let mut cols = vec![
                column("Total score", Align::Right),
                column("Average score", Align::Right),
                column("Matches", Align::Right),
            ];
            cols.extend(places());
            cols.push(column("Average place", Align::Right));
            cols
        }
    }
}

/// Scaled-by-10 score as a two-decimal point total.
fn points(scaled: f64) -> String {
    format!("{:.2}", scaled / 10.0)
}

fn cells(kind: LeaderboardKind, player: &Player, league: &League) -> Vec<String> {
    const MISSING: &str = "-";
    let counts = |c: &[u32]| c.iter().map(|n| n.to_string()).collect::<Vec<_>>();

    match kind {
        LeaderboardKind::BestPerformance => match player.best_performance {
            Some(best) => vec![
                best.value.to_string(),
                league.get_match(best.match_id).begin_time.clone(),
            ],
            None => vec![MISSING.to_string(), MISSING.to_string()],
        },
        LeaderboardKind::PlacementAvoidance => vec![
            format!("{:.2}", player.cumulative_place_ratio[3]),
            format!("{:.2}", player.cumulative_place_ratio[2]),
            format!("{:.2}", player.cumulative_place_ratio[1]),
            player.last_begin_time.clone(),
        ],
        LeaderboardKind::BestWindow => match player.window {
            Some(w) => vec![
                points(w.best_total_score as f64),
                points(w.best_average_score()),
                league.get_match(w.best_first_match).begin_time.clone(),
            ],
            None => vec![MISSING.to_string(); 3],
        },
        LeaderboardKind::AveragePlace => {
            let mut row = vec![
                format!("{:.2}", player.average_place + 1.0),
                player.match_count().to_string(),
            ];
            row.extend(counts(&player.place_counts));
            row.push(player.last_begin_time.clone());
            row
        }
        LeaderboardKind::RecentWindow => match player.window {
            Some(w) => {
                let mut row = vec![
                    points(w.recent_total_score as f64),
                    points(w.recent_average_score()),
                ];
                row.extend(counts(&w.recent_place_counts));
                row.push(player.last_begin_time.clone());
                row
            }
            None => vec![MISSING.to_string(); 7],
        },
        LeaderboardKind::AverageScore => {
            let mut row = vec![
                points(player.total_score as f64),
                points(player.average_score),
                player.match_count().to_string(),
            ];
            row.extend(counts(&player.place_counts));
            row.push(format!("{:.2}", player.average_place + 1.0));
            row
        }
    }
}

fn table(board: &Leaderboard<'_>, league: &League, window_len: usize) -> Table {
    Table {
        kind: board.kind,
        title: title(board.kind, window_len),
        columns: columns(board.kind),
        rows: board
            .standings
            .iter()
            .map(|s| Row {
                rank: s.rank,
                player: s.player.name.clone(),
                mark: s.mark,
                cells: cells(board.kind, s.player, league),
            })
            .collect(),
    }
}
