//! # League Report
//!
//! Aggregates four-player ranked match logs into Markdown leaderboards with
//! a shared qualification pool.
//!
//! ## Architecture
//!
//! - **record**: Line parsing, header skip and tag filtering
//! - **models**: Core data structures (matches, players, ids)
//! - **ingest**: Player registry and match ingestion
//! - **calculate**: Score codec, performance values and the statistics finalizer
//! - **leaderboard**: Ranking comparators and the qualification pool
//! - **report**: Markdown and JSON rendering
//! - **pipeline**: One end-to-end run
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod ingest;
pub mod leaderboard;
pub mod models;
pub mod pipeline;
pub mod record;
pub mod report;

pub use models::*;
