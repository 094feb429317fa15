//! Core data models for the league.

mod ids;
mod match_record;
mod player;

pub use ids::*;
pub use match_record::*;
pub use player::*;
