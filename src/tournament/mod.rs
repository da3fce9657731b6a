// src/tournament/mod.rs

pub mod bracket;
pub mod runtime;
pub mod selection;

pub use bracket::{pair_teams, MIN_BRACKET_TEAMS};
pub use runtime::TournamentEngine;
pub use selection::{pick_teams, DEFAULT_SELECTION_SIZE};
