// src/domain/bracket.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::time::iso_seconds;
use crate::domain::{MatchId, TeamId};

/// Матч первого круга.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub match_id: MatchId,
    pub team1: TeamId,
    pub team2: TeamId,
    #[serde(default)]
    pub winner: Option<TeamId>,
    pub round: u32,
}

impl Match {
    pub fn involves(&self, team_id: &str) -> bool {
        self.team1 == team_id || self.team2 == team_id
    }
}

/// Турнирная сетка: набор матчей одного круга.
///
/// `unpaired` — команда, оставшаяся без пары при нечётном числе участников.
/// В документ `bracket` она не попадает.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bracket {
    pub matches: Vec<Match>,
    pub unpaired: Option<TeamId>,
}

impl Bracket {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Все команды, попавшие в матчи.
    pub fn paired_team_ids(&self) -> Vec<&TeamId> {
        self.matches
            .iter()
            .flat_map(|m| [&m.team1, &m.team2])
            .collect()
    }

    pub fn match_by_id(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.match_id == match_id)
    }
}

/// Победитель турнира.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Winner {
    pub team_id: TeamId,
    #[serde(with = "iso_seconds")]
    pub date: NaiveDateTime,
    /// Награда болельщикам. Движок выставляет только `false`.
    #[serde(default)]
    pub fans_rewarded: bool,
}
