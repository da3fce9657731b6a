use serde::{Deserialize, Serialize};

use crate::domain::{Bracket, TeamListing};

use super::dto::{BracketViewDto, MatchViewDto};

/// Запросы «только чтение».
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Query {
    /// Проверить промокод без погашения.
    CheckCode { code: String },

    /// Активировал ли автор промокод.
    IsActivated,

    /// Публичная сводка турнира.
    Status,

    /// Админ: расширенная статистика.
    AdminStats,

    /// Профиль автора.
    MyProfile,

    /// Команды автора.
    MyTeams,

    /// Команды, которым нужен второй игрок.
    IncompleteTeams,

    /// Команды, прошедшие отбор.
    SelectedTeams,

    Bracket,

    Winner,

    /// Админ: пул промокодов с отметками о погашении.
    PromoCodes,
}

impl Query {
    pub fn is_admin_only(&self) -> bool {
        matches!(self, Query::AdminStats | Query::PromoCodes)
    }
}

/// Собрать DTO сетки, подтянув данные команд из отбора.
pub fn build_bracket_view(bracket: &Bracket, selected: &[TeamListing]) -> BracketViewDto {
    let lookup = |team_id: &str| selected.iter().find(|l| l.team_id == team_id).cloned();

    let matches = bracket
        .matches
        .iter()
        .map(|m| MatchViewDto {
            match_id: m.match_id,
            round: m.round,
            team1_id: m.team1.clone(),
            team2_id: m.team2.clone(),
            team1: lookup(&m.team1),
            team2: lookup(&m.team2),
            winner: m.winner.clone(),
        })
        .collect();

    BracketViewDto {
        matches,
        unpaired: bracket.unpaired.clone(),
    }
}
