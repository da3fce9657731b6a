// src/domain/team.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::time::iso_seconds;
use crate::domain::{TeamId, UserId};

/// Статус набора команды.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    /// Капитан ждёт второго игрока.
    WaitingPartner,
    /// Второй игрок найден.
    Complete,
}

/// Команда из двух игроков.
///
/// Поля названы так же, как ключи в `teams.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    /// Название (2–30 символов).
    pub name: String,
    /// Отображаемое имя капитана.
    pub player1: String,
    #[serde(default)]
    pub player2: Option<String>,
    /// Средний MMR команды. 0, пока капитан его не указал.
    #[serde(default)]
    pub mmr: u32,
    pub captain_chat_id: UserId,
    #[serde(default)]
    pub player2_chat_id: Option<UserId>,
    pub status: TeamStatus,
    #[serde(with = "iso_seconds")]
    pub registration_date: NaiveDateTime,
}

impl Team {
    /// Новая команда с одним капитаном, без MMR.
    pub fn new(
        name: impl Into<String>,
        captain_chat_id: UserId,
        captain_name: impl Into<String>,
        registration_date: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            player1: captain_name.into(),
            player2: None,
            mmr: 0,
            captain_chat_id,
            player2_chat_id: None,
            status: TeamStatus::WaitingPartner,
            registration_date,
        }
    }

    /// Команда неполная, пока нет второго игрока.
    pub fn is_incomplete(&self) -> bool {
        self.player2_chat_id.is_none()
    }

    /// Пользователь — капитан или второй игрок.
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.captain_chat_id == user_id || self.player2_chat_id == Some(user_id)
    }
}

/// Команда вместе со своим ключом из документа.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamListing {
    pub team_id: TeamId,
    #[serde(flatten)]
    pub team: Team,
}

impl TeamListing {
    pub fn new(team_id: impl Into<TeamId>, team: Team) -> Self {
        Self {
            team_id: team_id.into(),
            team,
        }
    }
}
