// src/domain/player.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::time::iso_seconds;
use crate::domain::UserId;

/// Игрок, активировавший промокод. Запись создаётся один раз.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivatedPlayer {
    #[serde(default)]
    pub username: String,
    pub first_name: String,
    pub promo_code: String,
    #[serde(with = "iso_seconds")]
    pub activation_date: NaiveDateTime,
}

/// Анкета соло-игрока, который ищет напарника.
///
/// Одна анкета на пользователя, обновление заменяет её целиком.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoloProfile {
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub mmr: u32,
    #[serde(with = "iso_seconds")]
    pub created_at: NaiveDateTime,
    pub chat_id: UserId,
}
