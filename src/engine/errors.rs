use std::io;

use thiserror::Error;

use crate::domain::{TeamId, UserId};
use crate::infra::DocumentName;

/// Ошибки движка турнира.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Название команды должно быть от {min} до {max} символов")]
    InvalidTeamName { min: usize, max: usize },

    #[error("MMR должен быть числом, получено {0:?}")]
    MmrNotANumber(String),

    #[error("MMR {value} вне диапазона {min}..={max}")]
    MmrOutOfRange { value: i64, min: u32, max: u32 },

    #[error("Команда {0} не найдена")]
    TeamNotFound(TeamId),

    #[error("В команде {0} уже два игрока")]
    TeamAlreadyComplete(TeamId),

    #[error("Игрок {0} уже капитан этой команды")]
    CannotJoinOwnTeam(UserId),

    #[error("Для сетки нужно минимум {required} команды, отобрано {selected}")]
    NotEnoughTeams { required: usize, selected: usize },

    #[error("Не удалось сохранить документ {0}")]
    Storage(DocumentName),

    #[error("Пул промокодов недоступен: {0}")]
    CodePool(#[from] io::Error),

    #[error("Ошибка сериализации записи: {0}")]
    Encode(#[from] serde_json::Error),
}

impl EngineError {
    /// Ошибка ввода пользователя: диалог остаётся в том же состоянии.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidTeamName { .. }
                | EngineError::MmrNotANumber(_)
                | EngineError::MmrOutOfRange { .. }
        )
    }
}
