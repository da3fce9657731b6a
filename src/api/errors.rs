use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineError;

/// Ошибки внешнего API (то, что оркестратор диалога показывает пользователю).
#[derive(Clone, Debug, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Команда доступна только администратору.
    #[error("У вас нет прав для этой команды")]
    Forbidden,

    /// Пользователь ещё не активировал промокод.
    #[error("Сначала активируй промокод")]
    NotActivated,

    /// Пользователь уже активировал промокод.
    #[error("Промокод уже активирован")]
    AlreadyActivated,

    #[error("Промокод не найден")]
    CodeNotFound,

    #[error("Промокод уже использован")]
    CodeUsed,

    /// Неправильный ввод (название, MMR). Можно повторить ввод.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Действие невозможно в текущем состоянии записи.
    #[error("{0}")]
    Conflict(String),

    #[error("Недостаточно команд для генерации сетки (нужно минимум {required}, отобрано {selected})")]
    NotEnoughTeams { required: usize, selected: usize },

    /// Ошибка хранилища: пользователю — общее «попробуй ещё раз».
    #[error("Операция не удалась, попробуй ещё раз")]
    StorageFailure,

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl ApiError {
    /// Ошибка ввода: диалог остаётся в том же состоянии.
    pub fn is_retryable_input(&self) -> bool {
        matches!(
            self,
            ApiError::Validation(_) | ApiError::CodeNotFound | ApiError::CodeUsed
        )
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        if err.is_validation() {
            return ApiError::Validation(message);
        }

        match err {
            EngineError::TeamNotFound(_) => ApiError::NotFound(message),
            EngineError::TeamAlreadyComplete(_) | EngineError::CannotJoinOwnTeam(_) => {
                ApiError::Conflict(message)
            }
            EngineError::NotEnoughTeams { required, selected } => {
                ApiError::NotEnoughTeams { required, selected }
            }
            EngineError::Storage(_) | EngineError::CodePool(_) => ApiError::StorageFailure,
            _ => ApiError::Internal(message),
        }
    }
}
