// src/domain/promo.rs

use serde::{Deserialize, Serialize};

/// Результат проверки промокода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    /// Кода нет в пуле.
    NotFound,
    /// Код уже погашен.
    Used,
    /// Код есть и свободен.
    Valid,
}

/// Привести ввод пользователя к виду, в котором коды лежат в пуле.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}
