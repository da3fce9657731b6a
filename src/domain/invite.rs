// src/domain/invite.rs

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::time::iso_seconds;

/// Ожидающее приглашение в команду.
///
/// В этом крейте приглашения только читаются и чистятся,
/// остальные поля записи сохраняем как есть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PendingInvite {
    #[serde(with = "iso_seconds")]
    pub timestamp: NaiveDateTime,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PendingInvite {
    /// Старше `max_age` относительно `now` (строго больше).
    pub fn is_stale(&self, now: NaiveDateTime, max_age: Duration) -> bool {
        now - self.timestamp > max_age
    }
}
