use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TeamId;
use crate::infra::persistence::Document;

/// Ключ счётчика команд в документе `counters`.
pub const TEAM_SEQUENCE_KEY: &str = "teams";

/// Схема выдачи id команд.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamIdScheme {
    /// Монотонный счётчик в документе `counters`.
    /// Никогда не опускается ниже максимального числового id в `teams`.
    #[default]
    Sequence,
    /// Старая схема: количество команд + 1.
    /// Совместима со старыми данными, но даёт коллизии после удалений.
    Count,
}

impl FromStr for TeamIdScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequence" => Ok(TeamIdScheme::Sequence),
            "count" => Ok(TeamIdScheme::Count),
            other => Err(format!("неизвестная схема id команд: {other:?}")),
        }
    }
}

impl fmt::Display for TeamIdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamIdScheme::Sequence => f.write_str("sequence"),
            TeamIdScheme::Count => f.write_str("count"),
        }
    }
}

/// Выдача id для новой команды.
#[derive(Clone, Copy, Debug, Default)]
pub struct TeamIdAllocator {
    scheme: TeamIdScheme,
}

impl TeamIdAllocator {
    pub fn new(scheme: TeamIdScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> TeamIdScheme {
        self.scheme
    }

    /// Следующий числовой id по текущим `teams` и `counters`.
    pub fn next_id(&self, teams: &Document, counters: &Document) -> u64 {
        match self.scheme {
            TeamIdScheme::Count => teams.len() as u64 + 1,
            TeamIdScheme::Sequence => {
                let last = counters
                    .get(TEAM_SEQUENCE_KEY)
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                let highest = teams
                    .keys()
                    .filter_map(|k| k.parse::<u64>().ok())
                    .max()
                    .unwrap_or(0);
                last.max(highest) + 1
            }
        }
    }

    pub fn next_team_id(&self, teams: &Document, counters: &Document) -> TeamId {
        self.next_id(teams, counters).to_string()
    }
}
