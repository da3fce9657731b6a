use serde::{Deserialize, Serialize};

use crate::domain::TeamId;

/// Команда верхнего уровня: всё, что меняет состояние.
///
/// Автор команды (`Actor`) передаётся отдельно.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// Активировать промокод.
    ActivateCode { code: String },

    /// Создать команду, автор — капитан.
    RegisterTeam { name: String },

    /// Указать средний MMR своей команды.
    SetTeamMmr { team_id: TeamId, mmr: u32 },

    /// Вступить вторым игроком в неполную команду.
    JoinTeam { team_id: TeamId },

    /// Создать или обновить анкету соло-игрока.
    SaveSoloProfile { mmr: u32 },

    DeleteSoloProfile,

    /// Админ: отобрать команды (по умолчанию — размер из настроек).
    SelectTeams { count: Option<usize> },

    /// Админ: построить сетку по текущему отбору.
    BuildBracket,

    /// Админ: объявить победителя из отобранных команд.
    DeclareWinner { team_id: TeamId },

    /// Админ: удалить устаревшие приглашения.
    PurgeStaleInvites,
}

impl Command {
    /// Требует ли команда прав администратора.
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Command::SelectTeams { .. }
                | Command::BuildBracket
                | Command::DeclareWinner { .. }
                | Command::PurgeStaleInvites
        )
    }
}
