use serde::{Deserialize, Serialize};

use crate::domain::{
    ActivatedPlayer, CodeStatus, MatchId, SoloProfile, TeamId, TeamListing, UserId, Winner,
};

use super::notify::DeliveryReport;

/// Кто прислал событие: данные пользователя из мессенджера.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
}

impl Actor {
    pub fn new(user_id: UserId, username: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            first_name: first_name.into(),
        }
    }
}

/// Сводка по турниру (команда /status и админ-панель).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentStatusDto {
    pub registered_teams: usize,
    pub incomplete_teams: usize,
    pub selected_teams: usize,
    pub activated_players: usize,
    pub solo_profiles: usize,
    pub bracket_generated: bool,
    pub winner: Option<TeamId>,
}

/// Расширенная статистика для администратора.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminStatsDto {
    pub status: TournamentStatusDto,
    pub pending_invites: usize,
    pub selected: Vec<TeamListing>,
}

/// Профиль игрока: активация, анкета, команды.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileViewDto {
    pub user_id: UserId,
    pub activation: Option<ActivatedPlayer>,
    pub solo_profile: Option<SoloProfile>,
    pub teams: Vec<TeamListing>,
}

/// Матч сетки с данными команд из отбора.
///
/// Команда может отсутствовать, если отбор перезаписали после генерации сетки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchViewDto {
    pub match_id: MatchId,
    pub round: u32,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub team1: Option<TeamListing>,
    pub team2: Option<TeamListing>,
    pub winner: Option<TeamId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketViewDto {
    pub matches: Vec<MatchViewDto>,
    pub unpaired: Option<TeamId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionReportDto {
    pub selected: Vec<TeamListing>,
    pub notifications: DeliveryReport,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerReportDto {
    pub winner: Winner,
    pub team: TeamListing,
    pub notifications: DeliveryReport,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromoCodeDto {
    pub code: String,
    pub redeemed: bool,
}

/// Результат команды.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Промокод активирован.
    Activated(ActivatedPlayer),

    /// Команда создана (MMR ещё 0).
    TeamRegistered(TeamListing),

    /// Команда обновлена (MMR, второй игрок).
    TeamUpdated(TeamListing),

    /// Анкета создана (`created = true`) или обновлена.
    ProfileSaved { created: bool, profile: SoloProfile },

    /// `deleted = false` — анкеты не было.
    ProfileDeleted { deleted: bool },

    TeamsSelected(SelectionReportDto),

    BracketBuilt(BracketViewDto),

    WinnerDeclared(WinnerReportDto),

    InvitesPurged { removed: usize },
}

/// Результат запроса «только чтение».
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    CodeStatus(CodeStatus),
    Activated(bool),
    Status(TournamentStatusDto),
    AdminStats(AdminStatsDto),
    Profile(ProfileViewDto),
    Teams(Vec<TeamListing>),
    Bracket(BracketViewDto),
    Winner(Option<Winner>),
    PromoCodes(Vec<PromoCodeDto>),
}
