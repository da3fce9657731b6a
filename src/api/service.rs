// src/api/service.rs

use chrono::Duration;
use tracing::{error, info, warn};

use crate::config::{AppConfig, ConfigError};
use crate::domain::{
    normalize_code, ActivatedPlayer, CodeStatus, SoloProfile, Team, TeamListing, UserId,
};
use crate::engine::{
    validate_mmr, validate_team_name, PromoRegistry, RandomSource, RosterEngine,
};
use crate::infra::{
    Clock, CodePool, DocumentStore, JsonFileStore, SystemClock, SystemRng, TeamIdAllocator,
    TeamIdScheme, TextFileCodePool,
};
use crate::tournament::{TournamentEngine, DEFAULT_SELECTION_SIZE};

use super::auth::{AccessPolicy, AdminList};
use super::commands::Command;
use super::dto::{
    Actor, AdminStatsDto, BracketViewDto, CommandResponse, ProfileViewDto, PromoCodeDto,
    QueryResponse, SelectionReportDto, TournamentStatusDto, WinnerReportDto,
};
use super::errors::ApiError;
use super::notify::{deliver_all, LogNotifier, Notification, Notifier};
use super::queries::{build_bracket_view, Query};

/// Настройки фасада.
#[derive(Clone, Debug)]
pub struct ServiceSettings {
    /// Сколько команд отбирать на турнир.
    pub selection_size: usize,
    /// Возраст, после которого приглашение считается устаревшим.
    pub invite_ttl: Duration,
    pub team_ids: TeamIdScheme,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            selection_size: DEFAULT_SELECTION_SIZE,
            invite_ttl: Duration::hours(24),
            team_ids: TeamIdScheme::default(),
        }
    }
}

/// Фасад турнира: то, что вызывает оркестратор диалога.
///
/// Каждая операция принимает автора (`Actor`) и примитивные аргументы,
/// возвращает данные, никакой разметки.
pub struct TournamentService<S: DocumentStore, R: RandomSource> {
    store: S,
    rng: R,
    pool: Box<dyn CodePool>,
    clock: Box<dyn Clock>,
    policy: Box<dyn AccessPolicy>,
    notifier: Box<dyn Notifier>,
    settings: ServiceSettings,
}

impl TournamentService<JsonFileStore, SystemRng> {
    /// Боевой фасад: JSON-файлы в `data_dir`, пул кодов в текстовом файле.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let store = JsonFileStore::open(&config.data_dir).map_err(|source| ConfigError::Io {
            path: config.data_dir.clone(),
            source,
        })?;
        let pool = TextFileCodePool::new(
            config.promo_file.clone(),
            config.promo_prefix.clone(),
            config.promo_pool_size,
        );

        Ok(Self::new(
            store,
            SystemRng,
            Box::new(pool),
            Box::new(AdminList::new(config.admin_ids.iter().copied())),
        )
        .with_settings(config.service_settings()))
    }
}

impl<S: DocumentStore, R: RandomSource> TournamentService<S, R> {
    pub fn new(
        store: S,
        rng: R,
        pool: Box<dyn CodePool>,
        policy: Box<dyn AccessPolicy>,
    ) -> Self {
        Self {
            store,
            rng,
            pool,
            clock: Box::new(SystemClock),
            policy,
            notifier: Box::new(LogNotifier),
            settings: ServiceSettings::default(),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.policy.is_admin(user_id)
    }

    // ---------- движки поверх хранилища ----------

    pub fn roster(&mut self) -> RosterEngine<'_, S> {
        RosterEngine::new(&mut self.store, TeamIdAllocator::new(self.settings.team_ids))
    }

    pub fn promo(&mut self) -> PromoRegistry<'_, S> {
        PromoRegistry::new(&mut self.store, self.pool.as_mut())
    }

    pub fn tournament(&mut self) -> TournamentEngine<'_, S, R> {
        TournamentEngine::new(&mut self.store, &mut self.rng, self.clock.as_ref())
    }

    fn require_admin(&self, actor: &Actor) -> Result<(), ApiError> {
        if self.policy.is_admin(actor.user_id) {
            Ok(())
        } else {
            warn!(user_id = actor.user_id, "попытка админ-операции без прав");
            Err(ApiError::Forbidden)
        }
    }

    fn require_activated(&mut self, actor: &Actor) -> Result<(), ApiError> {
        if self.roster().is_activated(actor.user_id) {
            Ok(())
        } else {
            Err(ApiError::NotActivated)
        }
    }

    // ---------- промокоды ----------

    /// Создать пул кодов, если его нет.
    pub fn ensure_code_pool(&mut self) -> Result<(), ApiError> {
        self.promo().ensure_pool()?;
        Ok(())
    }

    pub fn check_code(&mut self, code: &str) -> CodeStatus {
        self.promo().check(code)
    }

    pub fn is_activated(&mut self, user_id: UserId) -> bool {
        self.roster().is_activated(user_id)
    }

    /// Активировать промокод: погасить код и записать активацию.
    ///
    /// Уже активированный пользователь код не тратит. Если активация не
    /// записалась, код возвращается в пул.
    pub fn activate(&mut self, actor: &Actor, code: &str) -> Result<ActivatedPlayer, ApiError> {
        if self.roster().is_activated(actor.user_id) {
            return Err(ApiError::AlreadyActivated);
        }

        let code = normalize_code(code);
        match self.promo().check(&code) {
            CodeStatus::NotFound => return Err(ApiError::CodeNotFound),
            CodeStatus::Used => return Err(ApiError::CodeUsed),
            CodeStatus::Valid => {}
        }

        if !self.promo().redeem(&code)? {
            return Err(ApiError::CodeUsed);
        }

        let player = ActivatedPlayer {
            username: actor.username.clone(),
            first_name: actor.first_name.clone(),
            promo_code: code.clone(),
            activation_date: self.clock.now(),
        };

        if let Err(err) = self.roster().record_activation(actor.user_id, &player) {
            error!(user_id = actor.user_id, code = %code, error = %err, "активация не записана");
            if let Err(release_err) = self.promo().release(&code) {
                error!(code = %code, error = %release_err, "промокод остался погашенным без активации");
            }
            return Err(err.into());
        }

        Ok(player)
    }

    // ---------- команды ----------

    /// Создать команду сразу после ввода названия (MMR = 0).
    pub fn register_team(&mut self, actor: &Actor, name: &str) -> Result<TeamListing, ApiError> {
        self.require_activated(actor)?;
        let name = validate_team_name(name)?;

        let team = Team::new(name, actor.user_id, actor.first_name.clone(), self.clock.now());
        let team_id = self.roster().save_team(&team)?;

        Ok(TeamListing::new(team_id, team))
    }

    /// Указать MMR своей команды. Только капитан.
    pub fn set_team_mmr(
        &mut self,
        actor: &Actor,
        team_id: &str,
        mmr: u32,
    ) -> Result<TeamListing, ApiError> {
        let team = self
            .roster()
            .team(team_id)
            .ok_or_else(|| ApiError::NotFound(format!("Команда {team_id} не найдена")))?;

        if team.captain_chat_id != actor.user_id {
            return Err(ApiError::Forbidden);
        }

        let team = self.roster().set_team_mmr(team_id, mmr)?;
        Ok(TeamListing::new(team_id, team))
    }

    pub fn join_team(&mut self, actor: &Actor, team_id: &str) -> Result<TeamListing, ApiError> {
        self.require_activated(actor)?;
        let team = self
            .roster()
            .join_team(team_id, actor.user_id, &actor.first_name)?;

        info!(team_id, user_id = actor.user_id, "второй игрок вступил в команду");
        Ok(TeamListing::new(team_id, team))
    }

    pub fn user_teams(&mut self, user_id: UserId) -> Vec<TeamListing> {
        self.roster().user_teams(user_id)
    }

    pub fn incomplete_teams(&mut self) -> Vec<TeamListing> {
        self.roster().incomplete_teams()
    }

    // ---------- анкеты ----------

    /// Создать или заменить анкету. Возвращает `(создана ли, анкета)`.
    pub fn save_solo_profile(
        &mut self,
        actor: &Actor,
        mmr: u32,
    ) -> Result<(bool, SoloProfile), ApiError> {
        self.require_activated(actor)?;
        let mmr = validate_mmr(mmr as i64)?;

        let created = self.roster().solo_profile(actor.user_id).is_none();
        let profile = SoloProfile {
            name: actor.first_name.clone(),
            username: actor.username.clone(),
            mmr,
            created_at: self.clock.now(),
            chat_id: actor.user_id,
        };

        self.roster().upsert_solo_profile(actor.user_id, &profile)?;
        Ok((created, profile))
    }

    pub fn delete_solo_profile(&mut self, actor: &Actor) -> Result<bool, ApiError> {
        Ok(self.roster().delete_solo_profile(actor.user_id)?)
    }

    pub fn profile(&mut self, actor: &Actor) -> ProfileViewDto {
        let roster = self.roster();
        ProfileViewDto {
            user_id: actor.user_id,
            activation: roster
                .activated_players()
                .shift_remove(&actor.user_id.to_string()),
            solo_profile: roster.solo_profile(actor.user_id),
            teams: roster.user_teams(actor.user_id),
        }
    }

    // ---------- сводки ----------

    pub fn status(&mut self) -> TournamentStatusDto {
        let (registered_teams, incomplete_teams, activated_players, solo_profiles) = {
            let roster = self.roster();
            (
                roster.team_count(),
                roster.incomplete_teams().len(),
                roster.activated_players().len(),
                roster.all_solo_profiles().len(),
            )
        };

        let tournament = self.tournament();
        TournamentStatusDto {
            registered_teams,
            incomplete_teams,
            selected_teams: tournament.selected_teams().len(),
            activated_players,
            solo_profiles,
            bracket_generated: !tournament.bracket().is_empty(),
            winner: tournament.winner().map(|w| w.team_id),
        }
    }

    pub fn admin_stats(&mut self, actor: &Actor) -> Result<AdminStatsDto, ApiError> {
        self.require_admin(actor)?;

        Ok(AdminStatsDto {
            status: self.status(),
            pending_invites: self.roster().pending_invite_count(),
            selected: self.tournament().selected_teams(),
        })
    }

    pub fn promo_codes(&mut self, actor: &Actor) -> Result<Vec<PromoCodeDto>, ApiError> {
        self.require_admin(actor)?;

        Ok(self
            .promo()
            .codes()
            .into_iter()
            .map(|(code, redeemed)| PromoCodeDto { code, redeemed })
            .collect())
    }

    pub fn bracket_view(&mut self) -> BracketViewDto {
        let tournament = self.tournament();
        let bracket = tournament.bracket();
        let selected = tournament.selected_teams();
        build_bracket_view(&bracket, &selected)
    }

    // ---------- админ-операции ----------

    /// Отобрать команды и уведомить капитанов.
    pub fn select_teams(
        &mut self,
        actor: &Actor,
        count: Option<usize>,
    ) -> Result<SelectionReportDto, ApiError> {
        self.require_admin(actor)?;

        let target = count.unwrap_or(self.settings.selection_size);
        if target == 0 {
            return Err(ApiError::Validation(
                "Количество команд для отбора должно быть больше нуля".into(),
            ));
        }
        let ids = self.tournament().select_teams(target)?;
        if ids.is_empty() {
            return Err(ApiError::NotFound("Нет зарегистрированных команд".into()));
        }

        let selected = self.tournament().selected_teams();
        let batch = selected
            .iter()
            .map(|l| {
                (
                    l.team.captain_chat_id,
                    Notification::TeamSelected {
                        team_id: l.team_id.clone(),
                        team_name: l.team.name.clone(),
                    },
                )
            })
            .collect();

        let notifications = deliver_all(self.notifier.as_mut(), batch);
        info!(
            notified = notifications.delivered,
            total = selected.len(),
            "капитаны отобранных команд уведомлены"
        );

        Ok(SelectionReportDto {
            selected,
            notifications,
        })
    }

    pub fn build_bracket(&mut self, actor: &Actor) -> Result<BracketViewDto, ApiError> {
        self.require_admin(actor)?;

        let mut tournament = self.tournament();
        let bracket = tournament.build_bracket()?;
        let selected = tournament.selected_teams();
        Ok(build_bracket_view(&bracket, &selected))
    }

    /// Объявить победителя. Команда должна быть в текущем отборе.
    pub fn declare_winner(
        &mut self,
        actor: &Actor,
        team_id: &str,
    ) -> Result<WinnerReportDto, ApiError> {
        self.require_admin(actor)?;

        let team = self
            .tournament()
            .selected_teams()
            .into_iter()
            .find(|l| l.team_id == team_id)
            .ok_or_else(|| ApiError::NotFound(format!("Команда {team_id} не прошла отбор")))?;

        let winner = self.tournament().record_winner(team_id)?;

        let batch = vec![(
            team.team.captain_chat_id,
            Notification::TournamentWon {
                team_id: team.team_id.clone(),
                team_name: team.team.name.clone(),
                player1: team.team.player1.clone(),
                player2: team.team.player2.clone(),
            },
        )];
        let notifications = deliver_all(self.notifier.as_mut(), batch);

        Ok(WinnerReportDto {
            winner,
            team,
            notifications,
        })
    }

    pub fn purge_stale_invites(&mut self, actor: &Actor) -> Result<usize, ApiError> {
        self.require_admin(actor)?;
        self.purge_stale_invites_internal()
    }

    /// Чистка приглашений без проверки прав (вызывается на каждом /start).
    pub fn purge_stale_invites_internal(&mut self) -> Result<usize, ApiError> {
        let now = self.clock.now();
        let ttl = self.settings.invite_ttl;
        Ok(self.roster().purge_stale_invites(now, ttl)?)
    }

    // ---------- диспетчеризация ----------

    pub fn execute(&mut self, actor: &Actor, command: Command) -> Result<CommandResponse, ApiError> {
        if command.is_admin_only() {
            self.require_admin(actor)?;
        }

        match command {
            Command::ActivateCode { code } => {
                self.activate(actor, &code).map(CommandResponse::Activated)
            }
            Command::RegisterTeam { name } => self
                .register_team(actor, &name)
                .map(CommandResponse::TeamRegistered),
            Command::SetTeamMmr { team_id, mmr } => self
                .set_team_mmr(actor, &team_id, mmr)
                .map(CommandResponse::TeamUpdated),
            Command::JoinTeam { team_id } => self
                .join_team(actor, &team_id)
                .map(CommandResponse::TeamUpdated),
            Command::SaveSoloProfile { mmr } => self
                .save_solo_profile(actor, mmr)
                .map(|(created, profile)| CommandResponse::ProfileSaved { created, profile }),
            Command::DeleteSoloProfile => self
                .delete_solo_profile(actor)
                .map(|deleted| CommandResponse::ProfileDeleted { deleted }),
            Command::SelectTeams { count } => self
                .select_teams(actor, count)
                .map(CommandResponse::TeamsSelected),
            Command::BuildBracket => self.build_bracket(actor).map(CommandResponse::BracketBuilt),
            Command::DeclareWinner { team_id } => self
                .declare_winner(actor, &team_id)
                .map(CommandResponse::WinnerDeclared),
            Command::PurgeStaleInvites => self
                .purge_stale_invites(actor)
                .map(|removed| CommandResponse::InvitesPurged { removed }),
        }
    }

    pub fn query(&mut self, actor: &Actor, query: Query) -> Result<QueryResponse, ApiError> {
        if query.is_admin_only() {
            self.require_admin(actor)?;
        }

        let response = match query {
            Query::CheckCode { code } => QueryResponse::CodeStatus(self.check_code(&code)),
            Query::IsActivated => QueryResponse::Activated(self.is_activated(actor.user_id)),
            Query::Status => QueryResponse::Status(self.status()),
            Query::AdminStats => QueryResponse::AdminStats(self.admin_stats(actor)?),
            Query::MyProfile => QueryResponse::Profile(self.profile(actor)),
            Query::MyTeams => QueryResponse::Teams(self.user_teams(actor.user_id)),
            Query::IncompleteTeams => QueryResponse::Teams(self.incomplete_teams()),
            Query::SelectedTeams => QueryResponse::Teams(self.tournament().selected_teams()),
            Query::Bracket => QueryResponse::Bracket(self.bracket_view()),
            Query::Winner => QueryResponse::Winner(self.tournament().winner()),
            Query::PromoCodes => QueryResponse::PromoCodes(self.promo_codes(actor)?),
        };

        Ok(response)
    }
}
