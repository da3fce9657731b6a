// src/engine/roster.rs

use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{
    ActivatedPlayer, PendingInvite, SoloProfile, Team, TeamId, TeamListing, TeamStatus, UserId,
};
use crate::engine::errors::EngineError;
use crate::engine::validation::validate_mmr;
use crate::infra::ids::TEAM_SEQUENCE_KEY;
use crate::infra::{DocumentName, DocumentStore, TeamIdAllocator, TeamIdScheme};

/// Ростер турнира:
/// - команды (`teams`);
/// - анкеты соло-игроков (`solo_profiles`);
/// - активации промокодов (`activated_players`);
/// - ожидающие приглашения (`pending_invites`), только чистка.
pub struct RosterEngine<'a, S: DocumentStore> {
    store: &'a mut S,
    ids: TeamIdAllocator,
}

impl<'a, S: DocumentStore> RosterEngine<'a, S> {
    pub fn new(store: &'a mut S, ids: TeamIdAllocator) -> Self {
        Self { store, ids }
    }

    // ---------- команды ----------

    /// Сколько команд зарегистрировано.
    pub fn team_count(&self) -> usize {
        self.store.load(DocumentName::Teams).len()
    }

    /// Все команды в порядке документа.
    pub fn all_teams(&self) -> Vec<TeamListing> {
        self.store
            .load_records::<Team>(DocumentName::Teams)
            .into_iter()
            .map(|(id, team)| TeamListing::new(id, team))
            .collect()
    }

    pub fn team(&self, team_id: &str) -> Option<Team> {
        self.store
            .load_records::<Team>(DocumentName::Teams)
            .shift_remove(team_id)
    }

    /// Сохранить новую команду и вернуть её id.
    ///
    /// При схеме `Sequence` счётчик в `counters` обновляется после записи
    /// команды; если счётчик не записался, следующий id всё равно не
    /// пересечётся с существующими ключами.
    pub fn save_team(&mut self, team: &Team) -> Result<TeamId, EngineError> {
        let mut teams = self.store.load(DocumentName::Teams);
        let mut counters = self.store.load(DocumentName::Counters);

        let next = self.ids.next_id(&teams, &counters);
        let team_id = next.to_string();

        teams.insert(team_id.clone(), serde_json::to_value(team)?);
        if !self.store.save(DocumentName::Teams, &teams) {
            return Err(EngineError::Storage(DocumentName::Teams));
        }

        if self.ids.scheme() == TeamIdScheme::Sequence {
            counters.insert(TEAM_SEQUENCE_KEY.to_string(), Value::from(next));
            if !self.store.save(DocumentName::Counters, &counters) {
                warn!(team_id = %team_id, "счётчик команд не сохранён");
            }
        }

        info!(team_id = %team_id, name = %team.name, captain = team.captain_chat_id, "команда сохранена");
        Ok(team_id)
    }

    /// Указать MMR уже сохранённой команды.
    pub fn set_team_mmr(&mut self, team_id: &str, mmr: u32) -> Result<Team, EngineError> {
        let mmr = validate_mmr(mmr as i64)?;
        self.update_team(team_id, |team| {
            team.mmr = mmr;
            Ok(())
        })
    }

    /// Вступить вторым игроком в неполную команду.
    pub fn join_team(
        &mut self,
        team_id: &str,
        user_id: UserId,
        display_name: &str,
    ) -> Result<Team, EngineError> {
        self.update_team(team_id, |team| {
            if !team.is_incomplete() {
                return Err(EngineError::TeamAlreadyComplete(team_id.to_string()));
            }
            if team.captain_chat_id == user_id {
                return Err(EngineError::CannotJoinOwnTeam(user_id));
            }

            team.player2 = Some(display_name.to_string());
            team.player2_chat_id = Some(user_id);
            team.status = TeamStatus::Complete;
            Ok(())
        })
    }

    /// Все команды пользователя (капитан или второй игрок).
    pub fn user_teams(&self, user_id: UserId) -> Vec<TeamListing> {
        self.all_teams()
            .into_iter()
            .filter(|l| l.team.has_member(user_id))
            .collect()
    }

    /// Команды без второго игрока (для «найти команду»).
    pub fn incomplete_teams(&self) -> Vec<TeamListing> {
        self.all_teams()
            .into_iter()
            .filter(|l| l.team.is_incomplete())
            .collect()
    }

    pub fn is_user_in_any_team(&self, user_id: UserId) -> bool {
        self.all_teams().iter().any(|l| l.team.has_member(user_id))
    }

    fn update_team<F>(&mut self, team_id: &str, apply: F) -> Result<Team, EngineError>
    where
        F: FnOnce(&mut Team) -> Result<(), EngineError>,
    {
        let mut teams = self.store.load(DocumentName::Teams);

        let slot = teams
            .get_mut(team_id)
            .ok_or_else(|| EngineError::TeamNotFound(team_id.to_string()))?;

        let mut team: Team = serde_json::from_value(slot.clone())
            .map_err(|_| EngineError::TeamNotFound(team_id.to_string()))?;

        apply(&mut team)?;
        *slot = serde_json::to_value(&team)?;

        if !self.store.save(DocumentName::Teams, &teams) {
            return Err(EngineError::Storage(DocumentName::Teams));
        }

        Ok(team)
    }

    // ---------- анкеты соло-игроков ----------

    /// Создать или полностью заменить анкету пользователя.
    pub fn upsert_solo_profile(
        &mut self,
        user_id: UserId,
        profile: &SoloProfile,
    ) -> Result<(), EngineError> {
        let mut profiles = self.store.load(DocumentName::SoloProfiles);
        profiles.insert(user_id.to_string(), serde_json::to_value(profile)?);

        if !self.store.save(DocumentName::SoloProfiles, &profiles) {
            return Err(EngineError::Storage(DocumentName::SoloProfiles));
        }

        info!(user_id, mmr = profile.mmr, "анкета сохранена");
        Ok(())
    }

    pub fn solo_profile(&self, user_id: UserId) -> Option<SoloProfile> {
        self.store
            .load_records::<SoloProfile>(DocumentName::SoloProfiles)
            .shift_remove(&user_id.to_string())
    }

    pub fn all_solo_profiles(&self) -> IndexMap<String, SoloProfile> {
        self.store.load_records(DocumentName::SoloProfiles)
    }

    /// Удалить анкету. `Ok(false)` — анкеты не было, запись не выполнялась.
    pub fn delete_solo_profile(&mut self, user_id: UserId) -> Result<bool, EngineError> {
        let mut profiles = self.store.load(DocumentName::SoloProfiles);

        if profiles.shift_remove(&user_id.to_string()).is_none() {
            return Ok(false);
        }

        if !self.store.save(DocumentName::SoloProfiles, &profiles) {
            return Err(EngineError::Storage(DocumentName::SoloProfiles));
        }

        info!(user_id, "анкета удалена");
        Ok(true)
    }

    // ---------- активации ----------

    pub fn is_activated(&self, user_id: UserId) -> bool {
        self.store
            .load(DocumentName::ActivatedPlayers)
            .contains_key(&user_id.to_string())
    }

    /// Записать активацию. Повторный вызов перезаписывает запись.
    pub fn record_activation(
        &mut self,
        user_id: UserId,
        player: &ActivatedPlayer,
    ) -> Result<(), EngineError> {
        let mut players = self.store.load(DocumentName::ActivatedPlayers);
        players.insert(user_id.to_string(), serde_json::to_value(player)?);

        if !self.store.save(DocumentName::ActivatedPlayers, &players) {
            return Err(EngineError::Storage(DocumentName::ActivatedPlayers));
        }

        info!(user_id, code = %player.promo_code, "игрок активирован");
        Ok(())
    }

    pub fn activated_players(&self) -> IndexMap<String, ActivatedPlayer> {
        self.store.load_records(DocumentName::ActivatedPlayers)
    }

    // ---------- приглашения ----------

    pub fn pending_invite_count(&self) -> usize {
        self.store.load(DocumentName::PendingInvites).len()
    }

    /// Удалить приглашения старше `max_age`.
    ///
    /// Документ перезаписывается, только если что-то удалено.
    /// Записи без читаемого `timestamp` не трогаем.
    pub fn purge_stale_invites(
        &mut self,
        now: NaiveDateTime,
        max_age: Duration,
    ) -> Result<usize, EngineError> {
        let mut invites = self.store.load(DocumentName::PendingInvites);
        let before = invites.len();

        invites.retain(|invite_id, invite| {
            match serde_json::from_value::<PendingInvite>(invite.clone()) {
                Ok(invite) => !invite.is_stale(now, max_age),
                Err(_) => {
                    warn!(invite_id = %invite_id, "приглашение без корректного timestamp");
                    true
                }
            }
        });

        let removed = before - invites.len();
        if removed == 0 {
            return Ok(0);
        }

        if !self.store.save(DocumentName::PendingInvites, &invites) {
            return Err(EngineError::Storage(DocumentName::PendingInvites));
        }

        info!(removed, "старые приглашения удалены");
        Ok(removed)
    }
}
