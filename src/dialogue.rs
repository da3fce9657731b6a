//! Диалог регистрации одного пользователя как явная машина состояний.
//!
//! Состояние живёт в `Session`, которую оркестратор хранит на стороне
//! мессенджера и передаёт в каждый вызов. На диск оно не пишется.
//!
//! Переходы:
//!   `AwaitingCode → AwaitingCodeConfirmation → MainMenu`
//!   `MainMenu → AwaitingTeamName → AwaitingTeamMmr → MainMenu`
//!   `MainMenu → AwaitingSoloMmr → MainMenu`

use std::mem;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{Actor, ApiError, TournamentService};
use crate::domain::{normalize_code, ActivatedPlayer, CodeStatus, SoloProfile, TeamId, TeamListing};
use crate::engine::{parse_mmr, RandomSource};
use crate::infra::DocumentStore;

/// Создание или обновление анкеты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProfileAction {
    Create,
    Update,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DialogueState {
    /// Диалог не начат (или сброшен после ошибки).
    Idle,
    AwaitingCode,
    /// Код проверен, ждём подтверждения.
    AwaitingCodeConfirmation { code: String },
    MainMenu,
    AwaitingTeamName,
    /// Команда уже сохранена с MMR = 0, ждём MMR.
    AwaitingTeamMmr { team_id: TeamId },
    AwaitingSoloMmr { action: ProfileAction },
}

/// Событие от пользователя: текст или нажатая кнопка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DialogueInput {
    Start,
    Text(String),
    ConfirmCode,
    RejectCode,
    CreateTeam,
    CreateProfile,
    UpdateProfile,
    Cancel,
}

/// Что показать пользователю. Текст и кнопки рисует оркестратор.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Reply {
    AskCode,
    CodeNotFound,
    CodeUsed,
    ConfirmCode { code: String },
    Activated(ActivatedPlayer),
    MainMenu,
    AskTeamName,
    AskTeamMmr { team: TeamListing },
    TeamCreated(TeamListing),
    AskSoloMmr { action: ProfileAction },
    ProfileSaved {
        action: ProfileAction,
        profile: SoloProfile,
    },
    /// Ошибка ввода, состояние не меняется.
    InvalidInput(String),
    Failed(ApiError),
    Cancelled,
    /// Событие не имеет смысла в текущем состоянии.
    Ignored,
}

/// Сессия диалога одного пользователя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    actor: Actor,
    state: DialogueState,
}

impl Session {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            state: DialogueState::Idle,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    /// Сбросить контекст (внешний слой делает это при любой необработанной ошибке,
    /// после чего просит пользователя начать заново).
    pub fn reset(&mut self) {
        self.state = DialogueState::Idle;
    }

    /// Обработать одно событие.
    pub fn handle<S, R>(&mut self, service: &mut TournamentService<S, R>, input: DialogueInput) -> Reply
    where
        S: DocumentStore,
        R: RandomSource,
    {
        let state = mem::replace(&mut self.state, DialogueState::Idle);
        let (next, reply) = step(&self.actor, service, state, input);
        self.state = next;
        reply
    }
}

fn home<S: DocumentStore, R: RandomSource>(
    actor: &Actor,
    service: &mut TournamentService<S, R>,
) -> DialogueState {
    if service.is_activated(actor.user_id) {
        DialogueState::MainMenu
    } else {
        DialogueState::AwaitingCode
    }
}

fn step<S: DocumentStore, R: RandomSource>(
    actor: &Actor,
    service: &mut TournamentService<S, R>,
    state: DialogueState,
    input: DialogueInput,
) -> (DialogueState, Reply) {
    use DialogueInput as In;
    use DialogueState as St;

    match (state, input) {
        (_, In::Start) => {
            if let Err(err) = service.purge_stale_invites_internal() {
                warn!(user_id = actor.user_id, error = %err, "чистка приглашений не удалась");
            }
            match home(actor, service) {
                St::MainMenu => (St::MainMenu, Reply::MainMenu),
                other => (other, Reply::AskCode),
            }
        }

        (_, In::Cancel) => (home(actor, service), Reply::Cancelled),

        // ---------- промокод ----------
        (St::AwaitingCode, In::Text(raw)) => match service.check_code(&raw) {
            CodeStatus::NotFound => (St::AwaitingCode, Reply::CodeNotFound),
            CodeStatus::Used => (St::AwaitingCode, Reply::CodeUsed),
            CodeStatus::Valid => {
                let code = normalize_code(&raw);
                (
                    St::AwaitingCodeConfirmation { code: code.clone() },
                    Reply::ConfirmCode { code },
                )
            }
        },

        (St::AwaitingCodeConfirmation { code }, In::ConfirmCode) => {
            match service.activate(actor, &code) {
                Ok(player) => (St::MainMenu, Reply::Activated(player)),
                Err(ApiError::AlreadyActivated) => {
                    (St::MainMenu, Reply::Failed(ApiError::AlreadyActivated))
                }
                Err(err) => (St::AwaitingCode, Reply::Failed(err)),
            }
        }

        (St::AwaitingCodeConfirmation { .. }, In::RejectCode) => (St::AwaitingCode, Reply::AskCode),

        // ---------- команда ----------
        (St::MainMenu, In::CreateTeam) => (St::AwaitingTeamName, Reply::AskTeamName),

        (St::AwaitingTeamName, In::Text(raw)) => match service.register_team(actor, &raw) {
            Ok(team) => (
                St::AwaitingTeamMmr {
                    team_id: team.team_id.clone(),
                },
                Reply::AskTeamMmr { team },
            ),
            Err(err) if err.is_retryable_input() => {
                (St::AwaitingTeamName, Reply::InvalidInput(err.to_string()))
            }
            Err(ApiError::StorageFailure) => {
                (St::AwaitingTeamName, Reply::Failed(ApiError::StorageFailure))
            }
            Err(err) => (home(actor, service), Reply::Failed(err)),
        },

        (St::AwaitingTeamMmr { team_id }, In::Text(raw)) => match parse_mmr(&raw) {
            Err(err) => (
                St::AwaitingTeamMmr { team_id },
                Reply::InvalidInput(err.to_string()),
            ),
            Ok(mmr) => match service.set_team_mmr(actor, &team_id, mmr) {
                Ok(team) => (St::MainMenu, Reply::TeamCreated(team)),
                Err(ApiError::StorageFailure) => (
                    St::AwaitingTeamMmr { team_id },
                    Reply::Failed(ApiError::StorageFailure),
                ),
                Err(err) => (St::MainMenu, Reply::Failed(err)),
            },
        },

        // ---------- анкета ----------
        (St::MainMenu, In::CreateProfile) => (
            St::AwaitingSoloMmr {
                action: ProfileAction::Create,
            },
            Reply::AskSoloMmr {
                action: ProfileAction::Create,
            },
        ),

        (St::MainMenu, In::UpdateProfile) => (
            St::AwaitingSoloMmr {
                action: ProfileAction::Update,
            },
            Reply::AskSoloMmr {
                action: ProfileAction::Update,
            },
        ),

        (St::AwaitingSoloMmr { action }, In::Text(raw)) => match parse_mmr(&raw) {
            Err(err) => (
                St::AwaitingSoloMmr { action },
                Reply::InvalidInput(err.to_string()),
            ),
            Ok(mmr) => match service.save_solo_profile(actor, mmr) {
                Ok((_, profile)) => (St::MainMenu, Reply::ProfileSaved { action, profile }),
                Err(ApiError::StorageFailure) => (
                    St::AwaitingSoloMmr { action },
                    Reply::Failed(ApiError::StorageFailure),
                ),
                Err(err) => (home(actor, service), Reply::Failed(err)),
            },
        },

        (state, _) => (state, Reply::Ignored),
    }
}
