// tests/dialogue_tests.rs

use chrono::NaiveDate;
use serde_json::json;

use tournament_engine::api::{Actor, AdminList, ApiError, TournamentService};
use tournament_engine::dialogue::{DialogueInput, DialogueState, ProfileAction, Reply, Session};
use tournament_engine::infra::{
    DeterministicRng, Document, DocumentName, DocumentStore, FixedClock,
    InMemoryDocumentStore, StaticCodePool,
};

type Service = TournamentService<InMemoryDocumentStore, DeterministicRng>;

fn service() -> Service {
    let now = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    TournamentService::new(
        InMemoryDocumentStore::new(),
        DeterministicRng::from_seed(3),
        Box::new(StaticCodePool::new(["TG2024001", "TG2024002"])),
        Box::new(AdminList::single(1)),
    )
    .with_clock(Box::new(FixedClock::new(now)))
}

fn text(raw: &str) -> DialogueInput {
    DialogueInput::Text(raw.to_string())
}

/// Довести сессию до главного меню.
fn activated_session(service: &mut Service, user_id: i64, code: &str) -> Session {
    let mut session = Session::new(Actor::new(user_id, "user", "Вася"));
    session.handle(service, DialogueInput::Start);
    session.handle(service, text(code));
    session.handle(service, DialogueInput::ConfirmCode);
    assert_eq!(session.state(), &DialogueState::MainMenu);
    session
}

//
// ---------- промокод ----------
//

#[test]
fn activation_dialogue() {
    let mut service = service();
    let mut session = Session::new(Actor::new(10, "vasya", "Вася"));

    assert_eq!(session.state(), &DialogueState::Idle);
    assert_eq!(session.handle(&mut service, DialogueInput::Start), Reply::AskCode);
    assert_eq!(session.state(), &DialogueState::AwaitingCode);

    assert_eq!(session.handle(&mut service, text("WRONG")), Reply::CodeNotFound);
    assert_eq!(session.state(), &DialogueState::AwaitingCode);

    assert_eq!(
        session.handle(&mut service, text(" tg2024001 ")),
        Reply::ConfirmCode {
            code: "TG2024001".into()
        }
    );

    // «Нет» возвращает к вводу кода, код не тратится.
    assert_eq!(session.handle(&mut service, DialogueInput::RejectCode), Reply::AskCode);
    assert!(service.store().load(DocumentName::UsedPromoCodes).is_empty());

    session.handle(&mut service, text("TG2024001"));
    match session.handle(&mut service, DialogueInput::ConfirmCode) {
        Reply::Activated(player) => assert_eq!(player.promo_code, "TG2024001"),
        other => panic!("неожиданный ответ {other:?}"),
    }
    assert_eq!(session.state(), &DialogueState::MainMenu);

    // После активации /start сразу ведёт в меню.
    assert_eq!(session.handle(&mut service, DialogueInput::Start), Reply::MainMenu);
}

#[test]
fn used_code_keeps_waiting_for_code() {
    let mut service = service();
    activated_session(&mut service, 10, "TG2024001");

    let mut other = Session::new(Actor::new(11, "petya", "Петя"));
    other.handle(&mut service, DialogueInput::Start);
    assert_eq!(other.handle(&mut service, text("TG2024001")), Reply::CodeUsed);
    assert_eq!(other.state(), &DialogueState::AwaitingCode);
}

#[test]
fn code_taken_between_check_and_confirm() {
    let mut service = service();
    let mut slow = Session::new(Actor::new(11, "petya", "Петя"));
    slow.handle(&mut service, DialogueInput::Start);
    slow.handle(&mut service, text("TG2024001"));

    activated_session(&mut service, 10, "TG2024001");

    assert_eq!(
        slow.handle(&mut service, DialogueInput::ConfirmCode),
        Reply::Failed(ApiError::CodeUsed)
    );
    assert_eq!(slow.state(), &DialogueState::AwaitingCode);
}

//
// ---------- команда ----------
//

#[test]
fn team_creation_dialogue() {
    let mut service = service();
    let mut session = activated_session(&mut service, 10, "TG2024001");

    assert_eq!(session.handle(&mut service, DialogueInput::CreateTeam), Reply::AskTeamName);

    // Плохое название: остаёмся в том же шаге.
    assert!(matches!(
        session.handle(&mut service, text("A")),
        Reply::InvalidInput(_)
    ));
    assert_eq!(session.state(), &DialogueState::AwaitingTeamName);

    let team_id = match session.handle(&mut service, text("Альфа")) {
        Reply::AskTeamMmr { team } => {
            assert_eq!(team.team.mmr, 0);
            team.team_id
        }
        other => panic!("неожиданный ответ {other:?}"),
    };
    assert_eq!(
        session.state(),
        &DialogueState::AwaitingTeamMmr {
            team_id: team_id.clone()
        }
    );

    assert!(matches!(
        session.handle(&mut service, text("много")),
        Reply::InvalidInput(_)
    ));
    assert!(matches!(
        session.handle(&mut service, text("-5")),
        Reply::InvalidInput(_)
    ));

    match session.handle(&mut service, text("4200")) {
        Reply::TeamCreated(team) => {
            assert_eq!(team.team_id, team_id);
            assert_eq!(team.team.mmr, 4200);
        }
        other => panic!("неожиданный ответ {other:?}"),
    }
    assert_eq!(session.state(), &DialogueState::MainMenu);

    // Одна запись, без дубликатов.
    assert_eq!(service.store().load(DocumentName::Teams).len(), 1);
}

//
// ---------- анкета ----------
//

#[test]
fn solo_profile_dialogue() {
    let mut service = service();
    let mut session = activated_session(&mut service, 10, "TG2024001");

    assert_eq!(
        session.handle(&mut service, DialogueInput::CreateProfile),
        Reply::AskSoloMmr {
            action: ProfileAction::Create
        }
    );
    assert!(matches!(
        session.handle(&mut service, text("60000")),
        Reply::InvalidInput(_)
    ));

    match session.handle(&mut service, text("3100")) {
        Reply::ProfileSaved { action, profile } => {
            assert_eq!(action, ProfileAction::Create);
            assert_eq!(profile.mmr, 3100);
        }
        other => panic!("неожиданный ответ {other:?}"),
    }

    session.handle(&mut service, DialogueInput::UpdateProfile);
    match session.handle(&mut service, text("3300")) {
        Reply::ProfileSaved { action, profile } => {
            assert_eq!(action, ProfileAction::Update);
            assert_eq!(profile.mmr, 3300);
        }
        other => panic!("неожиданный ответ {other:?}"),
    }

    assert_eq!(service.store().load(DocumentName::SoloProfiles).len(), 1);
}

//
// ---------- отмена и сброс ----------
//

#[test]
fn cancel_returns_home() {
    let mut service = service();

    let mut fresh = Session::new(Actor::new(11, "petya", "Петя"));
    fresh.handle(&mut service, DialogueInput::Start);
    fresh.handle(&mut service, text("TG2024002"));
    assert_eq!(fresh.handle(&mut service, DialogueInput::Cancel), Reply::Cancelled);
    assert_eq!(fresh.state(), &DialogueState::AwaitingCode);

    let mut session = activated_session(&mut service, 10, "TG2024001");
    session.handle(&mut service, DialogueInput::CreateTeam);
    assert_eq!(session.handle(&mut service, DialogueInput::Cancel), Reply::Cancelled);
    assert_eq!(session.state(), &DialogueState::MainMenu);
}

#[test]
fn unexpected_input_is_ignored_and_reset_clears_state() {
    let mut service = service();
    let mut session = activated_session(&mut service, 10, "TG2024001");

    assert_eq!(session.handle(&mut service, text("привет")), Reply::Ignored);
    assert_eq!(session.state(), &DialogueState::MainMenu);

    session.handle(&mut service, DialogueInput::CreateTeam);
    session.reset();
    assert_eq!(session.state(), &DialogueState::Idle);
    assert_eq!(session.handle(&mut service, DialogueInput::Start), Reply::MainMenu);
}

#[test]
fn start_drops_invites_older_than_a_day() {
    let mut service = service();
    let mut invites = Document::new();
    invites.insert("old".into(), json!({ "timestamp": "2024-04-30T10:00:00" }));
    invites.insert("fresh".into(), json!({ "timestamp": "2024-05-01T11:00:00" }));
    service
        .store_mut()
        .write(DocumentName::PendingInvites, &invites)
        .unwrap();

    let mut session = Session::new(Actor::new(11, "petya", "Петя"));
    assert_eq!(session.handle(&mut service, DialogueInput::Start), Reply::AskCode);

    let left = service.store().load(DocumentName::PendingInvites);
    assert_eq!(left.keys().map(String::as_str).collect::<Vec<_>>(), vec!["fresh"]);
}
