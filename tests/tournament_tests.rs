// tests/tournament_tests.rs

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use tournament_engine::domain::{Team, TeamStatus};
use tournament_engine::engine::EngineError;
use tournament_engine::infra::{
    DeterministicRng, Document, DocumentName, DocumentStore, FixedClock, InMemoryDocumentStore,
};
use tournament_engine::tournament::{TournamentEngine, MIN_BRACKET_TEAMS};

//
// ---------- helpers ----------
//

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Хранилище с `n` командами (id "1".."n"); чётные — неполные.
fn store_with_teams(n: usize) -> InMemoryDocumentStore {
    let mut teams = Document::new();
    for i in 1..=n {
        let mut team = Team::new(format!("Команда {i}"), i as i64 * 10, format!("Капитан {i}"), noon());
        if i % 2 == 1 {
            team.player2 = Some(format!("Напарник {i}"));
            team.player2_chat_id = Some(i as i64 * 10 + 1);
            team.status = TeamStatus::Complete;
        }
        team.mmr = 1000 * i as u32;
        teams.insert(i.to_string(), serde_json::to_value(team).unwrap());
    }

    let mut store = InMemoryDocumentStore::new();
    store.write(DocumentName::Teams, &teams).unwrap();
    store
}

fn all_distinct(ids: &[String]) -> bool {
    ids.iter().collect::<HashSet<_>>().len() == ids.len()
}

//
// ---------- отбор ----------
//

#[test]
fn small_field_is_selected_whole() {
    let mut store = store_with_teams(4);
    let mut rng = DeterministicRng::from_seed(1);
    let clock = FixedClock::new(noon());
    let mut engine = TournamentEngine::new(&mut store, &mut rng, &clock);

    let selected = engine.select_teams(5).unwrap();
    assert_eq!(selected, vec!["1", "2", "3", "4"]);
    assert_eq!(engine.selected_teams().len(), 4);
}

#[test]
fn large_field_is_cut_to_five_distinct_teams() {
    let mut store = store_with_teams(12);
    let mut rng = DeterministicRng::from_seed(42);
    let clock = FixedClock::new(noon());

    let selected = TournamentEngine::new(&mut store, &mut rng, &clock)
        .select_teams(5)
        .unwrap();
    assert_eq!(selected.len(), 5);
    assert!(all_distinct(&selected));

    let teams = store.load(DocumentName::Teams);
    let snapshot = store.load(DocumentName::SelectedTeams);
    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.keys().cloned().collect::<Vec<_>>(), selected);
    for (id, record) in &snapshot {
        assert_eq!(&teams[id], record);
    }
}

#[test]
fn incomplete_teams_are_eligible() {
    let mut store = store_with_teams(4);
    let mut rng = DeterministicRng::from_seed(3);
    let clock = FixedClock::new(noon());
    let mut engine = TournamentEngine::new(&mut store, &mut rng, &clock);

    engine.select_teams(5).unwrap();
    let incomplete = engine
        .selected_teams()
        .into_iter()
        .filter(|l| l.team.is_incomplete())
        .count();
    assert_eq!(incomplete, 2);
}

#[test]
fn empty_roster_keeps_previous_snapshot() {
    let mut store = InMemoryDocumentStore::new();
    let mut previous = Document::new();
    previous.insert("9".into(), json!({ "name": "старый отбор" }));
    store.write(DocumentName::SelectedTeams, &previous).unwrap();

    let mut rng = DeterministicRng::from_seed(1);
    let clock = FixedClock::new(noon());
    let selected = TournamentEngine::new(&mut store, &mut rng, &clock)
        .select_teams(5)
        .unwrap();

    assert!(selected.is_empty());
    assert_eq!(store.load(DocumentName::SelectedTeams), previous);
}

//
// ---------- сетка ----------
//

#[test]
fn bracket_needs_two_selected_teams() {
    for n in [0, 1] {
        let mut store = store_with_teams(n);
        let mut rng = DeterministicRng::from_seed(5);
        let clock = FixedClock::new(noon());
        let mut engine = TournamentEngine::new(&mut store, &mut rng, &clock);

        engine.select_teams(5).unwrap();
        match engine.build_bracket() {
            Err(EngineError::NotEnoughTeams { required, selected }) => {
                assert_eq!(required, MIN_BRACKET_TEAMS);
                assert_eq!(selected, n);
            }
            other => panic!("ожидали NotEnoughTeams, получили {other:?}"),
        }
        assert!(engine.bracket().is_empty());
    }
}

#[test]
fn seven_registered_give_two_matches_and_one_unpaired() {
    let mut store = store_with_teams(7);
    let mut rng = DeterministicRng::from_seed(2024);
    let clock = FixedClock::new(noon());
    let mut engine = TournamentEngine::new(&mut store, &mut rng, &clock);

    let selected = engine.select_teams(5).unwrap();
    assert_eq!(selected.len(), 5);

    let bracket = engine.build_bracket().unwrap();
    assert_eq!(bracket.len(), 2);
    assert!(bracket.unpaired.is_some());

    let mut seen: Vec<String> = bracket.paired_team_ids().into_iter().cloned().collect();
    seen.push(bracket.unpaired.clone().unwrap());
    assert!(all_distinct(&seen));
    seen.sort();
    let mut expected = selected.clone();
    expected.sort();
    assert_eq!(seen, expected);

    for (idx, m) in bracket.matches.iter().enumerate() {
        assert_eq!(m.match_id as usize, idx + 1);
        assert_eq!(m.round, 1);
        assert!(m.winner.is_none());
    }

    // Сохранённая сетка — те же матчи, без `unpaired`.
    let stored = engine.bracket();
    assert_eq!(stored.matches, bracket.matches);
    assert!(stored.unpaired.is_none());

    let raw = store.load(DocumentName::Bracket);
    assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["1", "2"]);
    assert_eq!(raw["1"]["winner"], serde_json::Value::Null);
}

#[test]
fn same_seed_gives_same_bracket() {
    let build = || {
        let mut store = store_with_teams(9);
        let mut rng = DeterministicRng::from_seed(77);
        let clock = FixedClock::new(noon());
        let mut engine = TournamentEngine::new(&mut store, &mut rng, &clock);
        engine.select_teams(5).unwrap();
        engine.build_bracket().unwrap()
    };

    assert_eq!(build(), build());
}

//
// ---------- победитель ----------
//

#[test]
fn winner_is_recorded_with_clock_time() {
    let mut store = store_with_teams(2);
    let mut rng = DeterministicRng::from_seed(1);
    let clock = FixedClock::new(noon());
    let mut engine = TournamentEngine::new(&mut store, &mut rng, &clock);

    assert!(engine.winner().is_none());

    let winner = engine.record_winner("2").unwrap();
    assert_eq!(winner.team_id, "2");
    assert_eq!(winner.date, noon());
    assert!(!winner.fans_rewarded);
    assert_eq!(engine.winner(), Some(winner));

    // Повторное объявление перезаписывает.
    engine.record_winner("1").unwrap();
    assert_eq!(engine.winner().unwrap().team_id, "1");

    let raw = store.load(DocumentName::Winner);
    assert_eq!(raw["team_id"], "1");
    assert_eq!(raw["date"], "2024-05-01T12:00:00");
    assert_eq!(raw["fans_rewarded"], false);
    assert_eq!(
        raw.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["team_id", "date", "fans_rewarded"]
    );
}
