// tests/store_tests.rs

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use tournament_engine::domain::{Team, TeamListing};
use tournament_engine::infra::{
    Document, DocumentName, DocumentStore, InMemoryDocumentStore, JsonFileStore,
};

//
// ---------- helpers ----------
//

fn open_store() -> (TempDir, JsonFileStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path().join("data")).unwrap();
    (dir, store)
}

fn team_doc() -> Document {
    let mut doc = Document::new();
    doc.insert(
        "2".into(),
        json!({
            "name": "Команда Б",
            "player1": "Петя",
            "player2": null,
            "mmr": 3000,
            "captain_chat_id": 20,
            "player2_chat_id": null,
            "status": "waiting_partner",
            "registration_date": "2024-05-01T12:00:00"
        }),
    );
    doc.insert(
        "1".into(),
        json!({
            "name": "Команда А",
            "player1": "Вася",
            "player2": "Коля",
            "mmr": 4500,
            "captain_chat_id": 10,
            "player2_chat_id": 11,
            "status": "complete",
            "registration_date": "2024-05-01T11:30:00"
        }),
    );
    doc
}

//
// ---------- JsonFileStore ----------
//

#[test]
fn missing_document_loads_as_empty() {
    let (_dir, store) = open_store();

    assert!(store.read(DocumentName::Teams).unwrap().is_none());
    assert!(store.load(DocumentName::Teams).is_empty());
}

#[test]
fn written_document_is_read_back_in_insertion_order() {
    let (dir, mut store) = open_store();
    assert!(store.save(DocumentName::Teams, &team_doc()));

    // Новый экземпляр поверх того же каталога видит те же данные.
    let reopened = JsonFileStore::open(dir.path().join("data")).unwrap();
    let doc = reopened.load(DocumentName::Teams);

    assert_eq!(doc, team_doc());
    assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["2", "1"]);
}

#[test]
fn file_is_pretty_printed_utf8_without_temp_leftovers() {
    let (_dir, mut store) = open_store();
    assert!(store.save(DocumentName::Teams, &team_doc()));

    let path = store.path_of(DocumentName::Teams);
    assert!(path.ends_with("teams.json"));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  \"2\": {"));
    assert!(raw.contains("Команда Б"));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn corrupt_document_loads_as_empty() {
    let (_dir, store) = open_store();
    fs::write(store.path_of(DocumentName::Winner), "{ not json").unwrap();

    assert!(store.read(DocumentName::Winner).is_err());
    assert!(store.load(DocumentName::Winner).is_empty());
}

#[test]
fn typed_records_skip_malformed_entries() {
    let (_dir, mut store) = open_store();
    let mut doc = team_doc();
    doc.insert("3".into(), json!({ "name": "без остальных полей" }));
    assert!(store.save(DocumentName::Teams, &doc));

    let teams = store.load_records::<Team>(DocumentName::Teams);
    assert_eq!(teams.len(), 2);
    assert_eq!(teams["1"].player2.as_deref(), Some("Коля"));
    assert_eq!(teams["2"].mmr, 3000);

    // Сырой документ по-прежнему содержит все три записи.
    assert_eq!(store.load(DocumentName::Teams).len(), 3);
}

#[test]
fn team_listing_is_flat_on_the_wire() {
    let mut store = InMemoryDocumentStore::new();
    store.write(DocumentName::Teams, &team_doc()).unwrap();

    let (id, team) = store
        .load_records::<Team>(DocumentName::Teams)
        .into_iter()
        .next()
        .unwrap();
    let listing = serde_json::to_value(TeamListing::new(id, team)).unwrap();

    assert_eq!(listing["team_id"], "2");
    assert_eq!(listing["name"], "Команда Б");
    assert_eq!(listing["status"], "waiting_partner");
    assert_eq!(listing["registration_date"], "2024-05-01T12:00:00");
}

//
// ---------- in-memory ----------
//

#[test]
fn in_memory_store_overwrites_whole_document() {
    let mut store = InMemoryDocumentStore::new();
    assert!(store.save(DocumentName::UsedPromoCodes, &team_doc()));

    let mut small = Document::new();
    small.insert("TG2024001".into(), json!(true));
    assert!(store.save(DocumentName::UsedPromoCodes, &small));

    assert_eq!(store.load(DocumentName::UsedPromoCodes), small);
}
