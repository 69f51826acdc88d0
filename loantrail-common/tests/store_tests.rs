//! Integration tests for the lead store's persistence behavior
//!
//! Exercises the store against the real file backend: rehydration, tolerant
//! handling of corrupt lead files, and the persist-on-every-mutation
//! contract.

use loantrail_common::model::{Lead, LeadStatus};
use loantrail_common::normalize::{normalize, LeadDraft};
use loantrail_common::storage::{FileStorage, LeadStorage};
use loantrail_common::store::{LeadStore, StatusMove};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> LeadStore {
    LeadStore::open(Box::new(FileStorage::new(dir.path().join("leads.json"))))
}

fn draft(name: &str, amount: &str) -> LeadDraft {
    LeadDraft {
        name: name.to_string(),
        loan_amount: amount.to_string(),
        ..LeadDraft::default()
    }
}

#[test]
fn test_store_starts_empty_without_file() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    assert!(store.is_empty());
}

#[test]
fn test_mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut store = open_store(&dir);
        let lead = store.create(normalize(&draft("Ann", "350000")).unwrap());
        store.create(normalize(&draft("Bob", "120000")).unwrap());
        lead.id
    };

    let store = open_store(&dir);
    assert_eq!(store.len(), 2);
    let ann = store.get(&id).unwrap();
    assert_eq!(ann.name, "Ann");
    assert_eq!(ann.loan_amount, 350000.0);
    // Most-recent-first ordering is persisted
    assert_eq!(store.leads()[0].name, "Bob");
}

#[test]
fn test_corrupt_lead_file_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("leads.json"), "{{{ not json").unwrap();
    let store = open_store(&dir);
    assert!(store.is_empty());
}

#[test]
fn test_non_array_lead_file_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("leads.json"), r#"{"name":"A"}"#).unwrap();
    let store = open_store(&dir);
    assert!(store.is_empty());
}

#[test]
fn test_delete_persists() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut store = open_store(&dir);
        store.create(normalize(&draft("Ann", "0")).unwrap()).id
    };
    {
        let mut store = open_store(&dir);
        assert!(store.delete(&id));
        assert!(!store.delete(&id));
    }
    let store = open_store(&dir);
    assert!(store.is_empty());
}

#[test]
fn test_won_close_date_persists() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut store = open_store(&dir);
        let lead = store.create(Lead {
            name: "Ann".to_string(),
            status: LeadStatus::ClearToClose,
            ..Lead::default()
        });
        store.move_status(&lead.id, StatusMove::Forward);
        lead.id
    };
    let store = open_store(&dir);
    let lead = store.get(&id).unwrap();
    assert_eq!(lead.status, LeadStatus::Won);
    assert!(lead.close_date.is_some());
    assert!(lead.created_at <= lead.updated_at);
}

#[test]
fn test_persisted_file_is_a_json_array() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    store.create(normalize(&draft("Ann", "100")).unwrap());

    let text = std::fs::read_to_string(dir.path().join("leads.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let array = value.as_array().expect("persisted collection is an array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["name"], "Ann");
    assert_eq!(array[0]["loanAmount"], 100.0);
    assert_eq!(array[0]["status"], "New");
}

#[test]
fn test_storage_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path().join("leads.json"));
    let lead = normalize(&draft("Ann", "250000")).unwrap();
    storage.save(std::slice::from_ref(&lead)).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, lead.id);
    assert_eq!(loaded[0].loan_amount, 250000.0);
}
