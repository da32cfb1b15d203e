#![allow(clippy::unwrap_used)]

use super::persist::{Backend, FileBackend, MemBackend, Theme};
use super::*;
use crate::models::TxnType;

fn make_txn(id: &str, date: &str, kind: TxnType, amount: f64) -> Transaction {
    Transaction {
        id: id.into(),
        date: date.into(),
        note: "Test".into(),
        amount,
        kind,
        category: "General".into(),
        savings: 0.0,
    }
}

fn open_mem() -> (Store, MemBackend) {
    let backend = MemBackend::new();
    let store = Store::open(Box::new(backend.clone()));
    (store, backend)
}

// ── Upsert ────────────────────────────────────────────────────

#[test]
fn test_upsert_assigns_id_when_empty() {
    let (mut store, _) = open_mem();
    let stored = store
        .upsert_txn(make_txn("", "2024-01-15", TxnType::Expense, 4.5))
        .unwrap();
    assert!(!stored.id.is_empty());
    assert_eq!(store.list_txns(None).len(), 1);
    assert_eq!(store.list_txns(None)[0].id, stored.id);
}

#[test]
fn test_upsert_replaces_wholesale_by_id() {
    let (mut store, _) = open_mem();
    let stored = store
        .upsert_txn(make_txn("", "2024-01-15", TxnType::Expense, 4.5))
        .unwrap();

    let mut replacement = make_txn(&stored.id, "2024-01-20", TxnType::Income, 100.0);
    replacement.note = "Updated".into();
    replacement.savings = 10.0;
    store.upsert_txn(replacement.clone()).unwrap();

    let all = store.list_txns(None);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], replacement);
}

#[test]
fn test_upsert_unknown_id_is_a_noop() {
    let (mut store, _) = open_mem();
    store
        .upsert_txn(make_txn("", "2024-01-15", TxnType::Expense, 4.5))
        .unwrap();
    // A non-empty id that matches nothing neither replaces nor appends.
    store
        .upsert_txn(make_txn("ghost", "2024-02-01", TxnType::Expense, 1.0))
        .unwrap();
    let all = store.list_txns(None);
    assert_eq!(all.len(), 1);
    assert!(all.iter().all(|t| t.id != "ghost"));
}

#[test]
fn test_new_ids_are_distinct() {
    let mut seen = std::collections::HashSet::new();
    for _ in 0..100 {
        let id = new_id();
        assert!(!id.is_empty());
        assert!(seen.insert(id));
    }
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_removes_record() {
    let (mut store, _) = open_mem();
    let stored = store
        .upsert_txn(make_txn("", "2024-01-15", TxnType::Expense, 4.5))
        .unwrap();
    store.delete_txn(&stored.id).unwrap();
    assert!(store.list_txns(None).is_empty());
}

#[test]
fn test_delete_missing_id_is_a_noop() {
    let (mut store, _) = open_mem();
    store
        .upsert_txn(make_txn("", "2024-01-15", TxnType::Expense, 4.5))
        .unwrap();
    store.delete_txn("missing").unwrap();
    assert_eq!(store.list_txns(None).len(), 1);
}

// ── Listing ───────────────────────────────────────────────────

#[test]
fn test_list_filters_by_month_prefix() {
    let (mut store, _) = open_mem();
    for date in ["2024-01-10", "2024-01-20", "2024-02-05"] {
        store
            .upsert_txn(make_txn("", date, TxnType::Expense, 1.0))
            .unwrap();
    }
    assert_eq!(store.list_txns(Some("2024-01")).len(), 2);
    assert_eq!(store.list_txns(Some("2024-02")).len(), 1);
    assert_eq!(store.list_txns(Some("2025")).len(), 0);
    assert_eq!(store.list_txns(None).len(), 3);
}

#[test]
fn test_list_sorts_by_date_ascending() {
    let (mut store, _) = open_mem();
    for date in ["2024-01-20", "2024-01-05", "2024-01-12"] {
        store
            .upsert_txn(make_txn("", date, TxnType::Expense, 1.0))
            .unwrap();
    }
    let dates: Vec<String> = store
        .list_txns(None)
        .iter()
        .map(|t| t.date.clone())
        .collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-12", "2024-01-20"]);
}

#[test]
fn test_list_breaks_date_ties_by_id() {
    let (mut store, _) = open_mem();
    store
        .merge_txns(vec![
            make_txn("b", "2024-01-15", TxnType::Expense, 1.0),
            make_txn("a", "2024-01-15", TxnType::Expense, 2.0),
        ])
        .unwrap();
    let ids: Vec<String> = store.list_txns(None).iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_all_txns_keeps_store_order() {
    let (mut store, _) = open_mem();
    store
        .merge_txns(vec![
            make_txn("z", "2024-01-20", TxnType::Expense, 1.0),
            make_txn("a", "2024-01-05", TxnType::Expense, 2.0),
        ])
        .unwrap();
    // Unsorted accessor preserves insertion order for export.
    let ids: Vec<&str> = store.all_txns().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);
}

// ── Merge ─────────────────────────────────────────────────────

#[test]
fn test_merge_replaces_existing_and_appends_new() {
    let (mut store, _) = open_mem();
    store
        .merge_txns(vec![make_txn("a", "2024-01-05", TxnType::Expense, 2.0)])
        .unwrap();

    let mut update = make_txn("a", "2024-01-06", TxnType::Expense, 3.0);
    update.note = "Replaced".into();
    let (added, replaced) = store
        .merge_txns(vec![update, make_txn("b", "2024-01-07", TxnType::Income, 9.0)])
        .unwrap();

    assert_eq!((added, replaced), (1, 1));
    let all = store.list_txns(None);
    assert_eq!(all.len(), 2);
    let a = all.iter().find(|t| t.id == "a").unwrap();
    assert_eq!(a.note, "Replaced");
    assert_eq!(a.amount, 3.0);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_unset_reads_zero() {
    let (store, _) = open_mem();
    assert_eq!(store.get_budget("2024-01"), 0.0);
}

#[test]
fn test_budget_set_and_get() {
    let (mut store, _) = open_mem();
    assert_eq!(store.set_budget("2024-01", 500.0).unwrap(), 500.0);
    assert_eq!(store.get_budget("2024-01"), 500.0);
    assert_eq!(store.get_budget("2024-02"), 0.0);
}

#[test]
fn test_budget_clamps_invalid_values() {
    let (mut store, _) = open_mem();
    assert_eq!(store.set_budget("2024-01", -50.0).unwrap(), 0.0);
    assert_eq!(store.set_budget("2024-02", f64::NAN).unwrap(), 0.0);
    assert_eq!(store.set_budget("2024-03", f64::INFINITY).unwrap(), 0.0);
    assert_eq!(store.get_budget("2024-01"), 0.0);
}

#[test]
fn test_budget_overwrite() {
    let (mut store, _) = open_mem();
    store.set_budget("2024-01", 500.0).unwrap();
    store.set_budget("2024-01", 600.0).unwrap();
    assert_eq!(store.get_budget("2024-01"), 600.0);
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn test_reopen_sees_saved_state() {
    let backend = MemBackend::new();
    {
        let mut store = Store::open(Box::new(backend.clone()));
        store
            .upsert_txn(make_txn("", "2024-01-15", TxnType::Income, 3000.0))
            .unwrap();
        store.set_budget("2024-01", 750.0).unwrap();
        store.set_theme(Theme::Dark).unwrap();
    }
    let store = Store::open(Box::new(backend));
    assert_eq!(store.list_txns(None).len(), 1);
    assert_eq!(store.get_budget("2024-01"), 750.0);
    assert_eq!(store.theme(), Theme::Dark);
}

#[test]
fn test_corrupt_state_degrades_to_empty() {
    let backend = MemBackend::new();
    backend.put("transactions", "{this is not json");
    backend.put("budgets", "[42]");
    backend.put("theme", "???");
    let store = Store::open(Box::new(backend));
    assert!(store.list_txns(None).is_empty());
    assert_eq!(store.get_budget("2024-01"), 0.0);
    assert_eq!(store.theme(), Theme::Light);
}

#[test]
fn test_theme_defaults_to_light() {
    let (store, _) = open_mem();
    assert_eq!(store.theme(), Theme::Light);
}

#[test]
fn test_file_backend_roundtrip() {
    let dir = tempfile::TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path().to_path_buf());
    backend.save("transactions", "[]").unwrap();
    assert_eq!(backend.load("transactions").unwrap(), "[]");
    assert!(backend.load("budgets").is_none());
    assert!(dir.path().join("transactions.json").exists());
}

#[test]
fn test_file_backend_overwrites_in_place() {
    let dir = tempfile::TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path().to_path_buf());
    backend.save("budgets", "{\"2024-01\":500.0}").unwrap();
    backend.save("budgets", "{\"2024-01\":600.0}").unwrap();
    assert_eq!(backend.load("budgets").unwrap(), "{\"2024-01\":600.0}");
    // No stray temp files left behind.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_file_backed_store_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    {
        let backend = FileBackend::new(dir.path().to_path_buf());
        let mut store = Store::open(Box::new(backend));
        store
            .upsert_txn(make_txn("", "2024-03-10", TxnType::Expense, 12.0))
            .unwrap();
    }
    let backend = FileBackend::new(dir.path().to_path_buf());
    let store = Store::open(Box::new(backend));
    assert_eq!(store.list_txns(Some("2024-03")).len(), 1);
}

#[test]
fn test_theme_parse_and_display() {
    assert_eq!(Theme::parse("light"), Some(Theme::Light));
    assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
    assert_eq!(Theme::parse("blue"), None);
    assert_eq!(format!("{}", Theme::Dark), "dark");
}
