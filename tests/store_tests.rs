use chrono::Local;
use roblox_account_cli::{AccountStore, StoreError};
use std::fs;
use tempfile::TempDir;

fn accounts_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("data").join("accounts.json")
}

#[test]
fn added_account_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = accounts_path(&dir);

    let mut store = AccountStore::load(&path);
    store.add("alice", "tok1", "main account").unwrap();

    let reloaded = AccountStore::try_load(&path).unwrap();
    let record = reloaded.get("alice").unwrap();
    assert_eq!(record.credential, "tok1");
    assert_eq!(record.notes, "main account");
    assert!(record.added_at.is_some());
    assert_eq!(record.last_used_at, None);
    // The selection never comes back from disk.
    assert_eq!(reloaded.selected(), None);
}

#[test]
fn account_lifecycle_scenario() {
    let dir = TempDir::new().unwrap();
    let mut store = AccountStore::load(accounts_path(&dir));
    assert!(store.is_empty());

    store.add("alice", "tok1", "").unwrap();
    assert!(matches!(
        store.add("alice", "tok2", ""),
        Err(StoreError::AlreadyExists(_))
    ));
    assert_eq!(store.current_credential(), None);

    store.select("alice").unwrap();
    assert_eq!(store.current_credential(), Some("tok1"));

    store.remove("alice").unwrap();
    assert!(matches!(store.select("alice"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.remove("alice"), Err(StoreError::NotFound(_))));
}

#[test]
fn select_stamps_last_used_and_persists_it() {
    let dir = TempDir::new().unwrap();
    let path = accounts_path(&dir);
    let mut store = AccountStore::load(&path);
    store.add("bob", "cookie-b", "").unwrap();

    let before = Local::now().naive_local();
    let last_used = store.select("bob").unwrap().last_used_at.unwrap();
    assert!(last_used >= before);
    assert_eq!(store.current_credential(), Some("cookie-b"));

    let reloaded = AccountStore::try_load(&path).unwrap();
    assert_eq!(reloaded.get("bob").unwrap().last_used_at, Some(last_used));
}

#[test]
fn reload_reproduces_the_same_records() {
    let dir = TempDir::new().unwrap();
    let path = accounts_path(&dir);
    let mut store = AccountStore::load(&path);
    store.add("one", "c1", "first").unwrap();
    store.add("two", "c2", "").unwrap();
    store.add("three", "c3", "ünïcödé notes").unwrap();
    store.select("two").unwrap();
    store.remove("one").unwrap();
    store.add("four", "c4", "").unwrap();

    let reloaded = AccountStore::try_load(&path).unwrap();
    let original: Vec<_> = store.list().map(|e| (e.name, e.record.clone())).collect();
    let loaded: Vec<_> = reloaded.list().map(|e| (e.name, e.record.clone())).collect();
    assert_eq!(original, loaded);
    assert_eq!(
        loaded.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
        ["two", "three", "four"]
    );
}

#[test]
fn saving_a_loaded_file_keeps_its_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accounts.json");
    let doc = r#"{
  "zeta": {
    "credential": "tok-z",
    "addedAt": "2024-05-01T09:15:00",
    "notes": "",
    "lastUsedAt": "2024-05-02T18:00:00.250"
  },
  "alpha": {
    "credential": "tok-a",
    "addedAt": "2024-05-03T10:00:00",
    "notes": "alt",
    "lastUsedAt": null
  }
}"#;
    fs::write(&path, doc).unwrap();

    let store = AccountStore::try_load(&path).unwrap();
    store.save().unwrap();

    let before: serde_json::Value = serde_json::from_str(doc).unwrap();
    let after: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(before, after);
    let names: Vec<_> = store.list().map(|e| e.name).collect();
    assert_eq!(names, ["zeta", "alpha"]);
}

#[test]
fn export_writes_one_block_per_account_in_order() {
    let dir = TempDir::new().unwrap();
    let path = accounts_path(&dir);
    let mut store = AccountStore::load(&path);
    let weird = "_|WARNING:-DO-NOT-SHARE-THIS.|_ABC+/=%$";
    store.add("first", weird, "").unwrap();
    store.add("second", "plain", "").unwrap();
    let backend_before = fs::read_to_string(&path).unwrap();

    let out = dir.path().join("exports").join("cookies_export.txt");
    fs::create_dir_all(out.parent().unwrap()).unwrap();
    fs::write(&out, "stale content that must disappear\n").unwrap();
    assert_eq!(store.export_all(&out).unwrap(), 2);

    let text = fs::read_to_string(&out).unwrap();
    let blocks: Vec<&str> = text
        .split_terminator(&format!("{}\n", "-".repeat(40)))
        .collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("Username: first\n"));
    assert!(blocks[0].contains(&format!("Cookie: {weird}\n")));
    assert!(blocks[1].starts_with("Username: second\nCookie: plain\nAdded: "));
    assert!(!text.contains("stale"));
    assert!(!text.contains("N/A"));

    assert_eq!(fs::read_to_string(&path).unwrap(), backend_before);
}

#[test]
fn export_of_empty_store_writes_empty_file() {
    let dir = TempDir::new().unwrap();
    let store = AccountStore::load(accounts_path(&dir));
    let out = dir.path().join("nested").join("out.txt");
    assert_eq!(store.export_all(&out).unwrap(), 0);
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}
