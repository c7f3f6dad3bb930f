use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use treecopy::core::*;

fn store(tmp: &TempDir, capacity: usize) -> HistoryStore {
    HistoryStore::load(&tmp.path().join("selection_state.json"), capacity, 30)
}

fn paths(s: &HistoryStore) -> Vec<&str> {
    s.slots().iter().map(|s| s.path.as_str()).collect()
}

#[test]
fn missing_file_loads_empty() {
    let tmp = TempDir::new().unwrap();
    let s = store(&tmp, 10);
    assert!(s.is_empty());
    assert_eq!(s.capacity(), 10);
}

#[test]
fn corrupt_file_loads_empty() {
    let tmp = TempDir::new().unwrap();
    let f = tmp.path().join("selection_state.json");
    fs::write(&f, "{ \"history\": [ { broken").unwrap();
    assert!(read_history_file(&f).is_none());
    assert!(HistoryStore::load(&f, 10, 30).is_empty());
}

#[test]
fn upsert_then_reload_round_trips() {
    let tmp = TempDir::new().unwrap();
    let mut s = store(&tmp, 10);
    s.upsert("/work/proj", vec!["/work/proj/a.rs".into(), "/work/proj/b.rs".into()], None)
        .unwrap();

    let reloaded = store(&tmp, 10);
    assert_eq!(reloaded.len(), 1);
    let slot = reloaded.get(0).unwrap();
    assert_eq!(slot.path, "/work/proj");
    assert_eq!(slot.selected, vec!["/work/proj/a.rs", "/work/proj/b.rs"]);
    assert_eq!(slot.name, "proj");
    assert!(!slot.saved_at.is_empty());
    assert!(chrono::NaiveDateTime::parse_from_str(&slot.saved_at, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
}

#[test]
fn reupsert_updates_in_place_and_moves_to_front() {
    let tmp = TempDir::new().unwrap();
    let mut s = store(&tmp, 10);
    s.upsert("/p/one", vec!["/p/one/x".into()], Some("First")).unwrap();
    s.upsert("/p/two", vec![], None).unwrap();
    assert_eq!(paths(&s), vec!["/p/two", "/p/one"]);

    s.upsert("/P/ONE/", vec!["/p/one/y".into()], None).unwrap();
    assert_eq!(paths(&s), vec!["/p/one", "/p/two"]);
    let front = s.get(0).unwrap();
    assert_eq!(front.selected, vec!["/p/one/y"]);
    assert_eq!(front.name, "First", "name is kept when none is given");

    s.upsert("/p/one", vec![], Some("  Renamed  ")).unwrap();
    assert_eq!(s.get(0).unwrap().name, "Renamed");
    assert_eq!(s.len(), 2);
}

#[test]
fn capacity_evicts_least_recently_touched() {
    let tmp = TempDir::new().unwrap();
    let mut s = store(&tmp, 3);
    for p in ["/a", "/b", "/c"] {
        s.upsert(p, vec![], None).unwrap();
    }
    // Touch /a so /b becomes the oldest.
    s.upsert("/a", vec![], None).unwrap();
    s.upsert("/d", vec![], None).unwrap();

    assert_eq!(paths(&s), vec!["/d", "/a", "/c"]);
    assert_eq!(paths(&store(&tmp, 3)), vec!["/d", "/a", "/c"]);
}

#[test]
fn rename_rejects_slot_zero_and_bounds_length() {
    let tmp = TempDir::new().unwrap();
    let mut s = store(&tmp, 10);
    s.upsert("/a", vec![], None).unwrap();
    s.upsert("/b", vec![], None).unwrap();

    assert!(matches!(s.rename(0, "nope"), Err(CoreError::ReservedSlot(0))));
    assert!(matches!(
        s.rename(5, "nope"),
        Err(CoreError::SlotOutOfRange { index: 5, len: 2 })
    ));
    assert!(matches!(s.rename(1, "   "), Err(CoreError::EmptyName)));

    let long = "x".repeat(45);
    s.rename(1, &format!("  {long}  ")).unwrap();
    assert_eq!(s.get(1).unwrap().name.chars().count(), 30);
    assert_eq!(store(&tmp, 10).get(1).unwrap().name, "x".repeat(30));
}

#[test]
fn remove_shifts_later_slots_up() {
    let tmp = TempDir::new().unwrap();
    let mut s = store(&tmp, 10);
    for p in ["/c", "/b", "/a"] {
        s.upsert(p, vec![], None).unwrap();
    }
    let removed = s.remove(1).unwrap();
    assert_eq!(removed.path, "/b");
    assert_eq!(paths(&s), vec!["/a", "/c"]);
    assert!(s.remove(2).is_err());
    assert_eq!(paths(&store(&tmp, 10)), vec!["/a", "/c"]);
}

#[test]
fn load_normalizes_oversized_and_fixed_slot_files() {
    let tmp = TempDir::new().unwrap();
    let f = tmp.path().join("selection_state.json");
    let mut slots: Vec<HistorySlot> = (0..6)
        .map(|i| HistorySlot {
            path: format!("/p{i}"),
            ..Default::default()
        })
        .collect();
    slots.insert(1, HistorySlot::default()); // unused fixed slot
    slots.insert(3, HistorySlot {
        path: "/P0".into(),
        ..Default::default()
    }); // duplicate of slot 0
    write_history_file(&f, &slots).unwrap();

    let s = HistoryStore::load(&f, 4, 30);
    assert_eq!(paths(&s), vec!["/p0", "/p1", "/p2", "/p3"]);
}

#[test]
fn legacy_entries_without_optional_fields_load() {
    let tmp = TempDir::new().unwrap();
    let f = tmp.path().join("selection_state.json");
    fs::write(&f, r#"{"history":[{"path":"/legacy","selected":["/legacy/a"]}]}"#).unwrap();

    let s = HistoryStore::load(&f, 5, 30);
    let slot = s.get(0).unwrap();
    assert_eq!(slot.saved_at, "");
    assert_eq!(slot.display_name(), "legacy");
}

#[test]
fn save_replaces_atomically_without_leftover_temp() {
    let tmp = TempDir::new().unwrap();
    let f = tmp.path().join("selection_state.json");
    let mut s = HistoryStore::load(&f, 5, 30);
    s.upsert("/x", vec![], None).unwrap();
    s.upsert("/y", vec![], None).unwrap();

    assert!(f.exists());
    assert!(!tmp.path().join("selection_state.json.tmp").exists());
    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&f).unwrap()).unwrap();
    assert_eq!(raw["history"][0]["path"], "/y");
    assert!(raw["history"][0]["saved_at"].is_string());
    assert!(raw["history"][0]["selected"].is_array());
}

#[cfg(unix)]
#[test]
fn failed_write_keeps_in_memory_change() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("ro");
    fs::create_dir(&dir).unwrap();
    let mut s = HistoryStore::load(&dir.join("h.json"), 5, 30);

    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();
    let res = s.upsert("/kept", vec![], None);
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

    // Root can write anywhere; only assert the failure path when it happened.
    if let Err(e) = res {
        assert!(matches!(e, CoreError::HistoryWrite(_)));
    }
    assert_eq!(paths(&s), vec!["/kept"]);
}

#[test]
fn same_folder_ignores_case_and_separators() {
    assert!(same_folder("/Work/Proj", "/work/proj/"));
    assert!(same_folder(r"C:\Work\Proj", "c:/work/proj"));
    assert!(!same_folder("/work/proj", "/work/proj2"));
    assert!(same_folder("/", "/"));
}

#[test]
fn new_slot_for_root_folder_gets_fallback_name() {
    let tmp = TempDir::new().unwrap();
    let mut s = store(&tmp, 5);
    s.upsert("/", vec![], None).unwrap();
    assert_eq!(s.get(0).unwrap().name, "History");
}
