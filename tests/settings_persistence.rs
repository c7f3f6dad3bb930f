use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use treecopy::core::*;

#[test]
fn settings_in_dir_place_every_file_there() {
    let dir = PathBuf::from("/data/treecopy");
    let s = Settings::in_dir(&dir);
    assert_eq!(s.history_file, dir.join(HISTORY_FILE_NAME));
    assert_eq!(s.ignore_file, dir.join(IGNORE_FILE_NAME));
    assert_eq!(s.output_file, dir.join(OUTPUT_FILE_NAME));
    assert_eq!(s.history_capacity, DEFAULT_HISTORY_CAPACITY);
    assert_eq!(s.max_name_len, DEFAULT_NAME_MAX_LEN);
}

#[test]
fn save_then_load_round_trips() {
    let tmp = TempDir::new().unwrap();
    let f = tmp.path().join("cfg/settings.json");
    let mut s = Settings::in_dir(tmp.path());
    s.history_capacity = 12;
    save_settings(&f, &s).unwrap();

    assert_eq!(load_settings(&f), Some(s));
    assert!(!tmp.path().join("cfg/settings.json.tmp").exists());
}

#[test]
fn partial_settings_fill_in_defaults() {
    let tmp = TempDir::new().unwrap();
    let f = tmp.path().join("settings.json");
    fs::write(&f, r#"{ "history_capacity": 5 }"#).unwrap();

    let s = load_settings(&f).unwrap();
    assert_eq!(s.history_capacity, 5);
    assert_eq!(s.max_name_len, DEFAULT_NAME_MAX_LEN);
    assert_eq!(s.history_file, Settings::default().history_file);
}

#[test]
fn missing_or_corrupt_settings_are_none() {
    let tmp = TempDir::new().unwrap();
    assert!(load_settings(&tmp.path().join("none.json")).is_none());
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "not json").unwrap();
    assert!(load_settings(&bad).is_none());
}
