use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use treecopy::core::*;

#[test]
fn blocks_follow_selection_order_with_path_headers() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.txt");
    let b = tmp.path().join("b.txt");
    fs::write(&a, "alpha").unwrap();
    fs::write(&b, "beta\nsecond line").unwrap();

    let bundle = render_bundle(&[b.clone(), a.clone()]);
    let want = format!(
        "=== {} ===\nbeta\nsecond line\n\n=== {} ===\nalpha\n\n",
        b.display(),
        a.display()
    );
    assert_eq!(bundle.text, want);
    assert_eq!(bundle.blocks, 2);
    assert!(bundle.unreadable.is_empty());
}

#[test]
fn unreadable_file_gets_inline_marker_and_export_continues() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("first.txt");
    let missing = tmp.path().join("deleted.txt");
    let last = tmp.path().join("last.txt");
    fs::write(&first, "one").unwrap();
    fs::write(&last, "three").unwrap();

    let bundle = render_bundle(&[first.clone(), missing.clone(), last.clone()]);

    let headers: Vec<&str> = bundle
        .text
        .lines()
        .filter(|l| l.starts_with("=== ") && l.ends_with(" ==="))
        .collect();
    assert_eq!(headers.len(), 3);
    assert_eq!(headers[0], format!("=== {} ===", first.display()));
    assert_eq!(headers[1], format!("=== {} ===", missing.display()));
    assert_eq!(headers[2], format!("=== {} ===", last.display()));

    let missing_block = bundle
        .text
        .split(&block_header(&missing))
        .nth(1)
        .unwrap()
        .lines()
        .next()
        .unwrap();
    assert!(missing_block.starts_with("[unreadable: "), "got {missing_block:?}");
    assert_eq!(bundle.unreadable, vec![missing]);
    assert!(bundle.text.ends_with("three\n\n"));
}

#[test]
fn binary_and_non_utf8_content_count_as_unreadable() {
    let tmp = TempDir::new().unwrap();
    let nul = tmp.path().join("blob.bin");
    let latin1 = tmp.path().join("latin1.txt");
    fs::write(&nul, b"abc\0def").unwrap();
    fs::write(&latin1, [0x63, 0x61, 0x66, 0xe9]).unwrap();

    assert!(read_text_file(&nul).is_err());
    assert!(read_text_file(&latin1).is_err());

    let bundle = render_bundle(&[nul, latin1]);
    assert_eq!(bundle.unreadable.len(), 2);
    assert_eq!(bundle.text.matches("[unreadable: ").count(), 2);
}

#[test]
fn export_writes_artifact_and_copies_same_text() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.txt");
    fs::write(&a, "alpha").unwrap();
    let artifact = tmp.path().join("out/output.txt");

    let mut clip = MemoryClipboard::default();
    let report = export_bundle(&[a], &artifact, &mut clip);

    assert_eq!(report.artifact.as_ref().unwrap(), &artifact);
    assert!(report.clipboard.is_ok());
    let on_disk = fs::read_to_string(&artifact).unwrap();
    assert_eq!(on_disk, report.bundle.text);
    assert_eq!(clip.contents.as_deref(), Some(on_disk.as_str()));
}

#[test]
fn clipboard_failure_is_reported_and_artifact_still_written() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.txt");
    fs::write(&a, "alpha").unwrap();
    let artifact = tmp.path().join("output.txt");

    let mut clip = MemoryClipboard::failing("no display");
    let report = export_bundle(&[a], &artifact, &mut clip);

    assert!(matches!(report.clipboard, Err(CoreError::Clipboard(_))));
    assert!(report.artifact.is_ok());
    assert!(artifact.exists());
    assert!(clip.contents.is_none());
}

#[test]
fn stats_line_counts_files_and_chars() {
    let bundle = Bundle {
        text: "one two\n".into(),
        blocks: 1,
        unreadable: vec![],
    };
    let line = bundle.stats_line();
    assert!(line.starts_with("1 files • 8 chars • "), "got {line}");
    assert!(count_words("one two\nthree") == 3);
}
