//! Batch processing tests
//!
//! Exercise the read → apply → write loop against an in-memory tag store:
//! per-file failures, cancellation, unchanged files, preview, field scan.

mod helpers;

use std::path::PathBuf;
use std::sync::Arc;

use helpers::{selection, tags, MemoryTagStore};
use tokio_util::sync::CancellationToken;
use wkmp_te::batch::BatchProcessor;
use wkmp_te::field_scanner::FieldScanner;
use wkmp_te::{Operation, OperationKind, TrimMode};

fn trim_all() -> Vec<Operation> {
    vec![Operation::on_all_selected(OperationKind::TrimSpaces {
        mode: TrimMode::All,
    })]
}

fn library(store: &MemoryTagStore, titles: &[&str]) -> Vec<PathBuf> {
    titles
        .iter()
        .enumerate()
        .map(|(i, &title)| {
            let path = PathBuf::from(format!("/music/{:02}.flac", i));
            store.insert(path.clone(), tags(&[("TITLE", title), ("ARTIST", "Band")]));
            path
        })
        .collect()
}

#[test]
fn test_run_updates_changed_files_only() {
    let store = Arc::new(MemoryTagStore::new());
    let files = library(&store, &["  padded  ", "clean", " x "]);

    let batch = BatchProcessor::new(store.clone(), trim_all(), selection(&["TITLE"]));
    let report = batch.run(&files, &CancellationToken::new(), |_| {});

    assert!(report.is_success());
    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.unchanged, 1);
    assert_eq!(store.writes(), vec![files[0].clone(), files[2].clone()]);
    assert_eq!(store.tags(&files[0]).unwrap()["TITLE"], "padded");
    assert_eq!(store.tags(&files[2]).unwrap()["TITLE"], "x");
}

#[test]
fn test_failures_do_not_stop_batch() {
    let store = Arc::new(MemoryTagStore::new());
    let files = library(&store, &[" a ", " b ", " c ", " d "]);
    store.fail_read(files[1].clone());
    store.fail_write(files[2].clone());

    let batch = BatchProcessor::new(store.clone(), trim_all(), selection(&["TITLE"]));
    let report = batch.run(&files, &CancellationToken::new(), |_| {});

    assert!(!report.is_success());
    assert!(!report.cancelled);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.processed(), 4);

    let failed: Vec<&PathBuf> = report.failed.iter().map(|f| &f.path).collect();
    assert_eq!(failed, vec![&files[1], &files[2]]);
    assert!(report.failed[0].error.contains("injected read failure"));

    // Failed write leaves the stored tags as they were
    assert_eq!(store.tags(&files[2]).unwrap()["TITLE"], " c ");
    assert_eq!(store.tags(&files[3]).unwrap()["TITLE"], "d");
}

#[test]
fn test_cancellation_stops_before_next_file() {
    let store = Arc::new(MemoryTagStore::new());
    let files = library(&store, &[" a ", " b ", " c "]);
    let cancel = CancellationToken::new();

    let batch = BatchProcessor::new(store.clone(), trim_all(), selection(&["TITLE"]));
    let mut seen = Vec::new();
    let report = batch.run(&files, &cancel, |progress| {
        seen.push(progress.current);
        if progress.current == 2 {
            cancel.cancel();
        }
    });

    // The file in progress when cancellation arrives is still finished
    assert!(report.cancelled);
    assert_eq!(seen, vec![1, 2]);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.processed(), 2);
    assert_eq!(store.tags(&files[2]).unwrap()["TITLE"], " c ");
}

#[test]
fn test_progress_reports_every_file() {
    let store = Arc::new(MemoryTagStore::new());
    let files = library(&store, &["a", "b", "c"]);

    let batch = BatchProcessor::new(store, trim_all(), selection(&["TITLE"]));
    let mut seen = Vec::new();
    batch.run(&files, &CancellationToken::new(), |progress| {
        seen.push((progress.current, progress.total, progress.path.to_path_buf()));
    });

    assert_eq!(
        seen,
        vec![
            (1, 3, files[0].clone()),
            (2, 3, files[1].clone()),
            (3, 3, files[2].clone()),
        ]
    );
}

#[test]
fn test_emptied_field_is_deleted() {
    let store = Arc::new(MemoryTagStore::new());
    let path = PathBuf::from("/music/one.flac");
    store.insert(path.clone(), tags(&[("TITLE", "Song"), ("COMMENT", "(ad)")]));

    let ops = vec![Operation::on_field(
        "COMMENT",
        OperationKind::RemoveBrackets {
            brackets: vec!["()".parse().unwrap()],
        },
    )];
    let batch = BatchProcessor::new(store.clone(), ops, selection(&["TITLE", "COMMENT"]));
    let changes = batch.process_file(&path).unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].field, "COMMENT");
    let stored = store.tags(&path).unwrap();
    assert!(!stored.contains_key("COMMENT"));
    assert_eq!(stored["TITLE"], "Song");
}

#[test]
fn test_preview_does_not_write() {
    let store = Arc::new(MemoryTagStore::new());
    let files = library(&store, &[" a ", "b"]);
    store.fail_read(PathBuf::from("/music/missing.flac"));
    let mut targets = files.clone();
    targets.push(PathBuf::from("/music/missing.flac"));

    let batch = BatchProcessor::new(store.clone(), trim_all(), selection(&["TITLE"]));
    let report = batch.preview(&targets, &CancellationToken::new());

    assert!(store.writes().is_empty());
    assert_eq!(report.previews.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.previews[0].changes.len(), 1);
    assert_eq!(report.previews[0].changes[0].old, " a ");
    assert_eq!(report.previews[0].changes[0].new, "a");
    assert!(report.previews[1].changes.is_empty());
}

#[test]
fn test_field_scan_counts_custom_fields() {
    let store = MemoryTagStore::new();
    let a = PathBuf::from("/music/a.flac");
    let b = PathBuf::from("/music/b.flac");
    let c = PathBuf::from("/music/c.flac");
    store.insert(a.clone(), tags(&[("TITLE", "x"), ("LYRICIST", "l"), ("MOOD", "m")]));
    store.insert(b.clone(), tags(&[("TITLE", "y"), ("LYRICIST", "l")]));
    store.fail_read(c.clone());

    let report = FieldScanner::new().scan(&[a, b, c], &store, &CancellationToken::new());

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.files_failed, 1);
    assert_eq!(report.fields_by_frequency(), vec![("LYRICIST", 2), ("MOOD", 1)]);
}

#[test]
fn test_field_scan_respects_sample_size() {
    let store = MemoryTagStore::new();
    let files: Vec<PathBuf> = (0..5)
        .map(|i| {
            let path = PathBuf::from(format!("/music/{}.flac", i));
            let field = format!("CUSTOM{}", i);
            store.insert(path.clone(), tags(&[(field.as_str(), "v")]));
            path
        })
        .collect();

    let report = FieldScanner::with_sample_size(2).scan(&files, &store, &CancellationToken::new());

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.field_counts.len(), 2);
    assert!(report.field_counts.contains_key("CUSTOM0"));
    assert!(!report.field_counts.contains_key("CUSTOM2"));
}
