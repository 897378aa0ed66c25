use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use treewalk_core::{Entry, EntryKind, ErrorHandler, PatternSet, WalkError, WalkOptions};

#[test]
fn test_entry_roundtrips_through_json() {
    let entry = Entry::new("root/sub/file.rs", 2, EntryKind::File);
    let json = serde_json::to_string(&entry).unwrap();
    let back: Entry = serde_json::from_str(&json).unwrap();

    assert_eq!(back.path, entry.path);
    assert_eq!(back.depth, 2);
    assert_eq!(back.kind, EntryKind::File);
}

#[test]
fn test_filter_pipeline_order() {
    // skip beats exts and include even when both would accept.
    let options = WalkOptions::builder()
        .exts(["rs"])
        .include(PatternSet::new(["**/*.rs"]).unwrap())
        .skip(PatternSet::new(["**/generated*"]).unwrap())
        .build()
        .unwrap();

    assert!(options.is_eligible(Path::new("src/main.rs")));
    assert!(!options.is_eligible(Path::new("src/generated.rs")));
    assert!(!options.is_eligible(Path::new("src/main.py")));
}

#[test]
fn test_exts_apply_to_directories_too() {
    let options = WalkOptions::builder().exts(["rs"]).build().unwrap();
    // Directory paths go through the same yield filters as files.
    assert!(!options.is_eligible(Path::new("src/subdir")));
}

#[test]
fn test_pattern_set_round_trip_patterns() {
    let set = PatternSet::new(["**/*.rs", "**/target"]).unwrap();
    assert_eq!(set.patterns(), ["**/*.rs", "**/target"]);
    assert!(!set.is_empty());
}

#[test]
fn test_error_handler_is_shareable() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let handler: ErrorHandler = Arc::new(move |_err: &WalkError| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let options = WalkOptions::builder().on_error(handler).build().unwrap();
    let cloned = options.clone();

    let err = WalkError::io(
        "/x",
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    );
    options.on_error.as_ref().unwrap()(&err);
    cloned.on_error.as_ref().unwrap()(&err);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_debug_does_not_require_debug_handler() {
    let handler: ErrorHandler = Arc::new(|_| {});
    let options = WalkOptions::builder().on_error(handler).build().unwrap();
    let debugged = format!("{options:?}");
    assert!(debugged.contains("on_error"));
}
