//! Integration tests for single-archive scans
//!
//! These tests build real APK-shaped zip files on disk and run them through
//! the public scanning API.

use nativescan::scan::{summarize, NoopObserver, Scanner};
use nativescan::{ArchiveEntry, EntrySource, ManifestComponents, ZipFileSource};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::FileOptions;

/// Write a zip with the given entries; names ending in `/` become directories
fn write_apk(dir: &Path, name: &str, entries: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("Failed to create apk");
    let mut writer = zip::ZipWriter::new(file);

    for entry in entries {
        if entry.ends_with('/') {
            writer.add_directory(*entry, FileOptions::default()).unwrap();
        } else {
            writer.start_file(*entry, FileOptions::default()).unwrap();
            writer.write_all(b"\x7fELF\x02\x01\x01").unwrap();
        }
    }

    writer.finish().expect("Failed to finish apk");
    path
}

fn scanner() -> Scanner {
    Scanner::new().with_observer(Arc::new(NoopObserver))
}

#[test]
fn test_scan_real_apk() {
    let temp_dir = TempDir::new().unwrap();
    let apk = write_apk(
        temp_dir.path(),
        "app.apk",
        &[
            "AndroidManifest.xml",
            "classes.dex",
            "lib/",
            "lib/arm64-v8a/",
            "lib/arm64-v8a/libfoo.so",
            "lib/armeabi-v7a/libfoo.so",
            "lib/arm64-v8a/libbar.so",
            "assets/lib/x86/libasset.so",
        ],
    );

    let result = scanner()
        .scan_single(&ZipFileSource::new(&apk), &ManifestComponents::new())
        .expect("Scan should succeed");

    assert_eq!(result.library_names(), &["libbar.so", "libfoo.so"]);

    let foo = result.library("libfoo.so").unwrap();
    assert_eq!(foo.occurrence_count(), 2);
    assert_eq!(
        foo.architectures().iter().collect::<Vec<_>>(),
        vec!["arm64-v8a", "armeabi-v7a"]
    );
    assert_eq!(
        foo.locations(),
        &["lib/arm64-v8a/libfoo.so", "lib/armeabi-v7a/libfoo.so"]
    );
}

#[test]
fn test_wrong_depth_libraries_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let apk = write_apk(
        temp_dir.path(),
        "app.apk",
        &["lib/extra/arm64-v8a/libfoo.so", "lib/libfoo.so"],
    );

    let result = scanner()
        .scan_single(&ZipFileSource::new(&apk), &ManifestComponents::new())
        .unwrap();

    assert!(result.library_names().is_empty());
    assert_eq!(summarize(&result).total_libraries, 0);
}

#[test]
fn test_components_pass_through() {
    let temp_dir = TempDir::new().unwrap();
    let apk = write_apk(temp_dir.path(), "app.apk", &["lib/x86/liba.so"]);
    let manifest = ManifestComponents {
        activities: vec!["com.example.Main".to_string(), "com.example.Main".to_string()],
        services: vec!["com.example.Sync".to_string()],
        providers: vec![],
        receivers: vec!["com.example.Boot".to_string()],
    };

    let result = scanner()
        .scan_single(&ZipFileSource::new(&apk), &manifest)
        .unwrap();

    // no dedup is applied to manifest input
    assert_eq!(result.activities().len(), 2);
    assert_eq!(result.components(), &manifest);
    assert_eq!(summarize(&result).total_components, 4);
}

#[test]
fn test_stats_for_real_apk() {
    let temp_dir = TempDir::new().unwrap();
    let apk = write_apk(
        temp_dir.path(),
        "app.apk",
        &[
            "lib/arm64-v8a/liba.so",
            "lib/arm64-v8a/libb.so",
            "lib/x86_64/liba.so",
        ],
    );

    let result = scanner()
        .scan_single(&ZipFileSource::new(&apk), &ManifestComponents::new())
        .unwrap();
    let stats = summarize(&result);

    assert_eq!(stats.total_libraries, 2);
    assert_eq!(stats.by_architecture["arm64-v8a"], 2);
    assert_eq!(stats.by_architecture["x86_64"], 1);
    assert_eq!(stats, summarize(&result));
}

#[test]
fn test_unreadable_single_archive_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.apk");
    std::fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();

    let result = scanner().scan_single(&ZipFileSource::new(&path), &ManifestComponents::new());

    match result {
        Err(nativescan::ScanError::ArchiveUnreadable { source_id, .. }) => {
            assert_eq!(source_id, "corrupt.apk");
        }
        other => panic!("Expected ArchiveUnreadable, got {:?}", other),
    }
}

#[test]
fn test_zip_source_lists_directories() {
    let temp_dir = TempDir::new().unwrap();
    let apk = write_apk(temp_dir.path(), "app.apk", &["lib/", "lib/x86/liba.so"]);

    let entries = ZipFileSource::new(&apk).entries().unwrap();

    assert_eq!(
        entries,
        vec![ArchiveEntry::dir("lib/"), ArchiveEntry::file("lib/x86/liba.so")]
    );
}
