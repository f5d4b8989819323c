//! Integration tests for multi-archive (split APK) scans
//!
//! Covers:
//! - Cross-archive merging and location qualification
//! - Order independence
//! - Partial failure ("warn and continue")
//! - Bundle contract violations
//! - Discovery of splits from directories, XAPK and bundletool containers

use nativescan::discovery::{ScanTarget, TargetResolver};
use nativescan::scan::{summarize, BundleMember, NoopObserver, ScanError, Scanner};
use nativescan::{Config, ManifestComponents, MemoryArchive, ZipFileSource};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::FileOptions;

fn apk_bytes(entries: &[&str]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        writer.start_file(*entry, FileOptions::default()).unwrap();
        writer.write_all(b"\x7fELF").unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn write_container(path: &Path, members: &[(&str, Vec<u8>)]) {
    write_container_with_manifest(path, "{\"split_apks\": []}", members);
}

fn write_container_with_manifest(path: &Path, manifest: &str, members: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer.start_file("manifest.json", FileOptions::default()).unwrap();
    writer.write_all(manifest.as_bytes()).unwrap();
    for (name, bytes) in members {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
}

fn scanner() -> Scanner {
    Scanner::new().with_observer(Arc::new(NoopObserver))
}

fn activities(names: &[&str]) -> ManifestComponents {
    ManifestComponents {
        activities: names.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn bundle_members(target: ScanTarget) -> Vec<BundleMember> {
    match target {
        ScanTarget::Bundle(members) => members,
        ScanTarget::Single(_) => panic!("Expected a bundle"),
    }
}

#[test]
fn test_end_to_end_bundle_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let base = write_file(
        temp_dir.path(),
        "base.apk",
        &apk_bytes(&["lib/arm64-v8a/libcore.so", "lib/armeabi-v7a/libcore.so"]),
    );
    let split = write_file(
        temp_dir.path(),
        "config.arm64.apk",
        &apk_bytes(&["lib/arm64-v8a/libcore.so"]),
    );

    let members = vec![
        BundleMember::new("base", ZipFileSource::new(base), true),
        BundleMember::new("config.arm64", ZipFileSource::new(split), false),
    ];

    let scan = scanner().scan_bundle(&members, &ManifestComponents::new()).unwrap();
    let record = scan.result.library("libcore.so").unwrap();

    assert_eq!(record.occurrence_count(), 3);
    assert_eq!(
        record.locations(),
        &[
            "base:lib/arm64-v8a/libcore.so",
            "base:lib/armeabi-v7a/libcore.so",
            "config.arm64:lib/arm64-v8a/libcore.so",
        ]
    );
    assert_eq!(
        record.architectures().iter().collect::<Vec<_>>(),
        vec!["arm64-v8a", "armeabi-v7a"]
    );
}

#[test]
fn test_merge_order_independence() {
    let base = || MemoryArchive::from_paths("base", &["lib/x86/liba.so", "lib/x86_64/liba.so"]);
    let split = || MemoryArchive::from_paths("split", &["lib/x86/liba.so", "lib/x86/libb.so"]);

    let forward = vec![
        BundleMember::new("base", base(), true),
        BundleMember::new("split", split(), false),
    ];
    let backward = vec![
        BundleMember::new("split", split(), false),
        BundleMember::new("base", base(), true),
    ];

    let a = scanner().scan_bundle(&forward, &ManifestComponents::new()).unwrap();
    let b = scanner().scan_bundle(&backward, &ManifestComponents::new()).unwrap();

    assert_eq!(a.result, b.result);
    assert_eq!(summarize(&a.result), summarize(&b.result));
}

#[test]
fn test_component_isolation() {
    // The split's own manifest would list A3; only the main manifest is consulted
    let members = vec![
        BundleMember::new("base", MemoryArchive::from_paths("base", &["lib/x86/liba.so"]), true),
        BundleMember::new("split", MemoryArchive::from_paths("split", &["lib/x86/libb.so"]), false),
    ];

    let scan = scanner().scan_bundle(&members, &activities(&["A1", "A2"])).unwrap();

    assert_eq!(scan.result.activities(), &["A1", "A2"]);
    assert!(!scan.result.activities().iter().any(|a| a == "A3"));
}

#[test]
fn test_corrupt_split_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let base = write_file(temp_dir.path(), "base.apk", &apk_bytes(&["lib/x86/liba.so"]));
    let corrupt = write_file(temp_dir.path(), "config.x86.apk", b"garbage");

    let members = vec![
        BundleMember::new("base.apk", ZipFileSource::new(base), true),
        BundleMember::new("config.x86.apk", ZipFileSource::new(corrupt), false),
    ];

    let scan = scanner().scan_bundle(&members, &activities(&["A1"])).unwrap();

    assert!(scan.is_partial());
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.skipped[0].source_id, "config.x86.apk");
    assert_eq!(scan.result.library_names(), &["liba.so"]);
    assert_eq!(scan.result.activities(), &["A1"]);
}

#[test]
fn test_unreadable_main_still_reports_components() {
    let temp_dir = TempDir::new().unwrap();
    let corrupt = write_file(temp_dir.path(), "base.apk", b"garbage");
    let split = write_file(temp_dir.path(), "config.x86.apk", &apk_bytes(&["lib/x86/liba.so"]));

    let members = vec![
        BundleMember::new("base.apk", ZipFileSource::new(corrupt), true),
        BundleMember::new("config.x86.apk", ZipFileSource::new(split), false),
    ];

    let scan = scanner().scan_bundle(&members, &activities(&["A1"])).unwrap();

    assert_eq!(scan.skipped[0].source_id, "base.apk");
    assert_eq!(scan.result.library_names(), &["liba.so"]);
    assert_eq!(scan.result.activities(), &["A1"]);
}

#[test]
fn test_missing_main_archive() {
    let members = vec![
        BundleMember::new("a", MemoryArchive::from_paths("a", &["lib/x86/liba.so"]), false),
        BundleMember::new("b", MemoryArchive::from_paths("b", &["lib/x86/libb.so"]), false),
    ];

    let err = scanner().scan_bundle(&members, &ManifestComponents::new()).unwrap_err();
    assert!(matches!(err, ScanError::MissingMainArchive));
}

#[test]
fn test_duplicate_source_ids() {
    let members = vec![
        BundleMember::new("base", MemoryArchive::from_paths("a", &[]), true),
        BundleMember::new("base", MemoryArchive::from_paths("b", &[]), false),
    ];

    let err = scanner().scan_bundle(&members, &ManifestComponents::new()).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate source id in bundle: base");
}

#[test]
fn test_directory_bundle() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "base.apk", &apk_bytes(&["lib/arm64-v8a/libcore.so"]));
    write_file(
        temp_dir.path(),
        "config.armeabi_v7a.apk",
        &apk_bytes(&["lib/armeabi-v7a/libcore.so"]),
    );

    let config = Config::default();
    let members = bundle_members(
        TargetResolver::new(&config)
            .resolve(&[temp_dir.path().to_path_buf()])
            .unwrap(),
    );

    let scan = scanner().scan_bundle(&members, &ManifestComponents::new()).unwrap();
    let record = scan.result.library("libcore.so").unwrap();

    assert_eq!(
        record.locations(),
        &[
            "base.apk:lib/arm64-v8a/libcore.so",
            "config.armeabi_v7a.apk:lib/armeabi-v7a/libcore.so",
        ]
    );
}

#[test]
fn test_xapk_container_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let xapk = temp_dir.path().join("app.xapk");
    write_container(
        &xapk,
        &[
            ("base.apk", apk_bytes(&["lib/arm64-v8a/libcore.so", "lib/arm64-v8a/libui.so"])),
            ("config.x86_64.apk", apk_bytes(&["lib/x86_64/libcore.so"])),
        ],
    );

    let config = Config::default();
    let members = bundle_members(TargetResolver::new(&config).resolve(&[xapk]).unwrap());

    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m.is_main && m.source_id == "base.apk"));

    let scan = scanner()
        .with_parallel(false)
        .scan_bundle(&members, &ManifestComponents::new())
        .unwrap();
    let stats = summarize(&scan.result);

    assert_eq!(scan.result.library_names(), &["libcore.so", "libui.so"]);
    assert_eq!(stats.by_architecture["arm64-v8a"], 2);
    assert_eq!(stats.by_architecture["x86_64"], 1);
    for record in scan.result.libraries().values() {
        assert_eq!(record.occurrence_count(), record.locations().len());
    }
}

#[test]
fn test_xapk_base_split_named_after_package() {
    let temp_dir = TempDir::new().unwrap();
    let xapk = temp_dir.path().join("com.example.app.xapk");
    write_container_with_manifest(
        &xapk,
        r#"{
            "xapk_version": 2,
            "package_name": "com.example.app",
            "split_apks": [
                {"file": "com.example.app.apk", "id": "base"},
                {"file": "config.arm64_v8a.apk", "id": "config.arm64_v8a"},
                {"file": "config.en.apk", "id": "config.en"}
            ]
        }"#,
        &[
            ("com.example.app.apk", apk_bytes(&["lib/armeabi-v7a/libcore.so"])),
            ("config.arm64_v8a.apk", apk_bytes(&["lib/arm64-v8a/libcore.so"])),
            ("config.en.apk", apk_bytes(&[])),
            ("icon.png", b"png".to_vec()),
        ],
    );

    let config = Config::default();
    let members = bundle_members(TargetResolver::new(&config).resolve(&[xapk]).unwrap());

    assert_eq!(members.len(), 3);
    let main: Vec<_> = members.iter().filter(|m| m.is_main).map(|m| m.source_id.as_str()).collect();
    assert_eq!(main, vec!["com.example.app.apk"]);

    let scan = scanner()
        .scan_bundle(&members, &activities(&["com.example.app.MainActivity"]))
        .unwrap();

    assert!(!scan.is_partial());
    let record = &scan.result.libraries()["libcore.so"];
    assert_eq!(record.occurrence_count(), 2);
    assert_eq!(
        record.locations(),
        &[
            "com.example.app.apk:lib/armeabi-v7a/libcore.so",
            "config.arm64_v8a.apk:lib/arm64-v8a/libcore.so",
        ]
    );
    assert_eq!(scan.result.components().activities, vec!["com.example.app.MainActivity"]);
}

#[test]
fn test_bundletool_apks_container() {
    let temp_dir = TempDir::new().unwrap();
    let apks = temp_dir.path().join("app.apks");
    let file = File::create(&apks).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer.start_file("toc.pb", FileOptions::default()).unwrap();
    writer.write_all(b"\x0a\x00").unwrap();
    for (name, libs) in [
        ("splits/base-master.apk", vec!["lib/x86_64/libcore.so"]),
        ("splits/base-arm64_v8a.apk", vec!["lib/arm64-v8a/libcore.so"]),
    ] {
        writer.start_file(name, FileOptions::default()).unwrap();
        writer.write_all(&apk_bytes(&libs)).unwrap();
    }
    writer.finish().unwrap();

    let config = Config::default();
    let members = bundle_members(TargetResolver::new(&config).resolve(&[apks]).unwrap());

    let ids: Vec<_> = members.iter().map(|m| (m.source_id.as_str(), m.is_main)).collect();
    assert_eq!(ids, vec![("base-master.apk", true), ("base-arm64_v8a.apk", false)]);

    let scan = scanner().scan_bundle(&members, &ManifestComponents::new()).unwrap();
    let stats = summarize(&scan.result);
    assert_eq!(stats.total_libraries, 1);
    assert_eq!(stats.by_architecture["x86_64"], 1);
    assert_eq!(stats.by_architecture["arm64-v8a"], 1);
}
