//! Integration tests for tarsafe-core.
//!
//! These tests build real tar archives in memory and verify end-to-end
//! extraction with real filesystem operations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tarsafe_core::ExtractConfig;
use tarsafe_core::ExtractionError;
use tarsafe_core::HardlinkResolution;
use tarsafe_core::PathWhitelist;
use tarsafe_core::extract_file_from_tar;
use tarsafe_core::extract_file_from_tar_reader;
use tarsafe_core::extract_tar;
use tarsafe_core::extract_tar_reader;
use tarsafe_core::extract_tar_with_config;
use tarsafe_core::test_utils::TarTestBuilder;
use tempfile::TempDir;
use walkdir::WalkDir;

fn entries_of(data: &[u8]) -> tar::Archive<Cursor<&[u8]>> {
    tar::Archive::new(Cursor::new(data))
}

/// Names directly inside `dir` with the given extension, including dangling
/// symlinks.
fn names_with_extension(dir: &Path, ext: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| Path::new(name).extension().is_some_and(|e| e == ext))
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::symlink_metadata(path).unwrap().permissions().mode() & 0o7777
}

#[test]
fn test_intermixed_folders_and_files() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("deep/folder/foo.txt", b"foo")
        .add_directory_with_mode("deep/folder/", 0o747)
        .add_file("deep/folder/bar.txt", b"bar")
        .add_symlink("deep/folder2/symlink.txt", "deep/folder/foo.txt")
        .add_directory_with_mode("deep/folder2/", 0o747)
        .add_file("deep/folder2/bar.txt", b"bar")
        .add_directory_with_mode("deep/deep/folder", 0o755)
        .add_directory_with_mode("deep/deep/", 0o747)
        .build();

    let report = extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();

    assert_eq!(
        names_with_extension(&temp.path().join("deep/folder"), "txt"),
        ["bar.txt", "foo.txt"]
    );
    assert_eq!(
        names_with_extension(&temp.path().join("deep/folder2"), "txt"),
        ["bar.txt", "symlink.txt"]
    );
    assert_eq!(
        fs::read(temp.path().join("deep/folder/foo.txt")).unwrap(),
        b"foo"
    );
    assert_eq!(report.files_extracted, 3);
    assert_eq!(report.directories_created, 4);
    assert_eq!(report.symlinks_created, 1);

    #[cfg(unix)]
    {
        assert_eq!(mode_of(&temp.path().join("deep/folder")), 0o747);
        assert_eq!(mode_of(&temp.path().join("deep/folder2")), 0o747);
        assert_eq!(mode_of(&temp.path().join("deep/deep")), 0o747);
        assert_eq!(mode_of(&temp.path().join("deep/deep/folder")), 0o755);
    }
}

#[cfg(unix)]
#[test]
fn test_last_directory_declaration_wins() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_directory_with_mode("dir/", 0o755)
        .add_file("dir/a.txt", b"a")
        .add_directory_with_mode("dir/", 0o747)
        .build();

    extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();
    assert_eq!(mode_of(&temp.path().join("dir")), 0o747);
}

#[cfg(unix)]
#[test]
fn test_restrictive_directory_mode_applied_after_contents() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_directory_with_mode("locked/", 0o555)
        .add_file("locked/inner.txt", b"inner")
        .build();

    extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();

    let locked = temp.path().join("locked");
    assert_eq!(fs::read(locked.join("inner.txt")).unwrap(), b"inner");
    assert_eq!(mode_of(&locked), 0o555);

    // Let TempDir clean up.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_implied_directories_get_provisional_mode() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("a/b/c/file.txt", b"x")
        .build();

    extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();

    let implied = temp.path().join("a/b");
    assert!(implied.is_dir());
    // Provisional 0o755 minus the process umask; owner bits always survive.
    assert_eq!(mode_of(&implied) & 0o700, 0o700);
}

#[cfg(unix)]
#[test]
fn test_file_modes_applied() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file_with_mode("bin/run.sh", b"#!/bin/sh\n", 0o750)
        .add_file_with_mode("etc/secret", b"s", 0o600)
        .build();

    extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();
    assert_eq!(mode_of(&temp.path().join("bin/run.sh")), 0o750);
    assert_eq!(mode_of(&temp.path().join("etc/secret")), 0o600);
}

#[cfg(unix)]
#[test]
fn test_strict_config_strips_special_bits() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file_with_mode("suid", b"x", 0o4755)
        .build();

    extract_tar_with_config(
        entries_of(&data).entries().unwrap(),
        temp.path(),
        None,
        &ExtractConfig::strict(),
    )
    .unwrap();
    assert_eq!(mode_of(&temp.path().join("suid")), 0o755);
}

#[test]
fn test_whitelist_extracts_only_listed_file() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_directory("folder/")
        .add_file("folder/foo.txt", b"foo")
        .add_file("folder/bar.txt", b"bar")
        .add_file("folder/baz.txt", b"baz")
        .build();
    let whitelist: PathWhitelist = ["folder/foo.txt"].into_iter().collect();

    let report = extract_tar(
        entries_of(&data).entries().unwrap(),
        temp.path(),
        Some(&whitelist),
    )
    .unwrap();

    let folder = temp.path().join("folder");
    assert!(folder.is_dir());
    assert_eq!(names_with_extension(&folder, "txt"), ["foo.txt"]);
    assert_eq!(fs::read(folder.join("foo.txt")).unwrap(), b"foo");
    assert_eq!(report.entries_filtered, 3);
}

#[test]
fn test_empty_whitelist_extracts_everything() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("a.txt", b"a")
        .add_file("b.txt", b"b")
        .build();
    let whitelist = PathWhitelist::new();

    let report = extract_tar(
        entries_of(&data).entries().unwrap(),
        temp.path(),
        Some(&whitelist),
    )
    .unwrap();
    assert_eq!(report.files_extracted, 2);
}

#[test]
fn test_extract_file_to_buffer() {
    let data = TarTestBuilder::new()
        .add_directory("folder/")
        .add_file("folder/foo.txt", b"foo")
        .add_file("folder/bar.txt", b"bar")
        .add_symlink("folder/symlink.txt", "folder/foo.txt")
        .build();

    let content =
        extract_file_from_tar(entries_of(&data).entries().unwrap(), "folder/foo.txt").unwrap();
    assert_eq!(content, b"foo");

    let err = extract_file_from_tar(entries_of(&data).entries().unwrap(), "folder/symlink.txt")
        .unwrap_err();
    assert!(matches!(err, ExtractionError::WrongType { .. }));

    let err = extract_file_from_tar_reader(Cursor::new(&data), "folder/missing.txt").unwrap_err();
    assert!(matches!(err, ExtractionError::NotFound { .. }));
}

#[test]
fn test_gzip_stream_supplied_by_caller() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_directory("pkg/")
        .add_file("pkg/readme.md", b"# readme")
        .build();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data).unwrap();
    let compressed = encoder.finish().unwrap();

    let report = extract_tar_reader(GzDecoder::new(Cursor::new(compressed)), temp.path(), None)
        .unwrap();
    assert_eq!(report.files_extracted, 1);
    assert_eq!(
        fs::read(temp.path().join("pkg/readme.md")).unwrap(),
        b"# readme"
    );
}

#[test]
fn test_hardlink_after_source() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("data/original.txt", b"shared")
        .add_hardlink("data/copy.txt", "data/original.txt")
        .build();

    let report = extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();
    assert_eq!(report.hardlinks_created, 1);
    assert_eq!(
        fs::read(temp.path().join("data/copy.txt")).unwrap(),
        b"shared"
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let a = fs::metadata(temp.path().join("data/original.txt")).unwrap();
        let b = fs::metadata(temp.path().join("data/copy.txt")).unwrap();
        assert_eq!(a.ino(), b.ino());
    }
}

#[test]
fn test_hardlink_before_source_fails_fast() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_hardlink("copy.txt", "original.txt")
        .add_file("original.txt", b"late")
        .build();

    let err = extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap_err();
    assert!(!err.is_security_violation());
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    assert!(!temp.path().join("original.txt").exists());
}

#[test]
fn test_hardlink_before_source_deferred() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_hardlink("copy.txt", "original.txt")
        .add_file("original.txt", b"late")
        .build();
    let config = ExtractConfig {
        hardlink_resolution: HardlinkResolution::Deferred,
        ..Default::default()
    };

    let report = extract_tar_with_config(
        entries_of(&data).entries().unwrap(),
        temp.path(),
        None,
        &config,
    )
    .unwrap();
    assert_eq!(report.hardlinks_created, 1);
    assert_eq!(fs::read(temp.path().join("copy.txt")).unwrap(), b"late");
}

#[test]
fn test_later_file_replaces_deferred_hardlink() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_hardlink("x", "src")
        .add_file("x", b"later")
        .add_file("src", b"source")
        .build();
    let config = ExtractConfig {
        hardlink_resolution: HardlinkResolution::Deferred,
        ..Default::default()
    };

    let report = extract_tar_with_config(
        entries_of(&data).entries().unwrap(),
        temp.path(),
        None,
        &config,
    )
    .unwrap();
    assert_eq!(report.hardlinks_created, 0);
    assert_eq!(fs::read(temp.path().join("x")).unwrap(), b"later");
}

#[test]
fn test_deferred_hardlink_with_missing_source_fails() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_hardlink("copy.txt", "never-there.txt")
        .build();
    let config = ExtractConfig {
        hardlink_resolution: HardlinkResolution::Deferred,
        ..Default::default()
    };

    let err = extract_tar_with_config(
        entries_of(&data).entries().unwrap(),
        temp.path(),
        None,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_unsupported_entries_skipped() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_fifo("pipe")
        .add_file("after.txt", b"ok")
        .build();

    let report = extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();
    assert_eq!(report.entries_unsupported, 1);
    assert!(fs::symlink_metadata(temp.path().join("pipe")).is_err());
    assert!(temp.path().join("after.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_reextraction_overwrites_files_and_symlinks() {
    let temp = TempDir::new().unwrap();
    let first = TarTestBuilder::new()
        .add_file_with_mode("conf.txt", b"version one", 0o444)
        .add_symlink("current", "v1")
        .build();
    let second = TarTestBuilder::new()
        .add_file("conf.txt", b"v2")
        .add_symlink("current", "v2")
        .build();

    extract_tar(entries_of(&first).entries().unwrap(), temp.path(), None).unwrap();
    extract_tar(entries_of(&second).entries().unwrap(), temp.path(), None).unwrap();

    assert_eq!(fs::read(temp.path().join("conf.txt")).unwrap(), b"v2");
    assert_eq!(
        fs::read_link(temp.path().join("current")).unwrap(),
        Path::new("v2")
    );
}

#[test]
fn test_every_written_path_stays_inside_dest() {
    let temp = TempDir::new().unwrap();
    let outer = temp.path().join("outer");
    let dest = outer.join("dest");
    fs::create_dir_all(&dest).unwrap();

    let data = TarTestBuilder::new()
        .add_file("./a/../b.txt", b"b")
        .add_file("/abs/c.txt", b"c")
        .add_directory("x/./y/../z/")
        .add_symlink("x/link", "../../../../outside")
        .build();

    extract_tar(entries_of(&data).entries().unwrap(), &dest, None).unwrap();

    let outside: Vec<_> = WalkDir::new(&outer)
        .into_iter()
        .map(|e| e.unwrap().into_path())
        .filter(|p| !p.starts_with(&dest) && p != &outer)
        .collect();
    assert!(outside.is_empty(), "written outside dest: {outside:?}");
    assert!(dest.join("b.txt").is_file());
    assert!(dest.join("abs/c.txt").is_file());
    assert!(dest.join("x/z").is_dir());
}

#[test]
fn test_report_counts_bytes() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("one", &[1u8; 1000])
        .add_file("two", &[2u8; 24])
        .build();

    let report = extract_tar(entries_of(&data).entries().unwrap(), temp.path(), None).unwrap();
    assert_eq!(report.bytes_written, 1024);
    assert_eq!(report.total_items(), 2);
}
