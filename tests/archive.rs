// ABOUTME: End-to-end tests for archive construction in both container formats.
// ABOUTME: A directory-backed snapshot stands in for git; includes and excludes hit real files.

mod support;

use proptest::prelude::*;
use stackpack::archive::{ArchiveBuilder, BuildError, Format};
use stackpack::config::PackageConfig;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use support::{TreeSnapshot, write_file};
use tempfile::TempDir;

/// A small Rails-ish project: tracked sources plus compiled assets git doesn't know about.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "app.rb", "puts 'hi'");
    write_file(dir.path(), ".gitignore", "public/assets\n");
    write_file(dir.path(), "config/app.yml", "name: web");
    write_file(dir.path(), "config/secrets.yml", "token: abc");
    write_file(dir.path(), "public/assets/app.css", "body {}");
    write_file(dir.path(), "public/assets/app.js", "1;");
    dir
}

fn tracked(root: &Path) -> TreeSnapshot {
    TreeSnapshot::new(root, &["app.rb", ".gitignore", "config"])
}

fn package(format: Format) -> PackageConfig {
    PackageConfig {
        prerequisites: Vec::new(),
        format,
        ..PackageConfig::default()
    }
}

async fn build_default(format: Format) {
    let dir = project();
    let snapshot = tracked(dir.path());
    let builder = ArchiveBuilder::new(dir.path(), dir.path().join("build"), &snapshot);

    let filename = format!("release.{}", format.extension());
    let archive = builder.build(&package(format), &filename).await.unwrap();

    assert_eq!(archive.path, dir.path().join("build").join(&filename));
    assert_eq!(archive.format, format);
    assert!(archive.contains("app.rb").unwrap());
    assert!(archive.contains("config/app.yml").unwrap());
    assert!(archive.contains("public/assets/app.css").unwrap());
    assert!(archive.contains("public/assets/app.js").unwrap());
    assert!(!archive.contains(".gitignore").unwrap());
}

#[tokio::test]
async fn zip_build_merges_assets_and_drops_gitignore() {
    build_default(Format::Zip).await;
}

#[tokio::test]
async fn tar_build_merges_assets_and_drops_gitignore() {
    build_default(Format::Tar).await;
}

#[tokio::test]
async fn excludes_reach_into_included_directories() {
    let dir = project();
    let snapshot = TreeSnapshot::new(dir.path(), &["app.rb"]);
    let builder = ArchiveBuilder::new(dir.path(), dir.path().join("build"), &snapshot);
    let config = PackageConfig {
        includes: vec!["config".to_string()],
        excludes: vec!["config/secrets.yml".to_string()],
        ..package(Format::Zip)
    };

    let archive = builder.build(&config, "app.zip").await.unwrap();

    assert!(archive.contains("config/app.yml").unwrap());
    assert!(!archive.contains("config/secrets.yml").unwrap());
}

#[tokio::test]
async fn additional_paths_follow_includes() {
    let dir = project();
    write_file(dir.path(), "vendor/gem.rb", "gem");
    let snapshot = TreeSnapshot::new(dir.path(), &["app.rb"]);
    let builder = ArchiveBuilder::new(dir.path(), dir.path().join("build"), &snapshot);
    let config = PackageConfig {
        additional_paths: vec!["vendor".to_string()],
        ..package(Format::Tar)
    };

    let archive = builder.build(&config, "app.tar").await.unwrap();

    assert!(archive.contains("vendor/gem.rb").unwrap());
    assert!(archive.contains("public/assets/app.css").unwrap());
}

#[tokio::test]
async fn build_dir_is_created_when_missing() {
    let dir = project();
    let snapshot = tracked(dir.path());
    let build_dir = dir.path().join("out").join("nested");
    let builder = ArchiveBuilder::new(dir.path(), &build_dir, &snapshot);

    builder.build(&package(Format::Zip), "a.zip").await.unwrap();

    assert!(build_dir.join("a.zip").is_file());
}

#[tokio::test]
async fn missing_include_is_a_write_error() {
    let dir = project();
    let snapshot = tracked(dir.path());
    let builder = ArchiveBuilder::new(dir.path(), dir.path().join("build"), &snapshot);
    let config = PackageConfig {
        includes: vec!["public/packs".to_string()],
        ..package(Format::Zip)
    };

    let err = builder.build(&config, "a.zip").await.unwrap_err();

    assert!(matches!(err, BuildError::ArchiveWrite { .. }), "{err}");
    assert!(err.to_string().contains("public/packs"));
}

#[tokio::test]
async fn filename_with_separator_is_rejected() {
    let dir = project();
    let snapshot = tracked(dir.path());
    let builder = ArchiveBuilder::new(dir.path(), dir.path().join("build"), &snapshot);

    let err = builder
        .build(&package(Format::Zip), "../escape.zip")
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::InvalidFilename { .. }));
    assert!(!dir.path().join("escape.zip").exists());
}

#[tokio::test]
async fn rebuilding_replaces_the_previous_archive() {
    let dir = project();
    let snapshot = tracked(dir.path());
    let builder = ArchiveBuilder::new(dir.path(), dir.path().join("build"), &snapshot);

    builder.build(&package(Format::Zip), "a.zip").await.unwrap();
    fs::remove_dir_all(dir.path().join("public")).unwrap();
    let config = PackageConfig {
        includes: Vec::new(),
        ..package(Format::Zip)
    };
    let archive = builder.build(&config, "a.zip").await.unwrap();

    assert!(!archive.contains("public/assets/app.css").unwrap());
}

#[test]
fn last_operation_on_a_path_wins() {
    for format in [Format::Zip, Format::Tar] {
        let dir = project();
        let handler = format.handler();
        let archive = dir.path().join(format!("order.{}", format.extension()));
        handler.create_empty(&archive).unwrap();
        handler.add(&archive, dir.path(), ".gitignore").unwrap();

        handler.remove(&archive, ".gitignore").unwrap();
        handler.add(&archive, dir.path(), ".gitignore").unwrap();
        assert!(handler.list(&archive).unwrap().contains(&".gitignore".to_string()));

        handler.add(&archive, dir.path(), ".gitignore").unwrap();
        handler.remove(&archive, ".gitignore").unwrap();
        assert!(!handler.list(&archive).unwrap().contains(&".gitignore".to_string()));
    }
}

// Interleaved add/remove sequences on a fixed tree must match a set model:
// the last operation touching a file decides whether it is present.

const PATHS: [&str; 5] = ["a.txt", "dir", "dir/b.txt", "dir/sub", "dir/sub/c.txt"];
const FILES: [&str; 3] = ["a.txt", "dir/b.txt", "dir/sub/c.txt"];

fn under(file: &str, path: &str) -> bool {
    file == path || file.starts_with(&format!("{path}/"))
}

fn apply_model(ops: &[(bool, usize)]) -> BTreeSet<String> {
    let mut present = BTreeSet::new();
    for &(add, index) in ops {
        let path = PATHS[index];
        for file in FILES.iter().filter(|f| under(f, path)) {
            if add {
                present.insert(file.to_string());
            } else {
                present.remove(*file);
            }
        }
    }
    present
}

fn files_in(format: Format, archive: &Path) -> BTreeSet<String> {
    format
        .handler()
        .list(archive)
        .unwrap()
        .into_iter()
        .filter(|name| !name.ends_with('/'))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn operation_sequences_match_set_model(
        tar in any::<bool>(),
        ops in prop::collection::vec((any::<bool>(), 0..PATHS.len()), 0..8),
    ) {
        let format = if tar { Format::Tar } else { Format::Zip };
        let dir = TempDir::new().unwrap();
        for file in FILES {
            write_file(dir.path(), file, file);
        }
        let archive = dir.path().join(format!("out.{}", format.extension()));
        let handler = format.handler();

        handler.create_empty(&archive).unwrap();
        for &(add, index) in &ops {
            if add {
                handler.add(&archive, dir.path(), PATHS[index]).unwrap();
            } else {
                handler.remove(&archive, PATHS[index]).unwrap();
            }
        }

        prop_assert_eq!(files_in(format, &archive), apply_model(&ops));
    }
}
