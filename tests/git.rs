// ABOUTME: Tests that drive the real git binary in throwaway repositories.
// ABOUTME: Covers archive export merged with ignored assets, and the upstream dry-run fetch.

mod support;

use stackpack::archive::{ArchiveBuilder, Format};
use stackpack::config::PackageConfig;
use stackpack::source::{
    GitCli, PreflightError, SnapshotProvider, UpstreamProbe, assert_synchronized,
};
use std::path::Path;
use std::process::Command;
use support::write_file;
use tempfile::TempDir;

const NESTED: &str = "lib/tasks/reporting/exports/quarterly/generators/\
                      spreadsheets/formatters/currency_and_percentage_formatter.rb";

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=stackpack",
            "-c",
            "user.email=stackpack@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// A committed project whose compiled assets are ignored by git.
fn repository() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    write_file(dir.path(), "app.rb", "puts 'hi'");
    write_file(dir.path(), ".gitignore", "public/assets\n");
    write_file(dir.path(), NESTED, "module Formatter; end");
    commit_all(dir.path(), "initial");
    write_file(dir.path(), "public/assets/app.css", "body {}");
    dir
}

fn package(format: Format) -> PackageConfig {
    PackageConfig {
        prerequisites: Vec::new(),
        format,
        ..PackageConfig::default()
    }
}

async fn export_and_merge(format: Format) {
    support::init_tracing();
    let repo = repository();
    let git = GitCli::new(repo.path());
    let builder = ArchiveBuilder::new(repo.path(), repo.path().join("build"), &git);

    let revision = git.revision().await.unwrap();
    assert_eq!(revision.as_str().len(), 40);

    let filename = format!("git-{revision}.{}", format.extension());
    let archive = builder.build(&package(format), &filename).await.unwrap();

    assert!(archive.contains("app.rb").unwrap());
    assert!(archive.contains(NESTED).unwrap());
    assert!(archive.contains("public/assets/app.css").unwrap());
    assert!(!archive.contains(".gitignore").unwrap());
}

#[tokio::test]
async fn zip_export_keeps_long_paths_and_merges_ignored_assets() {
    export_and_merge(Format::Zip).await;
}

#[tokio::test]
async fn tar_export_keeps_long_paths_and_merges_ignored_assets() {
    export_and_merge(Format::Tar).await;
}

#[tokio::test]
async fn fetch_dry_run_reports_upstream_commits() {
    support::init_tracing();
    let seed = repository();
    let parent = TempDir::new().unwrap();
    let upstream = parent.path().join("upstream.git");
    let work = parent.path().join("work");
    let upstream_arg = upstream.to_string_lossy().into_owned();
    let work_arg = work.to_string_lossy().into_owned();

    git(
        parent.path(),
        &["clone", "-q", "--bare", &seed.path().to_string_lossy(), &upstream_arg],
    );
    git(parent.path(), &["clone", "-q", &upstream_arg, &work_arg]);

    let local = GitCli::new(&work);
    assert_eq!(local.pending_changes().await.unwrap().trim(), "");
    assert_synchronized(&local).await.unwrap();

    write_file(seed.path(), "CHANGELOG.md", "- new");
    commit_all(seed.path(), "second");
    git(seed.path(), &["push", "-q", &upstream_arg, "HEAD"]);

    assert!(!local.pending_changes().await.unwrap().trim().is_empty());
    let err = assert_synchronized(&local).await.unwrap_err();
    assert!(matches!(err, PreflightError::Diverged { .. }));
}
