use crate::common::file::{FileSpec, write_file};
use crate::common::{AUTHOR_DATE, AUTHOR_EMAIL, AUTHOR_NAME};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository with one commit of three files across nested directories
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_dvc_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_dvc_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    dvc_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_dvc_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("dvc").expect("Failed to find dvc binary");
    cmd.envs(vec![
        ("NO_COLOR", "1"),
        ("DVC_AUTHOR_NAME", AUTHOR_NAME),
        ("DVC_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("DVC_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn dvc_commit(dir: &Path, message: &str) -> Command {
    run_dvc_command(dir, &["commit", "-m", message])
}

/// Stage everything and commit it
pub fn dvc_commit_all(dir: &Path, message: &str) {
    run_dvc_command(dir, &["add", "."]).assert().success();
    dvc_commit(dir, message).assert().success();
}

/// Tip of a branch, read straight from its ref file
pub fn branch_tip(dir: &Path, branch: &str) -> Option<String> {
    let ref_path = dir.join(".dvc").join("refs").join("heads").join(branch);
    std::fs::read_to_string(ref_path)
        .ok()
        .map(|content| content.trim().to_string())
}

pub fn head_content(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".dvc").join("HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}
