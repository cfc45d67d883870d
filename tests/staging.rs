use crate::common::command::{init_repository_dir, repository_dir, run_dvc_command};
use crate::common::file::{FileSpec, delete_path, write_file, write_generated_files};
use assert_fs::TempDir;
use dvc::DvcError;
use pretty_assertions::assert_eq;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

fn staged_paths(repository: &dvc::Repository) -> Vec<String> {
    repository.index().unwrap().entries().keys().cloned().collect()
}

#[rstest]
fn adding_a_directory_stages_every_file_below_it(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());
    let raw = dir.path().join("data").join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    let generated = write_generated_files(&raw, 4);
    write_file(FileSpec::new(dir.path().join("README.md"), "readme".to_string()));

    common::stage(&repository, "data");

    let mut expected = generated
        .iter()
        .map(|spec| {
            format!(
                "data/raw/{}",
                spec.path.file_name().unwrap().to_string_lossy()
            )
        })
        .collect::<Vec<_>>();
    expected.sort();
    assert_eq!(staged_paths(&repository), expected);
}

#[rstest]
fn staged_entries_point_at_stored_blobs(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());
    write_file(FileSpec::new(dir.path().join("A"), "hello".to_string()));

    common::stage(&repository, "A");

    let index = repository.index().unwrap();
    let oid = index.entry_by_path("A").unwrap();
    assert_eq!(repository.database().get(oid).unwrap().as_ref(), b"hello");
}

#[rstest]
fn metadata_and_ignored_paths_are_never_staged(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());
    write_file(FileSpec::new(
        dir.path().join(".dvcignore"),
        "# scratch output\n*.log\ncache/\n".to_string(),
    ));
    write_file(FileSpec::new(dir.path().join("run.log"), "noise".to_string()));
    write_file(FileSpec::new(dir.path().join("cache").join("blob.bin"), "cached".to_string()));
    write_file(FileSpec::new(dir.path().join("model.csv"), "1,2".to_string()));

    common::stage(&repository, ".");
    common::stage(&repository, "run.log");

    assert_eq!(
        staged_paths(&repository),
        vec![".dvcignore".to_string(), "model.csv".to_string()]
    );
}

#[rstest]
fn adding_a_missing_untracked_path_fails(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());

    let error = repository.add(dir.path().join("nowhere.csv")).unwrap_err();
    assert!(matches!(error, DvcError::FileNotFound(_)));

    run_dvc_command(dir.path(), &["add", "nowhere.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: pathspec 'nowhere.csv' did not match any files",
        ));
}

#[rstest]
fn adding_a_path_outside_the_repository_fails(repository_dir: TempDir) {
    let project = repository_dir.path().join("project");
    let repository = common::init_repository(&project);
    write_file(FileSpec::new(
        repository_dir.path().join("outside.csv"),
        "x".to_string(),
    ));

    let error = repository
        .add(repository_dir.path().join("outside.csv"))
        .unwrap_err();

    assert!(matches!(error, DvcError::OutsideRepository(_)));
}

#[rstest]
fn a_failed_add_leaves_the_index_untouched(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());
    write_file(FileSpec::new(dir.path().join("ok.csv"), "ok".to_string()));

    let result = repository.add_all(&[dir.path().join("ok.csv"), dir.path().join("missing.csv")]);

    assert!(matches!(result, Err(DvcError::FileNotFound(_))));
    assert!(repository.index().unwrap().is_empty());
}

#[rstest]
fn deleted_tracked_files_are_staged_as_removals(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    delete_path(&dir.path().join("a").join("2.txt"));

    run_dvc_command(dir.path(), &["add", "a/2.txt"]).assert().success();

    let repository = common::open_repository(dir.path());
    let index = repository.index().unwrap();
    assert!(index.removals().contains("a/2.txt"));

    let commit_oid = repository.commit("drop 2.txt").unwrap();
    let tree = repository.database().load_commit_tree(&commit_oid).unwrap();
    assert_eq!(
        tree.entries().keys().cloned().collect::<Vec<_>>(),
        vec!["1.txt".to_string(), "a/b/3.txt".to_string()]
    );
}

#[rstest]
fn adding_a_directory_picks_up_deletions_inside_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    delete_path(&dir.path().join("a").join("b"));

    run_dvc_command(dir.path(), &["add", "a"]).assert().success();

    let repository = common::open_repository(dir.path());
    let index = repository.index().unwrap();
    assert_eq!(
        index.removals().iter().cloned().collect::<Vec<_>>(),
        vec!["a/b/3.txt".to_string()]
    );
    assert!(index.entry_by_path("a/2.txt").is_some());
}

#[rstest]
fn restaging_a_file_keeps_the_latest_content(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());
    let path = dir.path().join("A");

    write_file(FileSpec::new(path.clone(), "first".to_string()));
    common::stage(&repository, "A");
    write_file(FileSpec::new(path, "second".to_string()));
    common::stage(&repository, "A");

    let index = repository.index().unwrap();
    assert_eq!(index.entries().len(), 1);
    assert_eq!(
        repository
            .database()
            .get(index.entry_by_path("A").unwrap())
            .unwrap()
            .as_ref(),
        b"second"
    );
}

#[rstest]
fn paths_with_line_breaks_are_rejected_without_touching_the_index(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = common::init_repository(dir.path());
    write_file(FileSpec::new(dir.path().join("a\nb.csv"), "x".to_string()));
    write_file(FileSpec::new(dir.path().join("ok.csv"), "ok".to_string()));

    let error = repository.add(dir.path().join("a\nb.csv")).unwrap_err();
    assert!(matches!(error, DvcError::UnsupportedPath(path) if path == "a\nb.csv"));
    assert!(matches!(
        repository.add(dir.path()),
        Err(DvcError::UnsupportedPath(_))
    ));

    // the repository stays usable
    common::stage(&repository, "ok.csv");
    assert_eq!(staged_paths(&repository), vec!["ok.csv".to_string()]);
    repository.commit("add ok").unwrap();
}
