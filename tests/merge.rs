use crate::common::command::{branch_tip, init_repository_dir, repository_dir, run_dvc_command};
use crate::common::file::{FileSpec, delete_path, read_file, write_file};
use assert_fs::TempDir;
use dvc::artifacts::branch::branch_name::BranchName;
use dvc::artifacts::objects::commit::{Author, Commit};
use dvc::artifacts::objects::tree::Tree;
use dvc::{DvcError, Repository};
use pretty_assertions::assert_eq;
use predicates::prelude::predicate;
use rstest::rstest;
use std::path::Path;

mod common;

fn write_and_commit(repository: &Repository, path: &str, content: &str, message: &str) -> String {
    write_file(FileSpec::new(repository.path().join(path), content.to_string()));
    common::stage(repository, path);
    repository.commit(message).unwrap().to_string()
}

/// `main` holding A, with `feature` branched off it
fn forked_repository(dir: &Path) -> Repository {
    let repository = common::init_repository(dir);
    write_and_commit(&repository, "A", "hello", "c1");
    repository.branch("feature").unwrap();
    repository
}

#[rstest]
fn merging_diverged_branches_creates_a_two_parent_commit(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    let main_tip = write_and_commit(&repository, "B", "main-only", "c2");

    repository.checkout("feature").unwrap();
    let feature_tip = write_and_commit(&repository, "A", "feature-edit", "c3");
    repository.checkout("main").unwrap();

    let merge_oid = repository.merge("feature", None).unwrap();

    let merge_commit = repository.database().load_commit(&merge_oid).unwrap();
    assert_eq!(
        merge_commit
            .parents()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec![main_tip, feature_tip.clone()]
    );
    assert_eq!(merge_commit.message(), "Merge branch 'feature' into 'main'");
    assert_eq!(branch_tip(dir.path(), "main"), Some(merge_oid.to_string()));
    assert_eq!(branch_tip(dir.path(), "feature"), Some(feature_tip));

    assert_eq!(read_file(&dir.path().join("A")), "feature-edit");
    assert_eq!(read_file(&dir.path().join("B")), "main-only");
}

#[rstest]
fn merging_into_an_untouched_branch_still_records_a_merge(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    let main_tip = repository.current_head().unwrap().unwrap();

    repository.checkout("feature").unwrap();
    write_and_commit(&repository, "A", "feature-edit", "c3");
    repository.checkout("main").unwrap();

    let merge_oid = repository
        .merge("feature", Some("bring in feature"))
        .unwrap();

    let merge_commit = repository.database().load_commit(&merge_oid).unwrap();
    assert_eq!(merge_commit.parents().len(), 2);
    assert_eq!(merge_commit.parents()[0], main_tip);
    assert_eq!(merge_commit.message(), "bring in feature");
    assert_eq!(read_file(&dir.path().join("A")), "feature-edit");
}

#[rstest]
fn merging_a_branch_already_contained_in_head_is_a_no_op(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    write_and_commit(&repository, "B", "main-only", "c2");
    let head = repository.current_head().unwrap().unwrap();

    assert_eq!(repository.merge("feature", None).unwrap(), head);
    assert_eq!(repository.merge("main", None).unwrap(), head);
    assert_eq!(repository.current_head().unwrap(), Some(head));

    run_dvc_command(dir.path(), &["merge", "feature"])
        .assert()
        .success()
        .stdout("Already up to date.\n");
}

#[rstest]
fn conflicting_edits_stop_the_merge(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    write_and_commit(&repository, "B", "shared", "c2");
    let main_tip = write_and_commit(&repository, "A", "main-edit", "c3");

    repository.checkout("feature").unwrap();
    write_and_commit(&repository, "B", "shared", "c4");
    let feature_tip = write_and_commit(&repository, "A", "feature-edit", "c5");
    repository.checkout("main").unwrap();

    let error = repository.merge("feature", None).unwrap_err();

    // B was changed identically on both sides and merges cleanly
    assert!(matches!(
        &error,
        DvcError::MergeConflict { paths } if paths == &vec!["A".to_string()]
    ));
    assert_eq!(branch_tip(dir.path(), "main"), Some(main_tip));
    assert_eq!(branch_tip(dir.path(), "feature"), Some(feature_tip));
    assert_eq!(read_file(&dir.path().join("A")), "main-edit");

    run_dvc_command(dir.path(), &["merge", "feature"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "CONFLICT (content): merge conflict in A",
        ))
        .stderr(predicate::str::contains(
            "error: automatic merge failed, conflicts in: A",
        ));
}

#[rstest]
fn modification_against_deletion_conflicts(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    write_and_commit(&repository, "A", "main-edit", "c2");

    repository.checkout("feature").unwrap();
    delete_path(&dir.path().join("A"));
    common::stage(&repository, "A");
    repository.commit("drop A").unwrap();
    repository.checkout("main").unwrap();

    assert!(matches!(
        repository.merge("feature", None),
        Err(DvcError::MergeConflict { paths }) if paths == vec!["A".to_string()]
    ));
}

#[rstest]
fn deletion_against_an_unchanged_path_wins(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let repository = common::open_repository(dir.path());
    repository.branch("cleanup").unwrap();
    write_and_commit(&repository, "1.txt", "one, revised", "Revise one");

    repository.checkout("cleanup").unwrap();
    delete_path(&dir.path().join("a").join("2.txt"));
    common::stage(&repository, "a/2.txt");
    repository.commit("Drop two").unwrap();
    repository.checkout("main").unwrap();
    assert!(dir.path().join("a").join("2.txt").is_file());

    let merge_oid = repository.merge("cleanup", None).unwrap();

    let tree = repository.database().load_commit_tree(&merge_oid).unwrap();
    assert_eq!(
        tree.entries().keys().cloned().collect::<Vec<_>>(),
        vec!["1.txt".to_string(), "a/b/3.txt".to_string()]
    );
    assert!(!dir.path().join("a").join("2.txt").exists());
    assert_eq!(read_file(&dir.path().join("1.txt")), "one, revised");
}

#[rstest]
fn merge_requires_a_clean_staging_area(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    repository.checkout("feature").unwrap();
    write_and_commit(&repository, "A", "feature-edit", "c2");
    repository.checkout("main").unwrap();
    write_file(FileSpec::new(dir.path().join("B"), "pending".to_string()));
    common::stage(&repository, "B");

    assert!(matches!(
        repository.merge("feature", None),
        Err(DvcError::UncommittedChanges)
    ));
}

#[rstest]
fn merging_an_unknown_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let repository = common::open_repository(dir.path());

    assert!(matches!(
        repository.merge("nonexistent", None),
        Err(DvcError::BranchNotFound(name)) if name == "nonexistent"
    ));
    run_dvc_command(dir.path(), &["merge", "nonexistent"])
        .assert()
        .failure()
        .stderr("error: branch 'nonexistent' not found\n");
}

#[rstest]
fn unrelated_histories_have_no_common_ancestor(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let repository = common::open_repository(dir.path());

    let blob_oid = repository.database().put("orphaned").unwrap();
    let tree_oid = repository
        .database()
        .store(&Tree::new([("orphan.txt".to_string(), blob_oid)].into()))
        .unwrap();
    let root = Commit::new(
        vec![],
        tree_oid,
        Author::from_config(repository.config()),
        "Unrelated root".to_string(),
    );
    let root_oid = repository.database().store(&root).unwrap();
    repository
        .refs()
        .update_branch(&BranchName::try_parse("orphan").unwrap(), &root_oid)
        .unwrap();
    let head = branch_tip(dir.path(), "main");

    let error = repository.merge("orphan", None).unwrap_err();

    assert!(matches!(error, DvcError::NoCommonAncestor(_, _)));
    assert_eq!(branch_tip(dir.path(), "main"), head);
}

#[rstest]
fn merge_refuses_to_overwrite_untracked_files(repository_dir: TempDir) {
    let dir = repository_dir;
    let repository = forked_repository(dir.path());
    let main_tip = write_and_commit(&repository, "B", "main-only", "c2");

    repository.checkout("feature").unwrap();
    write_and_commit(&repository, "C", "from feature", "c3");
    repository.checkout("main").unwrap();
    write_file(FileSpec::new(dir.path().join("C"), "local scratch".to_string()));

    let error = repository.merge("feature", None).unwrap_err();

    assert!(matches!(
        &error,
        DvcError::UntrackedOverwritten { paths } if paths == &vec!["C".to_string()]
    ));
    assert_eq!(branch_tip(dir.path(), "main"), Some(main_tip));
    assert_eq!(read_file(&dir.path().join("C")), "local scratch");
}
