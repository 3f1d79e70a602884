use crate::common::command::{
    branch_tip, commit_file, head_commit_id, repository_dir, run_twig_command,
};
use crate::common::file::read_file;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::{fixture, rstest};
use std::path::PathBuf;

mod common;

struct Pair {
    _root: TempDir,
    local: PathBuf,
    remote: PathBuf,
}

/// Two sibling repositories, `local` knowing `remote` as `origin`
#[fixture]
fn pair(repository_dir: TempDir) -> Pair {
    let local = repository_dir.child("local").path().to_path_buf();
    let remote = repository_dir.child("remote").path().to_path_buf();

    for dir in [&local, &remote] {
        std::fs::create_dir_all(dir).unwrap();
        run_twig_command(dir, &["init"]).assert().success();
    }
    run_twig_command(&local, &["add-remote", "origin", "../remote/.twig"])
        .assert()
        .success();

    Pair {
        _root: repository_dir,
        local,
        remote,
    }
}

#[rstest]
fn remotes_are_registered_once(pair: Pair) {
    assert_eq!(
        read_file(&pair.local.join(".twig/remotes/origin")),
        "../remote/.twig"
    );

    run_twig_command(&pair.local, &["add-remote", "origin", "elsewhere/.twig"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A remote with that name already exists.",
        ));

    run_twig_command(&pair.local, &["rm-remote", "origin"])
        .assert()
        .success();
    run_twig_command(&pair.local, &["rm-remote", "origin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A remote with that name does not exist.",
        ));
}

#[rstest]
fn push_copies_history_and_moves_the_remote_branch(pair: Pair) {
    let tip = commit_file(&pair.local, "f.txt", "v1", "Local work");

    run_twig_command(&pair.local, &["push", "origin", "master"])
        .assert()
        .success();

    assert_eq!(branch_tip(&pair.remote, "master"), tip);
    assert!(pair.remote.join(format!(".twig/objects/commit/{tip}")).is_file());
    assert!(!pair.remote.join("f.txt").exists());

    run_twig_command(&pair.remote, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Local work"));
}

#[rstest]
fn push_refuses_to_rewrite_remote_history(pair: Pair) {
    commit_file(&pair.remote, "r.txt", "remote", "Remote work");
    commit_file(&pair.local, "l.txt", "local", "Local work");

    run_twig_command(&pair.local, &["push", "origin", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please pull down remote changes before pushing.",
        ));
}

#[rstest]
fn fetch_records_a_tracking_branch_without_touching_the_tree(pair: Pair) {
    let remote_tip = commit_file(&pair.remote, "r.txt", "remote", "Remote work");
    let local_tip = head_commit_id(&pair.local);

    run_twig_command(&pair.local, &["fetch", "origin", "master"])
        .assert()
        .success();

    assert_eq!(
        read_file(&pair.local.join(".twig/refs/remotes/origin/master")),
        remote_tip
    );
    assert_eq!(head_commit_id(&pair.local), local_tip);
    assert!(!pair.local.join("r.txt").exists());

    run_twig_command(&pair.local, &["fetch", "origin", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "That remote does not have that branch.",
        ));
}

#[rstest]
fn pull_fast_forwards_onto_the_remote_branch(pair: Pair) {
    let remote_tip = commit_file(&pair.remote, "r.txt", "remote", "Remote work");

    run_twig_command(&pair.local, &["pull", "origin", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current branch fast-forwarded."));

    assert_eq!(head_commit_id(&pair.local), remote_tip);
    assert_eq!(read_file(&pair.local.join("r.txt")), "remote");
}

#[rstest]
fn missing_remote_directories_are_reported(pair: Pair) {
    run_twig_command(&pair.local, &["add-remote", "nowhere", "../missing/.twig"])
        .assert()
        .success();

    for command in ["push", "fetch", "pull"] {
        run_twig_command(&pair.local, &[command, "nowhere", "master"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Remote directory not found."));
    }
}
