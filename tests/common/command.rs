use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with one commit tracking `1.txt` and `a/2.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
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

    twig_add(repository_dir.path(), &["1.txt", "a/2.txt"]);
    twig_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_twig_command(dir, &["commit", message]);
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE); // %Y-%m-%d %H:%M:%S %z
    cmd
}

pub fn twig_add(dir: &Path, files: &[&str]) {
    for file in files {
        run_twig_command(dir, &["add", file]).assert().success();
    }
}

/// Write a file, stage it and commit it
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) -> String {
    write_file(FileSpec::new(dir.join(file), content.to_string()));
    twig_add(dir, &[file]);
    twig_commit(dir, message).assert().success();

    head_commit_id(dir)
}

pub fn branch_tip(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".twig").join("refs").join("heads").join(branch);
    std::fs::read_to_string(ref_path)
        .expect("Failed to read branch ref")
        .trim()
        .to_string()
}

/// Tip of the branch HEAD points at
pub fn head_commit_id(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".twig").join("HEAD")).expect("Failed to read HEAD");
    let branch = head
        .trim()
        .strip_prefix("ref: refs/heads/")
        .expect("HEAD is not a branch reference");

    branch_tip(dir, branch)
}
