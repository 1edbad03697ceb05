//! Tests for the `backvault` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    temp: TempDir,
}

impl Env {
    fn new() -> Self {
        let env = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(env.source()).unwrap();
        fs::create_dir_all(env.backup()).unwrap();
        fs::write(env.source().join("a.txt"), "hi").unwrap();
        env
    }

    fn source(&self) -> PathBuf {
        self.temp.path().join("src")
    }

    fn backup(&self) -> PathBuf {
        self.temp.path().join("bk")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("backvault").unwrap();
        cmd.env("BACKVAULT_DATA_DIR", self.temp.path().join("state"));
        cmd
    }

    fn add_docs(&self) {
        self.cmd()
            .args(["profile", "add", "Docs"])
            .arg(self.source())
            .arg(self.backup())
            .assert()
            .success()
            .stdout(predicate::str::contains("Created profile: Docs"));
    }

    fn only_snapshot(&self) -> PathBuf {
        let mut dirs: Vec<_> = fs::read_dir(self.backup())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(dirs.len(), 1);
        dirs.remove(0)
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

#[test]
fn profile_add_and_list() {
    let env = Env::new();
    env.add_docs();

    env.cmd()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Docs"));
}

#[test]
fn duplicate_profile_is_rejected() {
    let env = Env::new();
    env.add_docs();

    env.cmd()
        .args(["profile", "add", "docs"])
        .arg(env.source())
        .arg(env.backup())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_list_and_restore() {
    let env = Env::new();
    env.add_docs();

    env.cmd()
        .args(["backup", "create", "Docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot created"));
    let snapshot = env.only_snapshot();
    assert_eq!(fs::read_to_string(snapshot.join("a.txt")).unwrap(), "hi");

    env.cmd()
        .args(["backup", "list", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains(folder_name(&snapshot)));

    fs::write(env.source().join("junk.txt"), "junk").unwrap();

    // Without --force nothing is touched
    env.cmd()
        .args(["backup", "restore", "Docs", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert!(env.source().join("junk.txt").exists());

    env.cmd()
        .args(["backup", "restore", "Docs", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete"));
    assert!(!env.source().join("junk.txt").exists());
    assert_eq!(fs::read_to_string(env.source().join("a.txt")).unwrap(), "hi");
}

#[test]
fn rename_and_delete_snapshot() {
    let env = Env::new();
    env.add_docs();
    env.cmd().args(["backup", "create", "Docs"]).assert().success();
    let folder = folder_name(&env.only_snapshot());

    env.cmd()
        .args(["backup", "rename", "Docs", &folder, "Before upgrade"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Before upgrade"));

    env.cmd()
        .args(["backup", "delete", "Docs", "before upgrade"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted snapshot"));
    assert_eq!(fs::read_dir(env.backup()).unwrap().count(), 0);
}

#[test]
fn backup_path_prints_directories() {
    let env = Env::new();
    env.add_docs();

    env.cmd()
        .args(["backup", "path", "Docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bk"));
}

#[test]
fn log_shows_profile_activity() {
    let env = Env::new();
    env.add_docs();
    env.cmd().args(["backup", "create", "Docs"]).assert().success();

    env.cmd()
        .args(["log", "--profile", "Docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Docs] Created snapshot"))
        .stdout(predicate::str::contains("[Docs] Created profile"));
}

#[test]
fn config_switches_backend() {
    let env = Env::new();

    env.cmd()
        .args(["config", "--backend", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot backend:     scan"));

    env.add_docs();
    env.cmd().args(["backup", "create", "Docs"]).assert().success();
    assert!(env
        .only_snapshot()
        .join(".backvault-meta.json")
        .exists());

    env.cmd()
        .args(["config", "--backend", "tape"])
        .assert()
        .failure();
}

#[test]
fn unknown_profile_fails() {
    let env = Env::new();

    env.cmd()
        .args(["backup", "list", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile not found"));
}
