//! Integration tests for the credvault CLI.
//!
//! These run the binary end-to-end with `assert_cmd`.  Passwords come
//! from `CREDVAULT_PASSWORD` and secrets are passed inline, so nothing
//! waits on an interactive prompt.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: a credvault command rooted in `tmp` with a clean environment.
fn credvault(tmp: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("credvault").expect("binary should exist");
    cmd.current_dir(tmp.path())
        .env_remove("CREDVAULT_TOKEN")
        .env_remove("CREDVAULT_DATA_DIR")
        .env_remove("CREDVAULT_PASSWORD")
        .env("CREDVAULT_TOKEN_SECRET", "cli-test-secret")
        .args(["--data-dir", "data"]);
    cmd
}

fn register(tmp: &TempDir, username: &str, password: &str) {
    credvault(tmp)
        .args(["register", username])
        .env("CREDVAULT_PASSWORD", password)
        .assert()
        .success();
}

fn login(tmp: &TempDir, username: &str, password: &str) -> String {
    let out = credvault(tmp)
        .args(["login", username, "--raw"])
        .env("CREDVAULT_PASSWORD", password)
        .output()
        .unwrap();
    assert!(out.status.success());
    String::from_utf8(out.stdout).unwrap().trim().to_string()
}

#[test]
fn help_flag_shows_usage() {
    #[allow(deprecated)]
    Command::cargo_bin("credvault")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Self-hosted credential vault"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn version_flag_shows_version() {
    #[allow(deprecated)]
    Command::cargo_bin("credvault")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn no_args_shows_help() {
    #[allow(deprecated)]
    Command::cargo_bin("credvault")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_stores_and_key() {
    let tmp = TempDir::new().unwrap();

    credvault(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault initialized"));

    tmp.child("data/users.json").assert(predicate::path::exists());
    tmp.child("data/passwords.json").assert("[]");
    tmp.child("data/encryption.key").assert(predicate::path::exists());
}

#[test]
fn second_init_reuses_the_key() {
    let tmp = TempDir::new().unwrap();
    credvault(&tmp).arg("init").assert().success();
    let key = std::fs::read(tmp.path().join("data/encryption.key")).unwrap();

    credvault(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("existing vault"));
    assert_eq!(std::fs::read(tmp.path().join("data/encryption.key")).unwrap(), key);
}

#[test]
fn duplicate_register_fails() {
    let tmp = TempDir::new().unwrap();
    register(&tmp, "alice", "pw1");

    credvault(&tmp)
        .args(["register", "alice"])
        .env("CREDVAULT_PASSWORD", "pw1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn wrong_password_login_fails() {
    let tmp = TempDir::new().unwrap();
    register(&tmp, "alice", "pw1");

    credvault(&tmp)
        .args(["login", "alice"])
        .env("CREDVAULT_PASSWORD", "wrong")
        .assert()
        .failure();
}

#[test]
fn list_without_token_fails() {
    let tmp = TempDir::new().unwrap();

    credvault(&tmp)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token"));
}

#[test]
fn list_with_bad_token_fails() {
    let tmp = TempDir::new().unwrap();

    credvault(&tmp)
        .args(["list", "--token", "garbage"])
        .assert()
        .failure();
}

#[test]
fn add_list_update_delete_roundtrip() {
    let tmp = TempDir::new().unwrap();
    register(&tmp, "alice", "pw1");
    let token = login(&tmp, "alice", "pw1");

    credvault(&tmp)
        .args(["add", "example.com", "a@x", "s3cret"])
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved entry"));

    credvault(&tmp)
        .args(["list", "--reveal"])
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("s3cret"));

    // Masked by default.
    credvault(&tmp)
        .arg("list")
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());

    let raw = std::fs::read_to_string(tmp.path().join("data/passwords.json")).unwrap();
    assert!(!raw.contains("s3cret"));
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = doc[0]["id"].as_str().unwrap().to_string();

    credvault(&tmp)
        .args(["update", &id, "example.com", "a@x", "n3w"])
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success();

    credvault(&tmp)
        .args(["list", "--reveal"])
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success()
        .stdout(predicate::str::contains("n3w"));

    credvault(&tmp)
        .args(["delete", &id, "--force"])
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success();

    credvault(&tmp)
        .args(["delete", &id, "--force"])
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .failure();
}

#[test]
fn other_users_entries_are_invisible() {
    let tmp = TempDir::new().unwrap();
    register(&tmp, "alice", "pw1");
    register(&tmp, "bob", "pw2");
    let alice = login(&tmp, "alice", "pw1");
    let bob = login(&tmp, "bob", "pw2");

    credvault(&tmp)
        .args(["add", "example.com", "a@x", "s3cret"])
        .env("CREDVAULT_TOKEN", &alice)
        .assert()
        .success();

    credvault(&tmp)
        .args(["list", "--reveal"])
        .env("CREDVAULT_TOKEN", &bob)
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com").not());
}

#[test]
fn whoami_shows_username() {
    let tmp = TempDir::new().unwrap();
    register(&tmp, "alice", "pw1");
    let token = login(&tmp, "alice", "pw1");

    credvault(&tmp)
        .arg("whoami")
        .env("CREDVAULT_TOKEN", &token)
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn data_dir_from_environment() {
    let tmp = TempDir::new().unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("credvault")
        .unwrap()
        .current_dir(tmp.path())
        .env("CREDVAULT_DATA_DIR", "from-env")
        .env("CREDVAULT_TOKEN_SECRET", "cli-test-secret")
        .arg("init")
        .assert()
        .success();

    tmp.child("from-env/encryption.key").assert(predicate::path::exists());
}
