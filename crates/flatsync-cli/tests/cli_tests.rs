//! Integration tests for the flatsync CLI binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use assert_cmd::Command;
use flatsync_test_utils::TestHost;
use flatsync_test_utils::fixtures::{HOSTS_BASIC, PASSWD_SYSTEM};
use predicates::prelude::*;

/// Get a Command for the flatsync binary
fn flatsync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("flatsync"));
    cmd.env_remove("FLATSYNC_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A flatsync command for the passwd file inside `host`.
fn passwd_cmd(host: &TestHost) -> Command {
    let mut cmd = flatsync_cmd();
    cmd.arg("--kind")
        .arg("passwd")
        .arg("--file")
        .arg(host.path("passwd").as_str());
    cmd
}

fn passwd_host() -> TestHost {
    let host = TestHost::new();
    host.write("passwd", PASSWD_SYSTEM);
    host
}

// ============================================================================
// Help and selection
// ============================================================================

#[test]
fn test_help_output() {
    flatsync_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("flatsync"));
}

#[test]
fn test_no_kind_selected() {
    flatsync_cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no record kind selected"));
}

#[test]
fn test_unknown_kind() {
    flatsync_cmd()
        .args(["--kind", "crontab", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown record kind 'crontab'"));
}

// ============================================================================
// list / get
// ============================================================================

#[test]
fn test_list_prints_record_names() {
    let host = passwd_host();
    passwd_cmd(&host)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("root"))
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("bob"))
        .stdout(predicate::str::contains("system accounts").not());
}

#[test]
fn test_list_json() {
    let host = passwd_host();
    let output = passwd_cmd(&host).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[2]["name"], "alice");
    assert_eq!(records[2]["fields"]["shell"], "/bin/bash");
    assert_eq!(records[2]["ensure"], "present");
}

#[test]
fn test_list_missing_file_is_empty() {
    let host = TestHost::new();
    passwd_cmd(&host)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no passwd records"));
    assert!(!host.exists("passwd"));
}

#[test]
fn test_get_prints_value() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["get", "bob", "comment"])
        .assert()
        .success()
        .stdout("Bob\n");
}

#[test]
fn test_get_ensure_of_missing_record() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["get", "zed", "ensure"])
        .assert()
        .success()
        .stdout("absent\n");
}

#[test]
fn test_get_missing_record_fails() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["get", "zed", "shell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no passwd record named 'zed'"));
}

// ============================================================================
// set / remove
// ============================================================================

#[test]
fn test_set_updates_existing_record() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["set", "alice", "shell=/bin/zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated passwd alice"));

    assert!(host.read("passwd").starts_with("# HEADER:"));
    host.assert_contains("passwd", "alice:x:1000:1000::/home/alice:/bin/zsh\n");
    host.assert_contains("passwd", "# system accounts\n");
}

#[test]
fn test_set_creates_missing_record() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args([
            "set",
            "carol",
            "password=x",
            "uid=1002",
            "gid=1002",
            "home=/home/carol",
            "shell=/bin/sh",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created passwd carol"));

    host.assert_contains("passwd", "carol:x:1002:1002::/home/carol:/bin/sh\n");
}

#[test]
fn test_set_with_target_moves_record() {
    let host = passwd_host();
    let local = host.path("passwd.local");
    passwd_cmd(&host)
        .args(["set", "bob", "shell=/bin/bash", "--target", local.as_str()])
        .assert()
        .success();

    host.assert_not_contains("passwd", "bob");
    assert_eq!(host.body("passwd.local"), "bob:x:1001:1001:Bob:/home/bob:/bin/bash\n");
}

#[test]
fn test_set_unknown_attribute_fails() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["set", "alice", "colour=blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown passwd attribute 'colour'"));

    assert_eq!(host.read("passwd"), PASSWD_SYSTEM);
}

#[test]
fn test_get_name_prints_record_name() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["get", "alice", "name"])
        .assert()
        .success()
        .stdout("alice\n");
}

#[test]
fn test_set_name_fails() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["set", "alice", "name=bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'name' is the record name"));

    assert_eq!(host.read("passwd"), PASSWD_SYSTEM);
}

#[test]
fn test_set_invalid_ensure_fails() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["set", "alice", "ensure=purged"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("purged"));
}

#[test]
fn test_remove_deletes_line() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["remove", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed passwd bob"));

    host.assert_not_contains("passwd", "bob");
    host.assert_contains("passwd", "daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin\n\n");
}

#[test]
fn test_remove_missing_record_fails() {
    let host = passwd_host();
    passwd_cmd(&host)
        .args(["remove", "zed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no passwd record named 'zed'"));
}

// ============================================================================
// Configuration files
// ============================================================================

#[test]
fn test_config_file_selects_kind() {
    let host = TestHost::new();
    host.write("hosts", HOSTS_BASIC);
    let config = host.write(
        "hosts.toml",
        &format!(
            "kind = \"hosts\"\ndefault_target = \"{}\"\nheader = false\n",
            host.path("hosts")
        ),
    );

    flatsync_cmd()
        .args(["--config", config.as_str(), "set", "db", "aliases=db.internal pg"])
        .assert()
        .success();

    assert_eq!(
        host.read("hosts"),
        "127.0.0.1\tlocalhost\n192.168.1.10\tdb\tdb.internal pg\n"
    );
}

#[test]
fn test_config_from_environment() {
    let host = TestHost::new();
    host.write("group", "wheel:x:10:alice\n");
    let config = host.write(
        "group.json",
        &format!(
            "{{\"kind\": \"group\", \"default_target\": \"{}\"}}",
            host.path("group")
        ),
    );

    flatsync_cmd()
        .env("FLATSYNC_CONFIG", config.as_str())
        .args(["get", "wheel", "members"])
        .assert()
        .success()
        .stdout("alice\n");
}
