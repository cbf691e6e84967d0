use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("skein")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("threads"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_view_help_shows_flags() {
    cargo_bin_cmd!("skein")
        .args(["view", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fixture"))
        .stdout(predicate::str::contains("--room"))
        .stdout(predicate::str::contains("--event"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("skein")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}
