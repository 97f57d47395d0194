use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("ssstatus")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setlength"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("setup"));
}

#[test]
fn test_no_command_prints_usage() {
    cargo_bin_cmd!("ssstatus")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_command_prints_usage() {
    cargo_bin_cmd!("ssstatus")
        .arg("scroll")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("clear"));
}

#[test]
fn test_missing_argument_prints_usage() {
    cargo_bin_cmd!("ssstatus")
        .arg("set")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_extra_argument_prints_usage() {
    cargo_bin_cmd!("ssstatus")
        .args(["show", "now"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("ssstatus")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
