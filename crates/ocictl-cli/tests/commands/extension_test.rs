//! Tests for the `extension` command and extension discovery behavior.

use predicates::prelude::*;
use tempfile::TempDir;

use crate::ocictl;

fn extensions_dir(home: &TempDir) -> std::path::PathBuf {
    let dir = home.path().join(".ocictl/extensions");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn extension_requires_subcommand() {
    let home = TempDir::new().unwrap();
    ocictl(&home).arg("extension").assert().failure().code(2);
}

#[test]
fn list_on_fresh_home_is_empty() {
    let home = TempDir::new().unwrap();

    ocictl(&home)
        .arg("extension")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No extensions installed."));
}

#[test]
fn list_json_on_fresh_home_is_empty_array() {
    let home = TempDir::new().unwrap();

    ocictl(&home)
        .arg("extension")
        .arg("list")
        .arg("--output")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn corrupt_artifact_aborts_before_parsing() {
    let home = TempDir::new().unwrap();
    let dir = extensions_dir(&home);
    std::fs::write(dir.join("oci-broken"), b"not a library").unwrap();

    // Fail-fast: the scan happens before argument parsing, so even listing
    // fails once a matching artifact cannot be loaded.
    ocictl(&home)
        .arg("extension")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load extension"));
}

#[test]
fn non_matching_files_are_ignored() {
    let home = TempDir::new().unwrap();
    let dir = extensions_dir(&home);
    std::fs::write(dir.join("libnothing.so"), b"not a library").unwrap();
    std::fs::write(dir.join("notes.txt"), b"hello").unwrap();

    ocictl(&home)
        .arg("extension")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No extensions installed."));
}

#[test]
fn running_an_unknown_extension_is_rejected() {
    let home = TempDir::new().unwrap();

    ocictl(&home)
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
