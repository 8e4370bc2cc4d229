//! Tests for the `init` command.

use predicates::prelude::*;
use tempfile::TempDir;

use crate::ocictl;

#[test]
fn init_writes_default_config() {
    let home = TempDir::new().unwrap();

    ocictl(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let config = home.path().join(".ocictl.yml");
    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.contains("version: 1"));
    assert!(contents.contains(".ocictl"));

    assert!(home.path().join(".ocictl/extensions").is_dir());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let home = TempDir::new().unwrap();

    ocictl(&home).arg("init").assert().success();
    ocictl(&home)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn init_with_force_overwrites() {
    let home = TempDir::new().unwrap();

    ocictl(&home).arg("init").assert().success();
    ocictl(&home).arg("init").arg("--force").assert().success();
}

#[test]
fn init_honors_config_flag() {
    let home = TempDir::new().unwrap();
    let custom = home.path().join("custom.yml");

    ocictl(&home)
        .arg("--config")
        .arg(&custom)
        .arg("init")
        .assert()
        .success();

    assert!(custom.is_file());
    assert!(!home.path().join(".ocictl.yml").exists());
}

#[test]
fn extension_list_works_after_init() {
    let home = TempDir::new().unwrap();

    ocictl(&home).arg("init").assert().success();
    ocictl(&home)
        .arg("extension")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No extensions installed."));
}
