#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn opcattr_cmd(nodeset: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("opcattr"));
    cmd.env_remove("OPCATTR_LOG")
        .env_remove("OPCATTR_MAX_NODES_PER_READ")
        .env_remove("OPCATTR_MAX_NODES_PER_WRITE")
        .arg("--nodeset")
        .arg(nodeset);
    cmd
}

fn initialized() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let nodeset = temp.path().join("boiler.json");
    opcattr_cmd(&nodeset)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
    (temp, nodeset)
}

#[test]
fn test_attrs_lists_the_table() {
    let temp = TempDir::new().unwrap();
    opcattr_cmd(&temp.path().join("unused.json"))
        .arg("attrs")
        .assert()
        .success()
        .stdout(predicate::str::contains("MinimumSamplingInterval"))
        .stdout(predicate::str::contains("ReferenceType"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let (_temp, nodeset) = initialized();
    opcattr_cmd(&nodeset)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    opcattr_cmd(&nodeset)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_read_reports_values_and_statuses_in_order() {
    let (_temp, nodeset) = initialized();
    let output = opcattr_cmd(&nodeset)
        .args([
            "-o",
            "json",
            "read",
            "ns=1;s=Boiler.Temperature",
            "Value",
            "99",
            "IsAbstract",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["attribute"], "Value");
    assert_eq!(rows[0]["value"]["Double"], 21.5);
    assert_eq!(rows[1]["attribute"], "99");
    assert_eq!(rows[1]["status"], "BadAttributeIdInvalid");
    assert_eq!(rows[2]["status"], "BadNotReadable");
}

#[test]
fn test_read_unknown_node_is_a_status_not_an_error() {
    let (_temp, nodeset) = initialized();
    opcattr_cmd(&nodeset)
        .args(["read", "ns=1;i=9999", "NodeId"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BadNodeIdUnknown"));
}

#[test]
fn test_write_value_persists() {
    let (_temp, nodeset) = initialized();
    opcattr_cmd(&nodeset)
        .args(["write", "ns=1;s=Boiler.Temperature", "Value", r#"{"Double": 42.0}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Good"));

    opcattr_cmd(&nodeset)
        .args(["read", "ns=1;s=Boiler.Temperature", "value"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn test_rejected_write_fails_and_leaves_file_alone() {
    let (_temp, nodeset) = initialized();
    let before = fs::read_to_string(&nodeset).unwrap();

    opcattr_cmd(&nodeset)
        .args(["write", "ns=1;s=Boiler", "DisplayName", r#"{"String": "x"}"#])
        .assert()
        .failure()
        .stdout(predicate::str::contains("BadWriteNotSupported"))
        .stderr(predicate::str::contains("write rejected"));

    assert_eq!(fs::read_to_string(&nodeset).unwrap(), before);
}

#[test]
fn test_unknown_attribute_name_is_an_error() {
    let (_temp, nodeset) = initialized();
    opcattr_cmd(&nodeset)
        .args(["read", "ns=1;s=Boiler", "Colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown attribute"));
}

#[test]
fn test_read_limit_from_config_file() {
    let (temp, nodeset) = initialized();
    let config = temp.path().join("opcattr.toml");
    fs::write(&config, "max_nodes_per_read = 1\n").unwrap();

    opcattr_cmd(&nodeset)
        .arg("--config")
        .arg(&config)
        .args(["-o", "json", "read", "ns=1;s=Boiler", "NodeId", "BrowseName"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BadTooManyOperations"));
}

#[test]
fn test_missing_node_set_is_an_error() {
    let temp = TempDir::new().unwrap();
    opcattr_cmd(&temp.path().join("absent.json"))
        .args(["read", "i=85", "NodeId"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading node set"));
}
