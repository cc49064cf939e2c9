use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn lab_request() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/lab-request.toml")
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

#[test]
fn generate_prints_yaml_for_lab_request() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
    cmd.arg("generate")
        .arg(lab_request())
        .assert()
        .success()
        .stdout(predicate::str::contains("name: S2S-FG-PA"))
        .stdout(predicate::str::contains("peer_wan_ip: 200.200.200.1"))
        .stdout(predicate::str::contains("name: s1-lan2_to_s2-lan2"))
        .stdout(predicate::str::contains("fortinet: aes128-sha256"));
}

#[test]
fn generate_writes_output_file() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("vpn_params.yaml");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
    cmd.arg("generate")
        .arg(lab_request())
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .success()
        .stderr(predicate::str::contains("selectors=4"));

    let written = fs::read_to_string(&out).expect("read output");
    assert!(written.contains("tunnel_network: 169.255.1.0/30"));
    assert!(written.contains("subnet: 10.100.101.0 255.255.255.0"));
}

#[test]
fn generate_json_is_deterministic() {
    let run = || {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
        let output = cmd
            .arg("generate")
            .arg(lab_request())
            .arg("--format")
            .arg("json")
            .output()
            .expect("run");
        assert!(output.status.success());
        output.stdout
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);

    let doc: serde_json::Value = serde_json::from_slice(&first).expect("json");
    assert_eq!(doc["ipsec"]["selectors"].as_array().map(Vec::len), Some(4));
}

#[test]
fn set_overrides_request_fields() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
    cmd.arg("generate")
        .arg(lab_request())
        .arg("--set")
        .arg("vpn_profile=high_security")
        .arg("--set")
        .arg("dh_group=21")
        .assert()
        .success()
        .stdout(predicate::str::contains("encryption: aes-256-cbc"))
        .stdout(predicate::str::contains("dh_group: 21"));
}

#[test]
fn dynamic_site_uses_policy_fallback() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
    cmd.arg("generate")
        .arg(fixture("fixtures/dynamic-site1.toml"))
        .arg("--policy-file")
        .arg(fixture("fixtures/policy-lab-fallback.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: dynamic"))
        .stdout(predicate::str::contains("peer_wan_ip: 100.100.100.1"))
        .stdout(predicate::str::contains("port: 8443"))
        .stdout(predicate::str::contains("lifetime_seconds: 7200"));
}

#[test]
fn unknown_profile_fails_without_output() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("vpn_params.yaml");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
    cmd.arg("generate")
        .arg(lab_request())
        .arg("--set")
        .arg("vpn_profile=nonexistent")
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown VPN profile 'nonexistent'"));
    assert!(!out.exists());
}

#[test]
fn refuses_to_overwrite_request_file() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("request.toml");
    fs::copy(lab_request(), &input).expect("copy request");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("s2s-vpngen"));
    cmd.arg("generate")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite input file"));
}
